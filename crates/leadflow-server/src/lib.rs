pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // State
        .route("/api/state", get(routes::state::get_state))
        // Board
        .route("/api/board", get(routes::board::get_board))
        .route("/api/board/{stage}", get(routes::board::get_column))
        // Leads
        .route("/api/leads", get(routes::leads::list_leads))
        .route("/api/leads", post(routes::leads::create_lead))
        .route("/api/leads/{slug}", get(routes::leads::get_lead))
        .route("/api/leads/{slug}/move", post(routes::leads::move_lead))
        .route(
            "/api/leads/{slug}/priority",
            post(routes::leads::set_priority),
        )
        .route(
            "/api/leads/{slug}/archive",
            post(routes::leads::archive_lead),
        )
        .route("/api/leads/{slug}/notes", post(routes::leads::add_note))
        // Config
        .route("/api/config", get(routes::config::get_config))
        // Init
        .route("/api/init", post(routes::init::init_project))
        .layer(cors)
        .with_state(app_state)
}

/// Start the leadflow API server.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener).await
}

/// Start the leadflow API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("leadflow API server listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
