use axum::http::StatusCode;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a minimal leadflow workspace inside the given temp directory.
fn init_workspace(dir: &TempDir) {
    leadflow_core::workspace::init(dir.path(), "moto-crm").unwrap();
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Write a lead manifest directly with controlled timestamps, bypassing the
/// API so board-ordering tests are deterministic.
fn seed_lead(
    dir: &TempDir,
    slug: &str,
    stage: &str,
    priority: leadflow_core::types::Priority,
    created_days_ago: i64,
    entered_hours_ago: Option<i64>,
) {
    let mut lead = leadflow_core::lead::Lead::new(slug, slug, stage);
    lead.priority = priority;
    lead.created_at = Utc::now() - Duration::days(created_days_ago);
    lead.stage_entered = entered_hours_ago.map(|h| Utc::now() - Duration::hours(h));
    lead.save(dir.path()).unwrap();
}

// ---------------------------------------------------------------------------
// State / config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_state_returns_project_summary() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["project"], "moto-crm");
    assert!(json["stages"].is_array());
    assert_eq!(json["stages"].as_array().unwrap().len(), 6);
    assert!(json["history"].is_array());
}

#[tokio::test]
async fn get_config_returns_project_config() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["project"]["name"], "moto-crm");
    assert_eq!(json["version"], 1);
    assert!(json["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_config_returns_error_when_not_initialized() {
    let dir = TempDir::new().unwrap();
    // Deliberately do NOT call init_workspace.

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/config").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not initialized"));
}

#[tokio::test]
async fn init_endpoint_creates_workspace() {
    let dir = TempDir::new().unwrap();

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/init",
        serde_json::json!({ "project": "moto-crm" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["created_config"], true);
    assert!(dir.path().join(".leadflow/config.yaml").exists());
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_lead_lands_in_first_stage() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/leads",
        serde_json::json!({
            "slug": "ana-diaz",
            "name": "Ana Díaz",
            "source": "landing",
            "priority": "high",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["slug"], "ana-diaz");
    assert_eq!(json["stage"], "cliente-nuevo");
    assert_eq!(json["priority"], "high");
}

#[tokio::test]
async fn create_duplicate_lead_conflicts() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let body = serde_json::json!({ "slug": "ana", "name": "Ana" });
    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(app, "/api/leads", body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(app, "/api/leads", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_lead_with_bad_slug_is_rejected() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/leads",
        serde_json::json!({ "slug": "Ana Diaz", "name": "Ana" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_lead_with_bad_priority_is_rejected() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/leads",
        serde_json::json!({ "slug": "ana", "name": "Ana", "priority": "maximo" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_lead_returns_404() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/leads/nadie").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn move_lead_updates_stage_and_history() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_lead(
        &dir,
        "ana",
        "cliente-nuevo",
        leadflow_core::types::Priority::Medium,
        2,
        Some(48),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/leads/ana/move",
        serde_json::json!({ "stage": "contactado" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "contactado");

    let lead = leadflow_core::lead::Lead::load(dir.path(), "ana").unwrap();
    assert_eq!(lead.stage_history.len(), 2);

    // Move is recorded in the activity feed.
    let state = leadflow_core::state::State::load(dir.path()).unwrap();
    let last = state.last_event().unwrap();
    assert_eq!(last.detail.as_deref(), Some("cliente-nuevo -> contactado"));
}

#[tokio::test]
async fn move_to_unknown_stage_returns_404() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_lead(
        &dir,
        "ana",
        "cliente-nuevo",
        leadflow_core::types::Priority::Medium,
        2,
        Some(48),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/leads/ana/move",
        serde_json::json!({ "stage": "etapa-fantasma" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn move_to_same_stage_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_lead(
        &dir,
        "ana",
        "cliente-nuevo",
        leadflow_core::types::Priority::Medium,
        2,
        Some(48),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/leads/ana/move",
        serde_json::json!({ "stage": "cliente-nuevo" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn add_note_returns_note_id() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_lead(
        &dir,
        "ana",
        "documentos",
        leadflow_core::types::Priority::Medium,
        2,
        Some(12),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/leads/ana/notes",
        serde_json::json!({ "body": "faltan comprobantes", "flag": "docs" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["note_id"], "N1");
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[tokio::test]
async fn board_has_all_columns_in_funnel_order() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/board").await;

    assert_eq!(status, StatusCode::OK);
    let columns = json["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 6);
    assert_eq!(columns[0]["stage"], "cliente-nuevo");
    assert_eq!(columns[5]["stage"], "entregado");
}

#[tokio::test]
async fn board_cards_carry_score_augmentation() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_lead(
        &dir,
        "ana",
        "preaprobado",
        leadflow_core::types::Priority::Medium,
        10,
        // An extra hour of padding so the whole-day floor stays at 9 even
        // though seeding and the request read the clock at different instants.
        Some(9 * 24 + 1),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/board/preaprobado").await;

    assert_eq!(status, StatusCode::OK);
    let card = &json["cards"][0];
    assert_eq!(card["slug"], "ana");
    assert_eq!(card["priority"], "medium");
    // 9 days in the tight pre-approval stage reads critical.
    assert_eq!(card["timeInStage"], 9);
    assert_eq!(card["urgency"], "critical");
    assert!(card["score"].is_u64());
    assert!(card["scoreColor"].as_str().unwrap().starts_with('#'));
    assert!(!card["scoreLabel"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn board_fast_tracks_recent_urgent_leads() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    // Urgent lead that entered the stage 6 hours ago: fast-tracked.
    seed_lead(
        &dir,
        "urgente",
        "contactado",
        leadflow_core::types::Priority::Urgent,
        8,
        Some(6),
    );
    // Medium lead created yesterday: ordinary ordering.
    seed_lead(
        &dir,
        "tibio",
        "contactado",
        leadflow_core::types::Priority::Medium,
        1,
        Some(30),
    );
    // Urgent lead that entered five days ago: past the window, sorts by
    // creation date with the rest.
    seed_lead(
        &dir,
        "viejo",
        "contactado",
        leadflow_core::types::Priority::Urgent,
        9,
        Some(5 * 24),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/board/contactado").await;

    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = json["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["urgente", "tibio", "viejo"]);
}

#[tokio::test]
async fn board_excludes_archived_leads() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_lead(
        &dir,
        "ana",
        "contactado",
        leadflow_core::types::Priority::Medium,
        1,
        Some(2),
    );

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(app, "/api/leads/ana/archive", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, "/api/board/contactado").await;
    assert!(json["cards"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn board_unknown_stage_returns_404() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = leadflow_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/board/etapa-fantasma").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
