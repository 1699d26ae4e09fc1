use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct InitBody {
    #[serde(default)]
    pub project: Option<String>,
}

/// POST /api/init — initialize the workspace under the server root.
pub async fn init_project(
    State(app): State<AppState>,
    Json(body): Json<InitBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let name = body
            .project
            .unwrap_or_else(|| leadflow_core::workspace::project_name_from_root(&root));
        let summary = leadflow_core::workspace::init(&root, &name)?;
        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "project": name,
            "created_config": summary.created_config,
            "created_state": summary.created_state,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
