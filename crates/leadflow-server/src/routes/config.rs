use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config — full project configuration, warnings included.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let cfg = leadflow_core::config::Config::load(&root)?;
        let warnings = cfg.validate();
        let mut value = serde_json::to_value(&cfg)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("warnings".to_string(), serde_json::to_value(&warnings)?);
        }
        Ok::<_, leadflow_core::CrmError>(value)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
