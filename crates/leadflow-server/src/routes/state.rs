use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state — project summary with lead counts per stage and the
/// recent activity feed.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let state = leadflow_core::state::State::load(&root)?;
        let cfg = leadflow_core::config::Config::load(&root)?;
        let leads = leadflow_core::lead::Lead::list(&root)?;

        let stage_counts: Vec<serde_json::Value> = cfg
            .stages
            .iter()
            .map(|s| {
                let count = leads
                    .iter()
                    .filter(|l| !l.archived && l.stage == s.slug)
                    .count();
                serde_json::json!({
                    "stage": s.slug,
                    "title": s.title,
                    "count": count,
                })
            })
            .collect();

        let lead_summaries: Vec<serde_json::Value> = leads
            .iter()
            .map(|l| {
                serde_json::json!({
                    "slug": l.slug,
                    "name": l.name,
                    "stage": l.stage,
                    "priority": l.priority,
                    "archived": l.archived,
                    "updated_at": l.updated_at,
                })
            })
            .collect();

        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "project": state.project,
            "stages": stage_counts,
            "leads": lead_summaries,
            "history": state.history,
            "last_updated": state.last_updated,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
