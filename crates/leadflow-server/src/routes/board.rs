use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::error::AppError;
use crate::state::AppState;
use leadflow_core::board::{Board, Column, ColumnCard};

/// Shape one card for the dashboard: lead fields plus the score augmentation
/// the frontend expects (camelCase, flattened).
fn card_json(c: &ColumnCard) -> serde_json::Value {
    serde_json::json!({
        "slug": c.slug,
        "name": c.name,
        "priority": c.priority,
        "createdAt": c.created_at,
        "stageEntered": c.stage_entered,
        "score": c.score.score,
        "urgency": c.score.urgency,
        "timeInStage": c.score.days_in_stage,
        "scoreColor": c.score.color,
        "scoreLabel": c.score.label,
    })
}

fn column_json(col: &Column) -> serde_json::Value {
    serde_json::json!({
        "stage": col.stage,
        "title": col.title,
        "cards": col.cards.iter().map(card_json).collect::<Vec<_>>(),
    })
}

/// GET /api/board — every column of the pipeline, scored and sorted.
pub async fn get_board(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    // One evaluation instant per request keeps a board render internally
    // consistent even while the clock advances mid-computation.
    let now = Utc::now();
    let result = tokio::task::spawn_blocking(move || {
        let board: Board = leadflow_core::board::build_board(&root, now)?;
        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "columns": board.columns.iter().map(column_json).collect::<Vec<_>>(),
            "generatedAt": now,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/board/:stage — a single sorted column.
pub async fn get_column(
    State(app): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let now = Utc::now();
    let result = tokio::task::spawn_blocking(move || {
        let column = leadflow_core::board::build_column(&root, &stage, now)?;
        Ok::<_, leadflow_core::CrmError>(column_json(&column))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
