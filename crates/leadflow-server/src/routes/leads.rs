use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use leadflow_core::lead::Lead;
use leadflow_core::state::PipelineEvent;
use leadflow_core::types::{LeadSource, Priority};

/// Best-effort activity recording: a failed log write never fails the request.
fn record(root: &std::path::Path, lead: &str, event: PipelineEvent, detail: Option<String>) {
    if let Ok(mut state) = leadflow_core::state::State::load(root) {
        state.record(lead, event, detail);
        let _ = state.save(root);
    }
}

fn lead_summary(l: &Lead) -> serde_json::Value {
    serde_json::json!({
        "slug": l.slug,
        "name": l.name,
        "stage": l.stage,
        "priority": l.priority,
        "source": l.source,
        "archived": l.archived,
        "note_count": l.notes.len(),
        "updated_at": l.updated_at,
    })
}

/// GET /api/leads — list all leads.
pub async fn list_leads(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let leads = Lead::list(&root)?;
        let list: Vec<serde_json::Value> = leads.iter().map(lead_summary).collect();
        Ok::<_, leadflow_core::CrmError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/leads/:slug — full lead detail.
pub async fn get_lead(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let l = Lead::load(&root, &slug)?;
        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "slug": l.slug,
            "name": l.name,
            "phone": l.phone,
            "email": l.email,
            "stage": l.stage,
            "stage_entered": l.stage_entered,
            "priority": l.priority,
            "source": l.source,
            "archived": l.archived,
            "notes": l.notes,
            "stage_history": l.stage_history,
            "created_at": l.created_at,
            "updated_at": l.updated_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateLeadBody {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// POST /api/leads — capture a new lead into the first funnel stage.
pub async fn create_lead(
    State(app): State<AppState>,
    Json(body): Json<CreateLeadBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let cfg = leadflow_core::config::Config::load(&root)?;
        let mut lead = Lead::create(&root, body.slug, body.name, &cfg)?;

        if let Some(ref s) = body.source {
            lead.set_source(s.parse::<LeadSource>()?);
        }
        if let Some(ref p) = body.priority {
            lead.set_priority(p.parse::<Priority>()?);
        }
        if body.phone.is_some() || body.email.is_some() {
            lead.set_contact(body.phone.clone(), body.email.clone());
        }
        lead.save(&root)?;

        record(&root, &lead.slug, PipelineEvent::Created, None);

        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "slug": lead.slug,
            "name": lead.name,
            "stage": lead.stage,
            "priority": lead.priority,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct MoveBody {
    pub stage: String,
}

/// POST /api/leads/:slug/move — move a lead to another stage.
pub async fn move_lead(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<MoveBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let cfg = leadflow_core::config::Config::load(&root)?;
        let mut lead = Lead::load(&root, &slug)?;
        let from = lead.stage.clone();

        lead.move_to_stage(&body.stage, &cfg)?;
        lead.save(&root)?;

        record(
            &root,
            &lead.slug,
            PipelineEvent::Moved,
            Some(format!("{} -> {}", from, lead.stage)),
        );

        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "slug": lead.slug,
            "stage": lead.stage,
            "stage_entered": lead.stage_entered,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct PriorityBody {
    pub priority: String,
}

/// POST /api/leads/:slug/priority — reclassify a lead.
pub async fn set_priority(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<PriorityBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut lead = Lead::load(&root, &slug)?;
        let priority = body.priority.parse::<Priority>()?;
        lead.set_priority(priority);
        lead.save(&root)?;

        record(
            &root,
            &lead.slug,
            PipelineEvent::PriorityChanged,
            Some(priority.to_string()),
        );

        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "slug": lead.slug,
            "priority": lead.priority,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/leads/:slug/archive — soft-delete a lead.
pub async fn archive_lead(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut lead = Lead::load(&root, &slug)?;
        lead.archive();
        lead.save(&root)?;

        record(&root, &lead.slug, PipelineEvent::Archived, None);

        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "slug": lead.slug,
            "archived": lead.archived,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct NoteBody {
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

/// POST /api/leads/:slug/notes — attach a note to a lead.
pub async fn add_note(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<NoteBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let flag = body
            .flag
            .as_deref()
            .map(str::parse::<leadflow_core::note::NoteFlag>)
            .transpose()?;

        let mut lead = Lead::load(&root, &slug)?;
        let id = lead.add_note(body.body.clone(), flag, body.author.clone());
        lead.save(&root)?;

        record(&root, &lead.slug, PipelineEvent::NoteAdded, Some(id.clone()));

        Ok::<_, leadflow_core::CrmError>(serde_json::json!({
            "slug": lead.slug,
            "note_id": id,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
