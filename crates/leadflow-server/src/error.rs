use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use leadflow_core::CrmError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<CrmError>() {
            match e {
                CrmError::NotInitialized => StatusCode::BAD_REQUEST,
                CrmError::LeadNotFound(_)
                | CrmError::StageNotFound(_)
                | CrmError::NoteNotFound(_) => StatusCode::NOT_FOUND,
                CrmError::LeadExists(_) => StatusCode::CONFLICT,
                CrmError::InvalidSlug(_)
                | CrmError::InvalidPriority(_)
                | CrmError::InvalidSource(_)
                | CrmError::InvalidNoteFlag(_)
                | CrmError::NoStages => StatusCode::BAD_REQUEST,
                CrmError::InvalidMove { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CrmError::Io(_) | CrmError::Yaml(_) | CrmError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
