use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("not initialized: run 'leadflow init'")]
    NotInitialized,

    #[error("lead not found: {0}")]
    LeadNotFound(String),

    #[error("lead already exists: {0}")]
    LeadExists(String),

    #[error("stage not found: {0}")]
    StageNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("invalid move from {from} to {to}: {reason}")]
    InvalidMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("invalid note flag: {0}")]
    InvalidNoteFlag(String),

    #[error("no stages configured")]
    NoStages,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrmError>;
