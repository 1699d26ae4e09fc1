use crate::config::Config;
use crate::error::Result;
use crate::state::State;
use crate::{io, paths};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// InitSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct InitSummary {
    pub created_config: bool,
    pub created_state: bool,
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/// Initialize the `.leadflow/` workspace under `root`. Idempotent: existing
/// config and state files are left untouched. Shared by `leadflow init` and
/// the server's `/api/init`.
pub fn init(root: &Path, project_name: &str) -> Result<InitSummary> {
    io::ensure_dir(&root.join(paths::LEADFLOW_DIR))?;
    io::ensure_dir(&root.join(paths::LEADS_DIR))?;

    let config = serde_yaml::to_string(&Config::new(project_name))?;
    let created_config = io::write_if_missing(&paths::config_path(root), config.as_bytes())?;

    let state = serde_yaml::to_string(&State::new(project_name))?;
    let created_state = io::write_if_missing(&paths::state_path(root), state.as_bytes())?;

    Ok(InitSummary {
        created_config,
        created_state,
    })
}

/// Derive a project name from the root directory name.
pub fn project_name_from_root(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "leadflow".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
