use crate::error::{CrmError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const LEADFLOW_DIR: &str = ".leadflow";
pub const LEADS_DIR: &str = ".leadflow/leads";

pub const CONFIG_FILE: &str = ".leadflow/config.yaml";
pub const STATE_FILE: &str = ".leadflow/state.yaml";

pub const MANIFEST_FILE: &str = "manifest.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn leadflow_dir(root: &Path) -> PathBuf {
    root.join(LEADFLOW_DIR)
}

pub fn lead_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(LEADS_DIR).join(slug)
}

pub fn lead_manifest(root: &Path, slug: &str) -> PathBuf {
    lead_dir(root, slug).join(MANIFEST_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(CrmError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
