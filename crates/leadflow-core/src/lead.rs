use crate::config::Config;
use crate::error::{CrmError, Result};
use crate::note::{self, Note, NoteFlag};
use crate::paths;
use crate::types::{LeadSource, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// StageTransition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub stage: String,
    pub entered: DateTime<Utc>,
    pub exited: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub source: LeadSource,
    pub priority: Priority,
    /// Slug of the current pipeline stage. A plain string, not an enum: the
    /// stage taxonomy lives in config and evolves independently of records.
    pub stage: String,
    /// When the lead entered its current stage. Absent on imported records
    /// that predate pipeline tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_entered: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub next_note_seq: u32,
    pub stage_history: Vec<StageTransition>,
    pub archived: bool,
}

impl Lead {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, stage: impl Into<String>) -> Self {
        let now = Utc::now();
        let stage = stage.into();
        Self {
            slug: slug.into(),
            name: name.into(),
            phone: None,
            email: None,
            source: LeadSource::default(),
            priority: Priority::Medium,
            stage: stage.clone(),
            stage_entered: Some(now),
            created_at: now,
            updated_at: now,
            notes: Vec::new(),
            next_note_seq: 0,
            stage_history: vec![StageTransition {
                stage,
                entered: now,
                exited: None,
            }],
            archived: false,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create a lead in the first stage of the configured funnel.
    pub fn create(
        root: &Path,
        slug: impl Into<String>,
        name: impl Into<String>,
        cfg: &Config,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let lead_dir = paths::lead_dir(root, &slug);
        if lead_dir.exists() {
            return Err(CrmError::LeadExists(slug));
        }

        let first = cfg.first_stage()?;
        let lead = Self::new(slug, name, &first.slug);
        lead.save(root)?;
        Ok(lead)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::lead_manifest(root, slug);
        if !manifest.exists() {
            return Err(CrmError::LeadNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let lead: Lead = serde_yaml::from_str(&data)?;
        Ok(lead)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::lead_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let leads_dir = root.join(paths::LEADS_DIR);
        if !leads_dir.exists() {
            return Ok(Vec::new());
        }

        let mut leads = Vec::new();
        for entry in std::fs::read_dir(&leads_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(l) => leads.push(l),
                    Err(CrmError::LeadNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        leads.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(leads)
    }

    // ---------------------------------------------------------------------------
    // Stage moves
    // ---------------------------------------------------------------------------

    /// Move the lead to another stage of the funnel. Any direction is allowed
    /// (deals fall back to paperwork all the time); only the current stage and
    /// stages outside the funnel are rejected.
    pub fn move_to_stage(&mut self, target: &str, cfg: &Config) -> Result<()> {
        if !cfg.has_stage(target) {
            return Err(CrmError::StageNotFound(target.to_string()));
        }
        if self.stage == target {
            return Err(CrmError::InvalidMove {
                from: self.stage.clone(),
                to: target.to_string(),
                reason: "lead is already in this stage".to_string(),
            });
        }

        let now = Utc::now();
        if let Some(last) = self.stage_history.last_mut() {
            last.exited = Some(now);
        }

        self.stage = target.to_string();
        self.stage_entered = Some(now);
        self.updated_at = now;
        self.stage_history.push(StageTransition {
            stage: target.to_string(),
            entered: now,
            exited: None,
        });

        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Metadata mutations
    // ---------------------------------------------------------------------------

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    pub fn set_contact(&mut self, phone: Option<String>, email: Option<String>) {
        if phone.is_some() {
            self.phone = phone;
        }
        if email.is_some() {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_source(&mut self, source: LeadSource) {
        self.source = source;
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Notes
    // ---------------------------------------------------------------------------

    pub fn add_note(
        &mut self,
        body: impl Into<String>,
        flag: Option<NoteFlag>,
        author: Option<String>,
    ) -> String {
        let id = note::add_note(&mut self.notes, &mut self.next_note_seq, body, flag, author);
        self.updated_at = Utc::now();
        id
    }

    pub fn resolve_note(&mut self, id: &str) -> Result<()> {
        if note::resolve_note(&mut self.notes, id) {
            self.updated_at = Utc::now();
            Ok(())
        } else {
            Err(CrmError::NoteNotFound(id.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
