use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// NoteFlag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteFlag {
    FollowUp,
    Docs,
    Decision,
    Fyi,
}

impl fmt::Display for NoteFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoteFlag::FollowUp => "follow_up",
            NoteFlag::Docs => "docs",
            NoteFlag::Decision => "decision",
            NoteFlag::Fyi => "fyi",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for NoteFlag {
    type Err = crate::error::CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow_up" | "follow-up" => Ok(NoteFlag::FollowUp),
            "docs" => Ok(NoteFlag::Docs),
            "decision" => Ok(NoteFlag::Decision),
            "fyi" => Ok(NoteFlag::Fyi),
            _ => Err(crate::error::CrmError::InvalidNoteFlag(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub author: Option<String>,
    pub body: String,
    pub flag: Option<NoteFlag>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Append a note and return its auto-generated ID.
///
/// `seq` is a monotonic counter stored on the owning `Lead`. Incrementing it
/// before generating the ID keeps IDs unique even after notes are resolved
/// (removed), which a length-based scheme would not.
pub fn add_note(
    notes: &mut Vec<Note>,
    seq: &mut u32,
    body: impl Into<String>,
    flag: Option<NoteFlag>,
    author: Option<String>,
) -> String {
    *seq += 1;
    let id = format!("N{}", *seq);
    notes.push(Note {
        id: id.clone(),
        author,
        body: body.into(),
        flag,
        created_at: Utc::now(),
    });
    id
}

/// Remove a note by ID. Returns `true` if found and removed.
pub fn resolve_note(notes: &mut Vec<Note>, id: &str) -> bool {
    if let Some(pos) = notes.iter().position(|n| n.id == id) {
        notes.remove(pos);
        true
    } else {
        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
