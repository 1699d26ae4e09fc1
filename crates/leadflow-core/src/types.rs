use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Operator-assigned classification of how hot a lead is. Set manually or by
/// the capture form; independent of the time-based [`Urgency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Urgent,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// High and urgent leads qualify for the fast-track window after a stage
    /// change.
    pub fn is_fast_track(self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(crate::error::CrmError::InvalidPriority(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Staleness classification derived from days spent in the current stage.
/// Totally ordered: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn all() -> &'static [Urgency] {
        &[
            Urgency::Low,
            Urgency::Medium,
            Urgency::High,
            Urgency::Critical,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    /// Badge color the dashboard renders for this urgency.
    pub fn color(self) -> &'static str {
        match self {
            Urgency::Low => "#22c55e",
            Urgency::Medium => "#eab308",
            Urgency::High => "#f97316",
            Urgency::Critical => "#ef4444",
        }
    }

    /// Badge text the dashboard renders for this urgency.
    pub fn label(self) -> &'static str {
        match self {
            Urgency::Low => "Al día",
            Urgency::Medium => "En seguimiento",
            Urgency::High => "Atención",
            Urgency::Critical => "Urgente",
        }
    }

    pub fn is_fast_track(self) -> bool {
        matches!(self, Urgency::High | Urgency::Critical)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LeadSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Landing,
    Messenger,
    Referral,
    Other,
}

impl LeadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::Landing => "landing",
            LeadSource::Messenger => "messenger",
            LeadSource::Referral => "referral",
            LeadSource::Other => "other",
        }
    }
}

impl Default for LeadSource {
    fn default() -> Self {
        LeadSource::Other
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadSource {
    type Err = crate::error::CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landing" => Ok(LeadSource::Landing),
            "messenger" => Ok(LeadSource::Messenger),
            "referral" => Ok(LeadSource::Referral),
            "other" => Ok(LeadSource::Other),
            _ => Err(crate::error::CrmError::InvalidSource(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
