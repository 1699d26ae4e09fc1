use crate::config::ScoringConfig;
use crate::types::Urgency;
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// StageScore
// ---------------------------------------------------------------------------

/// Staleness assessment of one lead inside its current stage. Derived fresh
/// from the stage-entry instant on every read; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageScore {
    /// Whole days since the lead entered its stage, clamped to 0 when the
    /// entry timestamp lies in the future.
    pub days_in_stage: u32,
    pub urgency: Urgency,
    /// 0–100, decaying as the lead sits in the stage. Older = lower.
    pub score: u32,
    pub color: &'static str,
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Whole days between stage entry and `now`, never negative.
pub fn days_in_stage(stage_entered: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - stage_entered).num_days();
    u32::try_from(days).unwrap_or(if days < 0 { 0 } else { u32::MAX })
}

/// Score a lead's staleness within `stage` as of `now`.
///
/// Pure and total: unknown stage slugs use the lenient default thresholds
/// (stage taxonomies evolve; archived records may reference retired slugs),
/// and no input produces an error or panic. Callers substitute a fallback
/// entry timestamp (typically the lead's creation time) before calling; this
/// function does not guess.
pub fn compute_stage_score(
    stage_entered: DateTime<Utc>,
    stage: &str,
    scoring: &ScoringConfig,
    now: DateTime<Utc>,
) -> StageScore {
    let days = days_in_stage(stage_entered, now);
    let thresholds = scoring.thresholds_for(stage);
    let urgency = thresholds.urgency_for(days);
    let score = 100u32.saturating_sub(days.saturating_mul(thresholds.decay_per_day));

    StageScore {
        days_in_stage: days,
        urgency,
        score,
        color: urgency.color(),
        label: urgency.label(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
