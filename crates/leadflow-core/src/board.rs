use crate::config::{Config, ScoringConfig};
use crate::error::{CrmError, Result};
use crate::lead::Lead;
use crate::score::{self, StageScore};
use crate::types::Priority;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;

/// Hours after stage entry during which a fast-track-eligible lead stays
/// pinned to the top of its column.
pub const FAST_TRACK_WINDOW_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// ColumnCard
// ---------------------------------------------------------------------------

/// One lead as it appears in a board column, with its computed stage score.
///
/// Timestamps are optional here even though the persistence layer always
/// stamps `created_at`: imported records (messenger sync, spreadsheet loads)
/// can arrive with either date missing, and the sorter must order them
/// without failing.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnCard {
    pub slug: String,
    pub name: String,
    pub priority: Priority,
    pub created_at: Option<DateTime<Utc>>,
    pub stage_entered: Option<DateTime<Utc>>,
    pub score: StageScore,
}

impl ColumnCard {
    pub fn from_lead(lead: &Lead, scoring: &ScoringConfig, now: DateTime<Utc>) -> Self {
        // A lead that never recorded a stage entry is scored from creation.
        let entry = lead.stage_entered.unwrap_or(lead.created_at);
        let score = score::compute_stage_score(entry, &lead.stage, scoring, now);
        Self {
            slug: lead.slug.clone(),
            name: lead.name.clone(),
            priority: lead.priority,
            created_at: Some(lead.created_at),
            stage_entered: lead.stage_entered,
            score,
        }
    }

    /// Fast-track membership: top-two levels of either taxonomy AND a stage
    /// entry within the last 24 hours. An urgent lead that has sat in its
    /// stage longer than the window sorts with the rest.
    fn is_fast_track(&self, now: DateTime<Utc>) -> bool {
        let eligible = self.priority.is_fast_track() || self.score.urgency.is_fast_track();
        match self.stage_entered {
            Some(entered) => {
                eligible && entered >= now - Duration::hours(FAST_TRACK_WINDOW_HOURS)
            }
            None => false,
        }
    }

    /// Best-available timestamp for ordering the non-fast-track group.
    fn freshness(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.stage_entered)
    }
}

// ---------------------------------------------------------------------------
// Column / Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub stage: String,
    pub title: String,
    pub cards: Vec<ColumnCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Order one column for display.
///
/// Fast-track cards (see [`ColumnCard::is_fast_track`]) come first, ascending
/// by stage entry so the longest-waiting one surfaces on top. Everything else
/// follows, descending by best-available timestamp. Cards without a usable
/// date sort to the end of their group. The sort is stable: cards with equal
/// keys keep their input order, and re-sorting an already sorted column with
/// the same `now` is a no-op.
pub fn sort_column(cards: Vec<ColumnCard>, now: DateTime<Utc>) -> Vec<ColumnCard> {
    let (mut fast_track, mut rest): (Vec<ColumnCard>, Vec<ColumnCard>) =
        cards.into_iter().partition(|c| c.is_fast_track(now));

    fast_track.sort_by(|a, b| cmp_asc_none_last(a.stage_entered, b.stage_entered));
    rest.sort_by(|a, b| cmp_desc_none_last(a.freshness(), b.freshness()));

    fast_track.append(&mut rest);
    fast_track
}

fn cmp_asc_none_last(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_desc_none_last(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Board assembly
// ---------------------------------------------------------------------------

/// Build every column of the board from in-memory leads. `now` is captured
/// once by the caller and threaded through scoring and sorting so a single
/// board render is internally consistent.
pub fn build_board_from(cfg: &Config, leads: &[Lead], now: DateTime<Utc>) -> Board {
    let columns = cfg
        .stages
        .iter()
        .map(|stage| assemble_column(cfg, leads, stage.slug.as_str(), &stage.title, now))
        .collect();
    Board { columns }
}

/// Build a single column. Errors if the stage is not part of the funnel.
pub fn build_column_from(
    cfg: &Config,
    leads: &[Lead],
    stage: &str,
    now: DateTime<Utc>,
) -> Result<Column> {
    let stage_cfg = cfg
        .stage(stage)
        .ok_or_else(|| CrmError::StageNotFound(stage.to_string()))?;
    Ok(assemble_column(
        cfg,
        leads,
        &stage_cfg.slug,
        &stage_cfg.title,
        now,
    ))
}

/// Load leads from disk and build the full board.
pub fn build_board(root: &Path, now: DateTime<Utc>) -> Result<Board> {
    let cfg = Config::load(root)?;
    let leads = Lead::list(root)?;
    Ok(build_board_from(&cfg, &leads, now))
}

/// Load leads from disk and build one column.
pub fn build_column(root: &Path, stage: &str, now: DateTime<Utc>) -> Result<Column> {
    let cfg = Config::load(root)?;
    let leads = Lead::list(root)?;
    build_column_from(&cfg, &leads, stage, now)
}

fn assemble_column(
    cfg: &Config,
    leads: &[Lead],
    slug: &str,
    title: &str,
    now: DateTime<Utc>,
) -> Column {
    let cards: Vec<ColumnCard> = leads
        .iter()
        .filter(|l| !l.archived && l.stage == slug)
        .map(|l| ColumnCard::from_lead(l, &cfg.scoring, now))
        .collect();
    Column {
        stage: slug.to_string(),
        title: title.to_string(),
        cards: sort_column(cards, now),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
