//! Unitquiz Report Generation
//!
//! Summarizes a learner's session so it can be saved as JSON or read as
//! Markdown.
//!
//! # Types
//!
//! - [`SessionReport`] - The complete report for one session
//! - [`ReportSummary`] - Headline counts and duration
//! - [`UnitMisses`] - How often one unit was answered wrongly
//! - [`RoundRow`] - One finished round
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - Generate JSON reports with compact or pretty formatting
//! - [`MarkdownGenerator`] - Generate human-readable Markdown reports
//!
//! # Example
//!
//! ```rust
//! use unitquiz_core::{Family, QuizSession};
//! use unitquiz_report::{MarkdownGenerator, SessionReport};
//!
//! let mut session = QuizSession::from_config(&Default::default());
//! session.start(Family::Weight).unwrap();
//!
//! let report = SessionReport::from_state(session.state());
//! assert_eq!(report.family, Some(Family::Weight));
//!
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("# Unitquiz Session Report: weight"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unitquiz_core::{Family, Quantity, RoundRecord, SessionState, SessionStatus, Unit};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Report
// ============================================================================

/// Summary of one learner's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session status when the report was taken.
    pub status: SessionStatus,

    /// Family being practised, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<Family>,

    /// Headline counts.
    pub summary: ReportSummary,

    /// Per-unit miss counts, most missed first.
    pub misses: Vec<UnitMisses>,

    /// Finished rounds in order.
    pub rounds: Vec<RoundRow>,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// When the session was last updated.
    pub generated_at: DateTime<Utc>,
}

impl SessionReport {
    /// Builds a report from a session's state.
    ///
    /// Misses on the problem still in progress are counted, but the problem
    /// itself only appears in the round table once it is solved or skipped.
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        let history = &state.history;
        let solved = count_u32(history.iter().filter(|r| r.solved));
        let first_try = count_u32(history.iter().filter(|r| r.solved_first_try()));
        let elapsed = state.elapsed();

        let summary = ReportSummary {
            rounds_played: count_u32(history.iter()),
            problems_solved: state.solved,
            skipped: count_u32(history.iter()).saturating_sub(solved),
            total_attempts: state.total_attempts(),
            first_try_solves: first_try,
            duration_seconds: u64::try_from(elapsed.num_seconds()).unwrap_or(0),
        };

        let missed = history
            .iter()
            .flat_map(|r| r.missed_units.iter())
            .chain(state.missed_units.iter())
            .copied();

        Self {
            status: state.status,
            family: state.family,
            summary,
            misses: tally_misses(missed),
            rounds: history.iter().map(RoundRow::from).collect(),
            started_at: state.started_at,
            generated_at: state.updated_at,
        }
    }

    /// Returns the number of rounds solved on the first graded submission as
    /// a percentage of rounds played, or `None` before any round finishes.
    #[must_use]
    pub fn first_try_rate(&self) -> Option<u32> {
        if self.summary.rounds_played == 0 {
            return None;
        }
        Some(self.summary.first_try_solves * 100 / self.summary.rounds_played)
    }
}

/// Headline counts for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Rounds finished, solved or skipped.
    pub rounds_played: u32,

    /// Problems solved.
    pub problems_solved: u32,

    /// Problems skipped.
    pub skipped: u32,

    /// Graded submissions, including the problem still in progress.
    pub total_attempts: u32,

    /// Problems solved on the first graded submission.
    pub first_try_solves: u32,

    /// Time from the session start to the last update.
    pub duration_seconds: u64,
}

/// How often one unit was answered wrongly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMisses {
    /// The unit.
    pub unit: Unit,
    /// Number of wrong answers.
    pub count: u32,
}

/// One finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRow {
    /// The round number (1-indexed).
    pub round: u32,

    /// Value shown to the learner.
    pub display_value: Quantity,

    /// Unit shown to the learner.
    pub display_unit: Unit,

    /// Graded submissions.
    pub attempts: u32,

    /// `true` if solved, `false` if skipped.
    pub solved: bool,

    /// Units answered wrongly, one entry per miss.
    pub missed_units: Vec<Unit>,

    /// Time spent on the round.
    pub duration_seconds: u64,
}

impl RoundRow {
    /// Returns the problem as shown, such as `85 m`.
    #[must_use]
    pub fn shown(&self) -> String {
        format!("{} {}", self.display_value, self.display_unit)
    }
}

impl From<&RoundRecord> for RoundRow {
    fn from(record: &RoundRecord) -> Self {
        Self {
            round: record.round,
            display_value: *record.problem.display_value(),
            display_unit: record.problem.display_unit(),
            attempts: record.attempts,
            solved: record.solved,
            missed_units: record.missed_units.clone(),
            duration_seconds: u64::try_from(record.duration().num_seconds()).unwrap_or(0),
        }
    }
}

/// Counts misses per unit, most missed first, ties in canonical unit order.
fn tally_misses(missed: impl Iterator<Item = Unit>) -> Vec<UnitMisses> {
    let mut counts: Vec<UnitMisses> = Vec::new();
    for unit in missed {
        match counts.iter_mut().find(|m| m.unit == unit) {
            Some(entry) => entry.count += 1,
            None => counts.push(UnitMisses { unit, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.unit.cmp(&b.unit)));
    counts
}

fn count_u32<T>(iter: impl Iterator<Item = T>) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}
