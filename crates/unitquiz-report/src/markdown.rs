//! Markdown report generation.
//!
//! [`MarkdownGenerator`] renders a [`SessionReport`] as a summary table,
//! the most-missed units and one row per finished round.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use unitquiz_core::{SessionStatus, Unit};

use crate::{RoundRow, SessionReport};

/// Generates Markdown reports from a session.
pub struct MarkdownGenerator<'a> {
    report: &'a SessionReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_misses(&mut output);
        self.write_rounds(&mut output);
        self.write_footer(&mut output);

        output
    }

    /// Writes the report title.
    fn write_title(&self, output: &mut String) {
        match self.report.family {
            Some(family) => {
                let _ = writeln!(output, "# Unitquiz Session Report: {family}\n");
            }
            None => {
                let _ = writeln!(output, "# Unitquiz Session Report\n");
            }
        }
    }

    /// Writes the summary section with metrics table.
    fn write_summary(&self, output: &mut String) {
        let summary = &self.report.summary;

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(
            output,
            "| Status | {} |",
            status_label(self.report.status)
        );
        let _ = writeln!(output, "| Rounds Played | {} |", summary.rounds_played);
        let _ = writeln!(output, "| Problems Solved | {} |", summary.problems_solved);
        let _ = writeln!(output, "| Skipped | {} |", summary.skipped);
        let _ = writeln!(output, "| Attempts | {} |", summary.total_attempts);
        let _ = writeln!(output, "| First-Try Solves | {} |", summary.first_try_solves);
        let _ = writeln!(
            output,
            "| Duration | {} |",
            format_duration(summary.duration_seconds)
        );
        let _ = writeln!(output);
    }

    /// Writes the per-unit miss counts.
    fn write_misses(&self, output: &mut String) {
        let _ = writeln!(output, "## Missed Units\n");

        if self.report.misses.is_empty() {
            let _ = writeln!(output, "*No wrong answers.*\n");
            return;
        }

        let _ = writeln!(output, "| Unit | Misses |");
        let _ = writeln!(output, "|------|--------|");
        for miss in &self.report.misses {
            let _ = writeln!(output, "| {} | {} |", miss.unit, miss.count);
        }
        let _ = writeln!(output);
    }

    /// Writes one row per finished round.
    fn write_rounds(&self, output: &mut String) {
        let _ = writeln!(output, "## Rounds\n");

        if self.report.rounds.is_empty() {
            let _ = writeln!(output, "*No rounds finished.*\n");
            return;
        }

        let _ = writeln!(output, "| # | Problem | Attempts | Result | Missed |");
        let _ = writeln!(output, "|---|---------|----------|--------|--------|");
        for row in &self.report.rounds {
            write_round_row(output, row);
        }
        let _ = writeln!(output);
    }

    /// Writes the footer with the report timestamp.
    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---");
        let timestamp = format_timestamp(&self.report.generated_at);
        let _ = writeln!(output, "*Generated by unitquiz at {timestamp}*");
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn write_round_row(output: &mut String, row: &RoundRow) {
    let result = if row.solved { "Solved" } else { "Skipped" };
    let _ = writeln!(
        output,
        "| {} | {} | {} | {} | {} |",
        row.round,
        row.shown(),
        row.attempts,
        result,
        format_units(&row.missed_units)
    );
}

const fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "Idle",
        SessionStatus::InRound => "In round",
    }
}

/// Joins unit symbols, or `-` when there are none.
fn format_units(units: &[Unit]) -> String {
    if units.is_empty() {
        return "-".to_string();
    }
    units
        .iter()
        .map(|u| u.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a duration in seconds to a human-readable string.
///
/// Examples:
/// - 65 seconds -> "1m 5s"
/// - 3661 seconds -> "1h 1m 1s"
fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();

    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}

/// Format: "YYYY-MM-DD HH:MM:SS UTC"
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
