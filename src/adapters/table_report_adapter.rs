//! Plain-text ranked table for the terminal.
//!
//! Rows scoring at or above [`HIGHLIGHT_SCORE`] are marked with `*`.
//! Changes carry an explicit sign and undefined figures print as `-`.
//! Headlines, when present, are listed under their row; a summary of
//! successes and failures closes the report.

use crate::domain::error::ScanError;
use crate::domain::scanner::{ScanOutcome, ScoreResult};
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub const HIGHLIGHT_SCORE: i32 = 80;

const NAME_WIDTH: usize = 28;

pub struct TableReportAdapter {
    /// List each failed symbol with its cause after the table.
    pub show_failures: bool,
}

impl Default for TableReportAdapter {
    fn default() -> Self {
        Self {
            show_failures: true,
        }
    }
}

fn format_change(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "-".to_string(),
    }
}

fn format_plain(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => "-".to_string(),
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        name.to_string()
    } else {
        let cut: String = name.chars().take(NAME_WIDTH - 1).collect();
        format!("{}~", cut)
    }
}

fn format_row(rank: usize, r: &ScoreResult) -> String {
    let marker = if r.score >= HIGHLIGHT_SCORE { "*" } else { " " };
    format!(
        "{}{:>4}  {:<name_w$}  {:<12}  {:>9}  {:>9}  {:>9}  {:>6}  {:>7}  {:>9}  {:>5}",
        marker,
        rank,
        truncate_name(&r.name),
        r.symbol,
        format_change(r.short_change),
        format_change(r.medium_change),
        format_change(r.long_change),
        format_plain(r.rsi, ""),
        format_plain(r.volume_ratio, "x"),
        format_plain(r.potential, "%"),
        r.score,
        name_w = NAME_WIDTH,
    )
}

fn header() -> String {
    format!(
        " {:>4}  {:<name_w$}  {:<12}  {:>9}  {:>9}  {:>9}  {:>6}  {:>7}  {:>9}  {:>5}",
        "#",
        "Name",
        "Symbol",
        "Short",
        "Medium",
        "Long",
        "RSI",
        "Volume",
        "Potential",
        "Score",
        name_w = NAME_WIDTH,
    )
}

impl ReportPort for TableReportAdapter {
    fn render(&self, outcome: &ScanOutcome, out: &mut dyn Write) -> Result<(), ScanError> {
        if outcome.is_empty() {
            writeln!(out, "No assets detected.")?;
        } else {
            let head = header();
            writeln!(out, "{}", head)?;
            writeln!(out, "{}", "-".repeat(head.len()))?;
            for (i, result) in outcome.results.iter().enumerate() {
                writeln!(out, "{}", format_row(i + 1, result))?;
                if let Some(items) = outcome.news.get(&result.symbol) {
                    for item in items {
                        writeln!(out, "        - {} <{}>", item.title, item.link)?;
                    }
                }
            }
        }

        writeln!(out)?;
        write!(
            out,
            "Scanned {} instruments: {} scored, {} failed, {} shown",
            outcome.succeeded + outcome.failed(),
            outcome.succeeded,
            outcome.failed(),
            outcome.results.len()
        )?;
        if outcome.cancelled {
            write!(out, " (cancelled)")?;
        }
        writeln!(out)?;

        if self.show_failures && !outcome.failures.is_empty() {
            writeln!(out, "Failed:")?;
            for failure in &outcome.failures {
                writeln!(out, "  {}: {}", failure.symbol, failure.cause)?;
            }
        }
        Ok(())
    }
}
