//! Per-date reports and the sweep summary.

use anyhow::{Context, Result};
use aqmaps_core::{ValidationReport, Verdict};
use chrono::NaiveDate;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";

pub fn date_label(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn date_report_name(date: NaiveDate) -> String {
    format!("test-{}.txt", date_label(date))
}

/// A date and why it ended up in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedReason {
    pub date: NaiveDate,
    pub reason: String,
    /// Offending move, for failures tied to a single move.
    pub move_number: Option<u32>,
}

impl fmt::Display for DatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", date_label(self.date), self.reason)
    }
}

/// Outcome of a whole sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Dates whose log was actually validated.
    pub tested: usize,
    pub complete: Vec<NaiveDate>,
    pub failed: Vec<DatedReason>,
    pub incomplete: Vec<DatedReason>,
    /// Dates aborted by a generator, I/O or web server problem.
    pub errored: Vec<DatedReason>,
}

impl BatchSummary {
    pub fn record(&mut self, date: NaiveDate, verdict: &Verdict) {
        self.tested += 1;
        match verdict {
            Verdict::Complete => self.complete.push(date),
            Verdict::Incomplete(reason) => self.incomplete.push(DatedReason {
                date,
                reason: reason.to_string(),
                move_number: None,
            }),
            Verdict::Failed(violation) => self.failed.push(DatedReason {
                date,
                reason: violation.to_string(),
                move_number: violation.move_number(),
            }),
        }
    }

    pub fn record_error(&mut self, date: NaiveDate, reason: impl Into<String>) {
        self.errored.push(DatedReason {
            date,
            reason: reason.into(),
            move_number: None,
        });
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "tested: {}", self.tested);
        let _ = writeln!(out, "complete: {}", self.complete.len());
        render_list(&mut out, "failed", &self.failed);
        render_list(&mut out, "incomplete", &self.incomplete);
        render_list(&mut out, "errored", &self.errored);
        out
    }
}

fn render_list(out: &mut String, title: &str, entries: &[DatedReason]) {
    let _ = writeln!(out, "{}: {}", title, entries.len());
    for entry in entries {
        let _ = writeln!(out, "  {}", entry);
    }
}

/// Text of `test-DD-MM-YYYY.txt`.
pub fn render_date_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    match &report.verdict {
        Verdict::Failed(violation) => {
            let _ = writeln!(out, "{}", violation);
            if let Some(number) = violation.move_number() {
                let _ = writeln!(out, "failed at move: {}", number);
            }
        }
        verdict => {
            let _ = writeln!(out, "{}", verdict);
        }
    }
    let _ = writeln!(out, "moves accepted: {}", report.moves_accepted);
    let _ = writeln!(out, "sensor reads: {}", report.sensor_reads.len());
    let _ = writeln!(out, "final location: {}", report.final_location);
    out
}

pub fn write_date_report(dir: &Path, date: NaiveDate, report: &ValidationReport) -> Result<PathBuf> {
    let path = dir.join(date_report_name(date));
    fs::write(&path, render_date_report(report))
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(path)
}

pub fn write_summary(path: &Path, summary: &BatchSummary) -> Result<()> {
    fs::write(path, summary.render())
        .with_context(|| format!("Failed to write summary {}", path.display()))
}
