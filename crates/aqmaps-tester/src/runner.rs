//! Sequential sweep over test dates.

use crate::generator::PathGenerator;
use crate::provider::GeoDataProvider;
use crate::report::{date_label, write_date_report, BatchSummary};
use anyhow::{Context, Result};
use aqmaps_core::{FlightContext, FlightRules, Point, ValidationReport, Validator, Verdict};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

/// Generates, validates and reports one flight per date.
pub struct BatchRunner<G, P> {
    generator: G,
    provider: P,
    output_dir: PathBuf,
    start: Point,
    rules: FlightRules,
}

impl<G: PathGenerator, P: GeoDataProvider> BatchRunner<G, P> {
    pub fn new(generator: G, provider: P, output_dir: impl Into<PathBuf>, start: Point) -> Self {
        Self {
            generator,
            provider,
            output_dir: output_dir.into(),
            start,
            rules: FlightRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: FlightRules) -> Self {
        self.rules = rules;
        self
    }

    /// Test every date in order.
    ///
    /// Validation failures land in the summary's failed/incomplete lists;
    /// a date that could not be tested at all lands in `errored` and the
    /// sweep moves on.
    pub fn run(&self, dates: impl IntoIterator<Item = NaiveDate>) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for date in dates {
            match self.test_date(date) {
                Ok(report) => summary.record(date, &report.verdict),
                Err(err) => {
                    tracing::error!("Testing {} aborted: {:#}", date_label(date), err);
                    summary.record_error(date, format!("{:#}", err));
                }
            }
        }

        tracing::info!(
            "Sweep finished: {} tested, {} complete, {} failed, {} incomplete, {} errored",
            summary.tested,
            summary.complete.len(),
            summary.failed.len(),
            summary.incomplete.len(),
            summary.errored.len()
        );
        summary
    }

    /// Generate and validate the flight for a single date.
    pub fn test_date(&self, date: NaiveDate) -> Result<ValidationReport> {
        let label = date_label(date);
        tracing::info!("Testing {}...", label);

        let log_path = self
            .generator
            .generate(date, self.start)
            .with_context(|| format!("Flight generation failed for {}", label))?;

        let no_fly_zones = self.provider.no_fly_zones()?;
        let sensors = self.provider.sensors(date)?;

        let contents = fs::read_to_string(&log_path)
            .with_context(|| format!("Failed to read flight log {}", log_path.display()))?;

        let context = FlightContext::new(self.start, no_fly_zones, sensors);
        let report = Validator::with_rules(self.rules.clone(), &context).validate_log(&contents);

        write_date_report(&self.output_dir, date, &report)?;

        match &report.verdict {
            Verdict::Complete => tracing::info!("Passed {} :)", label),
            Verdict::Incomplete(reason) => tracing::info!("Incomplete {}: {}", label, reason),
            Verdict::Failed(violation) => tracing::warn!("Failed {}: {}", label, violation),
        }
        Ok(report)
    }
}
