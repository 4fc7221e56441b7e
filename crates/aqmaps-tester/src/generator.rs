//! Flight path generation.

use anyhow::{Context, Result};
use aqmaps_core::Point;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name the generator gives the log for `date`.
pub fn flight_log_name(date: NaiveDate) -> String {
    format!("flightpath-{}.txt", date.format("%d-%m-%Y"))
}

/// Something that produces a flight log for a date.
pub trait PathGenerator {
    /// Produce the log for `date` starting at `start` and return its path.
    fn generate(&self, date: NaiveDate, start: Point) -> Result<PathBuf>;
}

/// Runs the packaged drone controller:
/// `java -jar <jar> DD MM YYYY <lat> <lng> <generator_port> <web_port>`.
pub struct JarGenerator {
    pub jar: PathBuf,
    pub working_dir: PathBuf,
    pub generator_port: u16,
    pub web_port: u16,
}

impl JarGenerator {
    fn arguments(&self, date: NaiveDate, start: Point) -> Vec<String> {
        vec![
            date.format("%d").to_string(),
            date.format("%m").to_string(),
            date.format("%Y").to_string(),
            start.lat.to_string(),
            start.lng.to_string(),
            self.generator_port.to_string(),
            self.web_port.to_string(),
        ]
    }
}

impl PathGenerator for JarGenerator {
    fn generate(&self, date: NaiveDate, start: Point) -> Result<PathBuf> {
        let status = Command::new("java")
            .arg("-jar")
            .arg(&self.jar)
            .args(self.arguments(date, start))
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("Failed to launch generator {}", self.jar.display()))?;

        // The controller's exit code is not part of its contract; a missing
        // log is caught when it is read.
        if !status.success() {
            tracing::warn!("Generator exited with {} for {}", status, date);
        }

        Ok(self.working_dir.join(flight_log_name(date)))
    }
}

/// Uses logs that were generated earlier.
pub struct ExistingLogs {
    pub dir: PathBuf,
}

impl ExistingLogs {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl PathGenerator for ExistingLogs {
    fn generate(&self, date: NaiveDate, _start: Point) -> Result<PathBuf> {
        Ok(self.dir.join(flight_log_name(date)))
    }
}

/// A single log file named on the command line, whatever the date.
pub struct SingleLog {
    pub path: PathBuf,
}

impl SingleLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PathGenerator for SingleLog {
    fn generate(&self, _date: NaiveDate, _start: Point) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}
