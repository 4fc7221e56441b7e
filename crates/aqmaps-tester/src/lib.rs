//! aqmaps tester - batch verification of generated drone flights.
//!
//! For every date of a sweep the flight path generator is run, the
//! resulting log is replayed against that day's map data and the verdict is
//! folded into a [`BatchSummary`].

pub mod calendar;
pub mod config;
pub mod generator;
pub mod provider;
pub mod report;
pub mod runner;

pub use calendar::{sweep_dates, CalendarMode};
pub use config::Config;
pub use generator::{flight_log_name, ExistingLogs, JarGenerator, PathGenerator, SingleLog};
pub use provider::GeoDataProvider;
pub use report::{BatchSummary, DatedReason};
pub use runner::BatchRunner;
