//! aqmaps tester - generate and verify drone flights over a range of dates.

use anyhow::{Context, Result};
use aqmaps_client::WebServerClient;
use aqmaps_core::models::DEFAULT_START;
use aqmaps_core::Point;
use aqmaps_tester::report::{write_summary, SUMMARY_FILE};
use aqmaps_tester::{
    flight_log_name, sweep_dates, BatchRunner, CalendarMode, Config, ExistingLogs, JarGenerator,
    SingleLog,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Verify generated drone flight logs against the map rules
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and verify a flight for every date in a year range
    Sweep {
        /// First year of the sweep
        #[arg(long, default_value_t = 2020)]
        from_year: i32,

        /// Last year of the sweep (inclusive)
        #[arg(long, default_value_t = 2021)]
        to_year: i32,

        /// Use a fixed 28-day February instead of the real calendar
        #[arg(long)]
        fixed_february: bool,

        /// Verify logs already present in the output directory
        #[arg(long)]
        skip_generate: bool,

        /// Where logs, per-date reports and the summary are written
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        start: StartArgs,
    },
    /// Verify one existing flight log
    Check {
        /// Date of the flight (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Flight log to verify [default: <output-dir>/flightpath-DD-MM-YYYY.txt]
        #[arg(long)]
        log: Option<PathBuf>,

        /// Where the per-date report is written
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        start: StartArgs,
    },
}

#[derive(Args, Debug)]
struct StartArgs {
    /// Start latitude
    #[arg(long, default_value_t = DEFAULT_START.lat, allow_negative_numbers = true)]
    start_lat: f64,

    /// Start longitude
    #[arg(long, default_value_t = DEFAULT_START.lng, allow_negative_numbers = true)]
    start_lng: f64,
}

impl StartArgs {
    fn point(&self) -> Point {
        Point::new(self.start_lng, self.start_lat)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aqmaps_tester=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    if let Some(url_port) = config.port_conflict() {
        tracing::warn!(
            "AQMAPS_WEB_URL uses port {} but the generator is told {}",
            url_port,
            config.web_port
        );
    }
    let client = WebServerClient::new(&config.web_url, Duration::from_secs(config.http_timeout_secs))
        .context("Failed to create web server client")?;

    match cli.command {
        Command::Sweep {
            from_year,
            to_year,
            fixed_february,
            skip_generate,
            output_dir,
            start,
        } => {
            let mode = if fixed_february {
                CalendarMode::FixedFebruary
            } else {
                CalendarMode::Gregorian
            };
            let dates = sweep_dates(from_year, to_year, mode);
            tracing::info!(
                "Sweeping {} dates against {} (start {})",
                dates.len(),
                config.web_url,
                start.point()
            );

            let summary = if skip_generate {
                BatchRunner::new(ExistingLogs::new(&output_dir), client, &output_dir, start.point())
                    .run(dates)
            } else {
                let generator = JarGenerator {
                    jar: config.generator_jar.clone(),
                    working_dir: output_dir.clone(),
                    generator_port: config.generator_port,
                    web_port: config.web_port,
                };
                BatchRunner::new(generator, client, &output_dir, start.point()).run(dates)
            };

            let summary_path = output_dir.join(SUMMARY_FILE);
            write_summary(&summary_path, &summary)?;
            tracing::info!("Summary written to {}", summary_path.display());
        }
        Command::Check {
            date,
            log,
            output_dir,
            start,
        } => {
            let log = log.unwrap_or_else(|| output_dir.join(flight_log_name(date)));
            tracing::info!("Checking {} as the flight of {}", log.display(), date);
            let runner = BatchRunner::new(SingleLog::new(log), client, &output_dir, start.point());
            let report = runner.test_date(date)?;
            println!("{}", report.verdict);
        }
    }

    Ok(())
}
