//! Batch sweep tests with in-memory map data and scripted flight logs.

use anyhow::{bail, Result};
use aqmaps_core::geometry::project_by_angle;
use aqmaps_core::models::DEFAULT_START;
use aqmaps_core::{Point, Polygon, Sensor, SensorLookup, Verdict, Violation};
use aqmaps_tester::generator::flight_log_name;
use aqmaps_tester::report::{date_report_name, write_summary};
use aqmaps_tester::{BatchRunner, GeoDataProvider, PathGenerator, SingleLog};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

const STEP: f64 = 0.0003;

/// Writes a canned log for known dates; unknown dates produce no file,
/// like a controller that crashed.
struct ScriptedGenerator {
    dir: PathBuf,
    logs: HashMap<NaiveDate, String>,
}

impl PathGenerator for ScriptedGenerator {
    fn generate(&self, date: NaiveDate, _start: Point) -> Result<PathBuf> {
        let path = self.dir.join(flight_log_name(date));
        if let Some(log) = self.logs.get(&date) {
            fs::write(&path, log)?;
        }
        Ok(path)
    }
}

struct FixtureProvider {
    sensors: SensorLookup,
    no_fly_zones: Vec<Polygon>,
    unreachable_on: Option<NaiveDate>,
}

impl GeoDataProvider for FixtureProvider {
    fn no_fly_zones(&self) -> Result<Vec<Polygon>> {
        Ok(self.no_fly_zones.clone())
    }

    fn sensors(&self, date: NaiveDate) -> Result<SensorLookup> {
        if self.unreachable_on == Some(date) {
            bail!("connection refused");
        }
        Ok(self.sensors.clone())
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 2, day).unwrap()
}

/// East/west shuttle of `moves` steps; the first `reads` moves read a
/// sensor sitting exactly at their end point.
fn shuttle_log(moves: usize, reads: usize) -> (String, Vec<Sensor>) {
    let mut current = DEFAULT_START;
    let mut log = String::new();
    let mut sensors = Vec::new();

    for idx in 0..moves {
        let angle = if idx % 2 == 0 { 0 } else { 180 };
        let after = project_by_angle(current, angle, STEP);
        let code = if idx < reads {
            let code = format!("sensor.number.{idx}");
            sensors.push(Sensor {
                code: code.clone(),
                location: after,
                battery: 80.0,
                reading: "33.1".to_string(),
            });
            code
        } else {
            "null".to_string()
        };
        log.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            idx + 1,
            current.lng,
            current.lat,
            angle,
            after.lng,
            after.lat,
            code
        ));
        current = after;
    }
    (log, sensors)
}

/// Move the `before` longitude of the log line at `index`.
fn shift_move_start(log: &str, index: usize, dlng: f64) -> String {
    log.lines()
        .enumerate()
        .map(|(i, line)| {
            if i != index {
                return format!("{line}\n");
            }
            let mut fields: Vec<String> = line.split(',').map(str::to_string).collect();
            let lng: f64 = fields[1].parse().unwrap();
            fields[1] = (lng + dlng).to_string();
            format!("{}\n", fields.join(","))
        })
        .collect()
}

fn lookup(sensors: Vec<Sensor>) -> SensorLookup {
    sensors
        .into_iter()
        .map(|sensor| (sensor.code.clone(), sensor))
        .collect()
}

#[test]
fn sweep_sorts_dates_into_outcomes() {
    let dir = tempdir().unwrap();

    let (complete_log, sensors) = shuttle_log(34, 33);
    let (incomplete_log, _) = shuttle_log(4, 0);
    // Second move claims to start somewhere else.
    let broken_log = shift_move_start(&complete_log, 1, 0.0001);

    let logs = HashMap::from([
        (date(1), complete_log),
        (date(2), broken_log),
        (date(3), incomplete_log),
    ]);
    let generator = ScriptedGenerator {
        dir: dir.path().to_path_buf(),
        logs,
    };
    let provider = FixtureProvider {
        sensors: lookup(sensors),
        no_fly_zones: Vec::new(),
        unreachable_on: None,
    };

    let runner = BatchRunner::new(generator, provider, dir.path(), DEFAULT_START);
    let summary = runner.run([date(1), date(2), date(3), date(4)]);

    assert_eq!(summary.tested, 3);
    assert_eq!(summary.complete, vec![date(1)]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].date, date(2));
    assert_eq!(summary.incomplete.len(), 1);
    assert_eq!(summary.incomplete[0].date, date(3));
    assert_eq!(summary.incomplete[0].reason, "collected 0 of 33 sensor reads");

    // Missing log is an environment problem, not a failed flight.
    assert_eq!(summary.errored.len(), 1);
    assert_eq!(summary.errored[0].date, date(4));
    assert!(summary.errored[0].reason.contains("Failed to read flight log"));

    let complete_report = fs::read_to_string(dir.path().join(date_report_name(date(1)))).unwrap();
    assert!(complete_report.starts_with("complete\n"));
    assert!(complete_report.contains("sensor reads: 33\n"));
    assert!(!dir.path().join(date_report_name(date(4))).exists());

    let summary_path = dir.path().join("summary.txt");
    write_summary(&summary_path, &summary).unwrap();
    let text = fs::read_to_string(summary_path).unwrap();
    assert!(text.starts_with("tested: 3\ncomplete: 1\n"));
    assert!(text.contains("errored: 1\n  04-02-2020: "));
}

#[test]
fn broken_chain_reports_move_number() {
    let dir = tempdir().unwrap();
    let (log, sensors) = shuttle_log(6, 0);
    let broken = shift_move_start(&log, 2, -0.00005);

    let generator = ScriptedGenerator {
        dir: dir.path().to_path_buf(),
        logs: HashMap::from([(date(5), broken)]),
    };
    let provider = FixtureProvider {
        sensors: lookup(sensors),
        no_fly_zones: Vec::new(),
        unreachable_on: None,
    };
    let runner = BatchRunner::new(generator, provider, dir.path(), DEFAULT_START);

    let report = runner.test_date(date(5)).unwrap();
    assert_eq!(report.moves_accepted, 2);
    assert_eq!(
        report.verdict,
        Verdict::Failed(Violation::InconsistentCurrentLocation(3))
    );
}

#[test]
fn unreachable_web_server_aborts_only_that_date() {
    let dir = tempdir().unwrap();
    let (log, _) = shuttle_log(2, 0);
    let generator = ScriptedGenerator {
        dir: dir.path().to_path_buf(),
        logs: HashMap::from([(date(6), log.clone()), (date(7), log)]),
    };
    let provider = FixtureProvider {
        sensors: SensorLookup::new(),
        no_fly_zones: Vec::new(),
        unreachable_on: Some(date(6)),
    };

    let runner = BatchRunner::new(generator, provider, dir.path(), DEFAULT_START);
    let summary = runner.run([date(6), date(7)]);

    assert_eq!(summary.tested, 1);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.errored.len(), 1);
    assert!(summary.errored[0].reason.contains("connection refused"));
    assert_eq!(summary.incomplete.len(), 1);
    assert_eq!(summary.incomplete[0].date, date(7));
}

#[test]
fn no_fly_zone_on_route_fails_flight() {
    let dir = tempdir().unwrap();
    let (log, _) = shuttle_log(2, 0);
    let mid = DEFAULT_START.lng + STEP / 2.0;
    let building = Polygon::new(vec![
        Point::new(mid - 0.00001, DEFAULT_START.lat - 0.00005),
        Point::new(mid + 0.00001, DEFAULT_START.lat - 0.00005),
        Point::new(mid + 0.00001, DEFAULT_START.lat + 0.00005),
        Point::new(mid - 0.00001, DEFAULT_START.lat + 0.00005),
    ]);

    let generator = ScriptedGenerator {
        dir: dir.path().to_path_buf(),
        logs: HashMap::from([(date(8), log)]),
    };
    let provider = FixtureProvider {
        sensors: SensorLookup::new(),
        no_fly_zones: vec![building],
        unreachable_on: None,
    };
    let runner = BatchRunner::new(generator, provider, dir.path(), DEFAULT_START);

    let summary = runner.run([date(8)]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].reason, "intersects no fly zone in move: 1");
    assert_eq!(summary.failed[0].move_number, Some(1));
}

#[test]
fn named_log_is_checked_and_reported_in_output_dir() {
    let logs = tempdir().unwrap();
    let reports = tempdir().unwrap();
    let (log, sensors) = shuttle_log(34, 33);
    let log_path = logs.path().join("drone-a.txt");
    fs::write(&log_path, log).unwrap();

    let provider = FixtureProvider {
        sensors: lookup(sensors),
        no_fly_zones: Vec::new(),
        unreachable_on: None,
    };
    let runner = BatchRunner::new(SingleLog::new(&log_path), provider, reports.path(), DEFAULT_START);

    let report = runner.test_date(date(9)).unwrap();
    assert_eq!(report.verdict, Verdict::Complete);
    let text = fs::read_to_string(reports.path().join(date_report_name(date(9)))).unwrap();
    assert!(text.starts_with("complete\n"));
    assert!(!logs.path().join(date_report_name(date(9))).exists());
}
