//! Flight log replay and validation.
//!
//! The validator walks the moves of one log in order, re-deriving where the
//! drone must be after every step, and stops at the first move that breaks
//! a rule. A log that survives every move is then classified as complete
//! or incomplete depending on sensor coverage and whether it returned home.

use crate::flight_log::{log_lines, parse_line, ParseError};
use crate::geometry::{
    distance, is_within, points_equal, project_by_angle, segment_intersects_polygon,
};
use crate::models::{FlightContext, Move, Point};
use crate::rules::FlightRules;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// The first rule a log broke.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("more than {limit} moves ({count})")]
    TooManyMoves { count: usize, limit: usize },

    #[error("malformed record on line {line}: {error}")]
    MalformedRecord { line: usize, error: ParseError },

    #[error("before location not in confined area, move: {0}")]
    BeforeOutsideArea(u32),

    #[error("after location not in confined area, move: {0}")]
    AfterOutsideArea(u32),

    #[error("inconsistent current location in move: {0}")]
    InconsistentCurrentLocation(u32),

    #[error("angle {angle} out of range in move: {number}")]
    AngleOutOfRange { number: u32, angle: i32 },

    #[error("angle {angle} not a multiple of {step} in move: {number}")]
    AngleOffStep { number: u32, angle: i32, step: i32 },

    #[error("inconsistent after location in move: {0}")]
    InconsistentAfterLocation(u32),

    #[error("intersects no fly zone in move: {0}")]
    IntersectsNoFlyZone(u32),

    #[error("non existent sensor {code} in move: {number}")]
    UnknownSensor { number: u32, code: String },

    #[error("tried reading too distant sensor {code} in move: {number}")]
    SensorTooDistant { number: u32, code: String },
}

impl Violation {
    /// Move number the violation is tagged with, if it concerns a single move.
    pub fn move_number(&self) -> Option<u32> {
        match self {
            Violation::TooManyMoves { .. } | Violation::MalformedRecord { .. } => None,
            Violation::BeforeOutsideArea(n)
            | Violation::AfterOutsideArea(n)
            | Violation::InconsistentCurrentLocation(n)
            | Violation::InconsistentAfterLocation(n)
            | Violation::IntersectsNoFlyZone(n) => Some(*n),
            Violation::AngleOutOfRange { number, .. }
            | Violation::AngleOffStep { number, .. }
            | Violation::UnknownSensor { number, .. }
            | Violation::SensorTooDistant { number, .. } => Some(*number),
        }
    }
}

/// Why a structurally valid flight did not finish its mission.
#[derive(Debug, Clone, PartialEq)]
pub enum IncompleteReason {
    NoMoves,
    MissingReads { collected: usize, required: usize },
    NotReturned { distance: f64 },
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::NoMoves => write!(f, "no moves recorded"),
            IncompleteReason::MissingReads {
                collected,
                required,
            } => write!(f, "collected {} of {} sensor reads", collected, required),
            IncompleteReason::NotReturned { distance } => {
                write!(f, "ended {:.6} away from start", distance)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every move valid, all sensors read, back near the start.
    Complete,
    /// Every move valid, but the mission was not finished.
    Incomplete(IncompleteReason),
    /// A move broke a rule; validation stopped there.
    Failed(Violation),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Complete => write!(f, "complete"),
            Verdict::Incomplete(reason) => write!(f, "incomplete: {}", reason),
            Verdict::Failed(violation) => write!(f, "failed: {}", violation),
        }
    }
}

/// Result of replaying one flight log.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub verdict: Verdict,
    /// Moves accepted before validation ended.
    pub moves_accepted: usize,
    /// Sensor codes read, in flight order.
    pub sensor_reads: Vec<String>,
    pub final_location: Point,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.verdict, Verdict::Complete)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match &self.verdict {
            Verdict::Failed(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Running state of one replay.
struct Replay {
    current: Point,
    origin: Option<Point>,
    accepted: usize,
    reads: Vec<String>,
}

impl Replay {
    fn new(start: Point) -> Self {
        Self {
            current: start,
            origin: None,
            accepted: 0,
            reads: Vec::new(),
        }
    }

    fn finish(self, verdict: Verdict) -> ValidationReport {
        ValidationReport {
            verdict,
            moves_accepted: self.accepted,
            sensor_reads: self.reads,
            final_location: self.current,
        }
    }
}

/// Replays flight logs against the data for one test date.
pub struct Validator<'a> {
    rules: FlightRules,
    context: &'a FlightContext,
}

impl<'a> Validator<'a> {
    pub fn new(context: &'a FlightContext) -> Self {
        Self::with_rules(FlightRules::default(), context)
    }

    pub fn with_rules(rules: FlightRules, context: &'a FlightContext) -> Self {
        Self { rules, context }
    }

    /// Validate the raw contents of a flight log file.
    ///
    /// A malformed line fails the log at that line, just like a rule
    /// violation would.
    pub fn validate_log(&self, contents: &str) -> ValidationReport {
        let lines: Vec<(usize, &str)> = log_lines(contents).collect();
        let count = lines.len();
        let moves = lines.into_iter().map(|(line, text)| {
            parse_line(text).map_err(|error| Violation::MalformedRecord { line, error })
        });
        self.replay(count, moves)
    }

    /// Validate already parsed moves.
    pub fn validate_moves(&self, moves: &[Move]) -> ValidationReport {
        self.replay(moves.len(), moves.iter().cloned().map(Ok))
    }

    fn replay<I>(&self, count: usize, moves: I) -> ValidationReport
    where
        I: Iterator<Item = Result<Move, Violation>>,
    {
        let mut replay = Replay::new(self.context.start);

        if count > self.rules.max_moves {
            tracing::info!("Rejecting log with {} moves", count);
            return replay.finish(Verdict::Failed(Violation::TooManyMoves {
                count,
                limit: self.rules.max_moves,
            }));
        }

        for mv in moves {
            let checked =
                mv.and_then(|mv| self.check_move(replay.current, &mv).map(|read| (mv, read)));
            match checked {
                Ok((mv, read)) => {
                    tracing::trace!("Accepted move {} -> {}", mv.number, mv.after);
                    replay.origin.get_or_insert(mv.before);
                    replay.current = mv.after;
                    replay.accepted += 1;
                    replay.reads.extend(read);
                }
                Err(violation) => {
                    tracing::debug!("Rejected log: {}", violation);
                    return replay.finish(Verdict::Failed(violation));
                }
            }
        }

        let verdict = self.classify(&replay);
        replay.finish(verdict)
    }

    /// Check a single move against the running location.
    ///
    /// Returns the sensor code read by this move, if any.
    pub fn check_move(&self, current: Point, mv: &Move) -> Result<Option<String>, Violation> {
        let rules = &self.rules;
        let number = mv.number;

        if !is_within(mv.before, &self.context.confinement) {
            return Err(Violation::BeforeOutsideArea(number));
        }
        if !is_within(mv.after, &self.context.confinement) {
            return Err(Violation::AfterOutsideArea(number));
        }
        if !points_equal(current, mv.before, rules.epsilon) {
            return Err(Violation::InconsistentCurrentLocation(number));
        }
        if !rules.angle_in_range(mv.angle) {
            return Err(Violation::AngleOutOfRange {
                number,
                angle: mv.angle,
            });
        }
        if !rules.angle_on_step(mv.angle) {
            return Err(Violation::AngleOffStep {
                number,
                angle: mv.angle,
                step: rules.angle_step,
            });
        }

        let expected_after = project_by_angle(current, mv.angle, rules.unit_step);
        if !points_equal(mv.after, expected_after, rules.epsilon) {
            return Err(Violation::InconsistentAfterLocation(number));
        }

        if self
            .context
            .no_fly_zones
            .iter()
            .any(|zone| segment_intersects_polygon(mv.before, mv.after, zone))
        {
            return Err(Violation::IntersectsNoFlyZone(number));
        }

        let Some(code) = mv.sensor.as_deref() else {
            return Ok(None);
        };
        let Some(sensor) = self.context.sensors.get(code) else {
            return Err(Violation::UnknownSensor {
                number,
                code: code.to_string(),
            });
        };
        if distance(mv.after, sensor.location) >= rules.sensor_radius {
            return Err(Violation::SensorTooDistant {
                number,
                code: code.to_string(),
            });
        }
        Ok(Some(code.to_string()))
    }

    fn classify(&self, replay: &Replay) -> Verdict {
        let Some(origin) = replay.origin else {
            return Verdict::Incomplete(IncompleteReason::NoMoves);
        };

        let collected = replay.reads.iter().collect::<HashSet<_>>().len();
        if collected != self.rules.required_reads {
            return Verdict::Incomplete(IncompleteReason::MissingReads {
                collected,
                required: self.rules.required_reads,
            });
        }

        let gap = distance(origin, replay.current);
        if gap >= self.rules.unit_step {
            return Verdict::Incomplete(IncompleteReason::NotReturned { distance: gap });
        }

        Verdict::Complete
    }
}
