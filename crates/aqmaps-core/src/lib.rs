pub mod flight_log;
pub mod geometry;
pub mod models;
pub mod rules;
pub mod validator;

pub use flight_log::{log_lines, parse_line, ParseError};
pub use models::{FlightContext, Move, Point, Polygon, Sensor, SensorLookup};
pub use rules::FlightRules;
pub use validator::{IncompleteReason, ValidationReport, Validator, Verdict, Violation};
