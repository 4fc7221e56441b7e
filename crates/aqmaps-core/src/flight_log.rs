//! Parser for `flightpath-DD-MM-YYYY.txt` logs.
//!
//! One move per line:
//! `move,before_lng,before_lat,angle,after_lng,after_lat,sensor`

use crate::models::{Move, Point};
use thiserror::Error;

const FIELD_COUNT: usize = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected 7 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parse one log line into a [`Move`].
pub fn parse_line(line: &str) -> Result<Move, ParseError> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let number = parse_field(fields[0], "move")?;
    let before = Point::new(
        parse_field(fields[1], "before_lng")?,
        parse_field(fields[2], "before_lat")?,
    );
    let angle = parse_field(fields[3], "angle")?;
    let after = Point::new(
        parse_field(fields[4], "after_lng")?,
        parse_field(fields[5], "after_lat")?,
    );

    Ok(Move {
        number,
        before,
        after,
        angle,
        sensor: sensor_code(fields[6]),
    })
}

/// Non-blank lines of a log, tagged with their 1-based line number.
pub fn log_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

/// The generator writes `null` (or nothing) when no sensor was read; only a
/// dotted code counts as a read attempt.
fn sensor_code(field: &str) -> Option<String> {
    if field.contains('.') {
        Some(field.to_string())
    } else {
        None
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
