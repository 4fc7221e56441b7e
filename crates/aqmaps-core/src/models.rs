//! Core data models for flight verification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A (longitude, latitude) pair in plain coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lng: f64,
    pub lat: f64,
}

impl Point {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for Point {
    /// GeoJSON ordering: `[lng, lat]`.
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}

/// Start location used by the generator unless overridden.
pub const DEFAULT_START: Point = Point::new(-3.186922, 55.944871);

/// Corners of the confinement area.
pub const FORREST_HILL: Point = Point::new(-3.192473, 55.946233);
pub const KFC: Point = Point::new(-3.184319, 55.946233);
pub const BUCCLEUCH_ST: Point = Point::new(-3.184319, 55.942617);
pub const MEADOWS: Point = Point::new(-3.192473, 55.942617);

/// A closed ring of points (first == last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    ring: Vec<Point>,
}

impl Polygon {
    /// Build a polygon, closing the ring if the caller left it open.
    pub fn new(mut ring: Vec<Point>) -> Self {
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        Self { ring }
    }

    /// The rectangular region every flight must stay within.
    pub fn confinement_area() -> Self {
        Self::new(vec![FORREST_HILL, KFC, BUCCLEUCH_ST, MEADOWS])
    }

    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    /// Consecutive vertex pairs of the closed ring.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ring.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// One parsed line of a flight log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub number: u32,
    pub before: Point,
    pub after: Point,
    /// Compass angle in degrees, counterclockwise from east.
    pub angle: i32,
    /// Sensor the drone claims to have read at `after`.
    pub sensor: Option<String>,
}

/// An air-quality sensor with its resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Dotted three-word code, e.g. `slips.mass.baking`.
    pub code: String,
    pub location: Point,
    pub battery: f64,
    /// Raw reading payload as reported by the web server.
    pub reading: String,
}

pub type SensorLookup = HashMap<String, Sensor>;

/// Everything the validator needs to know about one test date.
#[derive(Debug, Clone)]
pub struct FlightContext {
    pub start: Point,
    pub confinement: Polygon,
    pub no_fly_zones: Vec<Polygon>,
    pub sensors: SensorLookup,
}

impl FlightContext {
    pub fn new(start: Point, no_fly_zones: Vec<Polygon>, sensors: SensorLookup) -> Self {
        Self {
            start,
            confinement: Polygon::confinement_area(),
            no_fly_zones,
            sensors,
        }
    }
}
