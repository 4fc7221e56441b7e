//! Rules and thresholds a flight log is checked against.

use serde::{Deserialize, Serialize};

/// Configuration for flight validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRules {
    /// Tolerance when comparing two points (coordinate units)
    pub epsilon: f64,
    /// Length of every move (coordinate units)
    pub unit_step: f64,
    /// A sensor can only be read from strictly closer than this
    pub sensor_radius: f64,
    /// Logs with more moves than this are rejected outright
    pub max_moves: usize,
    /// Distinct sensor reads needed for a complete flight
    pub required_reads: usize,
    /// Angles must be a multiple of this (degrees)
    pub angle_step: i32,
}

impl Default for FlightRules {
    fn default() -> Self {
        Self {
            epsilon: 0.00001,
            unit_step: 0.0003,
            sensor_radius: 0.0002,
            max_moves: 150,
            required_reads: 33,
            angle_step: 10,
        }
    }
}

impl FlightRules {
    /// Angle lies in [0, 360).
    pub fn angle_in_range(&self, angle: i32) -> bool {
        (0..360).contains(&angle)
    }

    /// Angle is quantized to the compass step.
    pub fn angle_on_step(&self, angle: i32) -> bool {
        angle.rem_euclid(self.angle_step) == 0
    }
}
