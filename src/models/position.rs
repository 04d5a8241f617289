// ABOUTME: Geographic position shared with guardians during a call

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
}

impl Position {
    /// Position from degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}
