//! Core data types for the route simulator

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// User-specified route point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check the point lies within WGS84 bounds
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }

    pub(crate) fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.latitude, self.longitude)
    }
}

/// Simulated vehicle position, derived from the cursor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub(crate) fn from_vector(v: Vector2<f64>) -> Self {
        Self {
            latitude: v.x,
            longitude: v.y,
        }
    }
}

impl From<Waypoint> for Position {
    fn from(wp: Waypoint) -> Self {
        Self::new(wp.latitude, wp.longitude)
    }
}

/// Progress along a path: segment index plus metres travelled within it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub segment_index: usize,
    pub progress_m: f64,
}

impl Cursor {
    pub fn origin() -> Self {
        Self::default()
    }

    pub fn is_origin(&self) -> bool {
        self.segment_index == 0 && self.progress_m == 0.0
    }
}
