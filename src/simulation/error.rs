//! Simulation error types

use thiserror::Error;

/// Errors reported by the route and simulation controls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Route too short to follow
    #[error("insufficient waypoints: {available} available, at least {required} required")]
    InsufficientWaypoints { available: usize, required: usize },
    /// Coordinate outside WGS84 bounds
    #[error("invalid waypoint: latitude {latitude}, longitude {longitude}")]
    InvalidWaypoint { latitude: f64, longitude: f64 },
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
