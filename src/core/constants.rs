//! Physical constants and system parameters

/// Mean earth radius used for great-circle distances (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum number of waypoints needed to form a path
pub const MIN_WAYPOINTS: usize = 2;

/// Distances below this are treated as already consumed (m)
pub const DISTANCE_EPSILON_M: f64 = 1e-9;

pub const METERS_PER_KM: f64 = 1000.0;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Entity identifier used when none is configured
pub const DEFAULT_ENTITY_ID: &str = "BOAT_001";
