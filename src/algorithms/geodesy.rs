//! Great-circle distance and planar interpolation helpers
//!
//! Distances use the haversine formula on a spherical earth. Interpolation is
//! a plain linear blend of latitude and longitude: cheap, and accurate enough
//! for the short segments a hand-drawn route is made of. It is not a geodesic.

use crate::core::{Position, Waypoint, EARTH_RADIUS_M};

/// Great-circle distance between two points (metres)
pub fn haversine_distance(from: &Waypoint, to: &Waypoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Linear interpolation of latitude and longitude independently.
///
/// `t = 0` yields `from` and `t = 1` yields `to` exactly.
pub fn interpolate(from: &Waypoint, to: &Waypoint, t: f64) -> Position {
    Position::from_vector(from.to_vector().lerp(&to.to_vector(), t))
}

/// Interpolation parameter for `progress_m` along a segment of `length_m`.
/// Degenerate (zero-length) segments map to the segment start.
pub fn segment_fraction(progress_m: f64, length_m: f64) -> f64 {
    if length_m > 0.0 {
        progress_m / length_m
    } else {
        0.0
    }
}
