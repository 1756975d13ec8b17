//! Path following along a polyline of geographic waypoints
//!
//! A [`PathFollower`] owns an immutable route and a cursor expressed as
//! (segment index, metres into that segment). Each call to
//! [`PathFollower::advance`] consumes a travel distance, crossing as many
//! segment boundaries as needed, and either wraps to the start (looping
//! routes) or clamps at the final waypoint and reports arrival.

use crate::algorithms::geodesy::{haversine_distance, interpolate, segment_fraction};
use crate::core::{Cursor, Position, Waypoint, DISTANCE_EPSILON_M, MIN_WAYPOINTS};
use crate::simulation::error::{SimulationError, SimulationResult};

/// Outcome of advancing the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Still travelling; position after the advance
    EnRoute(Position),
    /// Non-looping route exhausted; the cursor is clamped at the last waypoint
    Arrived(Position),
}

impl Advance {
    pub fn position(&self) -> Position {
        match self {
            Advance::EnRoute(position) | Advance::Arrived(position) => *position,
        }
    }

    pub fn is_arrived(&self) -> bool {
        matches!(self, Advance::Arrived(_))
    }
}

/// Moves a cursor along a fixed route
#[derive(Debug, Clone)]
pub struct PathFollower {
    /// Route waypoints (at least two)
    waypoints: Vec<Waypoint>,
    /// Haversine length of each segment, `waypoints.len() - 1` entries
    segment_lengths: Vec<f64>,
    /// Sum of all segment lengths (metres)
    total_length_m: f64,
    /// Wrap to the first waypoint instead of stopping at the last
    looping: bool,
    cursor: Cursor,
    arrived: bool,
}

impl PathFollower {
    /// Create a follower positioned at the first waypoint
    pub fn new(waypoints: Vec<Waypoint>, looping: bool) -> SimulationResult<Self> {
        if waypoints.len() < MIN_WAYPOINTS {
            return Err(SimulationError::InsufficientWaypoints {
                available: waypoints.len(),
                required: MIN_WAYPOINTS,
            });
        }

        let segment_lengths: Vec<f64> = waypoints
            .windows(2)
            .map(|pair| haversine_distance(&pair[0], &pair[1]))
            .collect();
        let total_length_m = segment_lengths.iter().sum();

        Ok(Self {
            waypoints,
            segment_lengths,
            total_length_m,
            looping,
            cursor: Cursor::origin(),
            arrived: false,
        })
    }

    /// Consume `distance_m` metres of travel.
    ///
    /// Non-positive or non-finite distances consume nothing. Once arrived,
    /// the follower stays put until [`reset`](Self::reset).
    pub fn advance(&mut self, distance_m: f64) -> Advance {
        if self.arrived {
            return Advance::Arrived(self.current_position());
        }
        if !(distance_m.is_finite() && distance_m > 0.0) {
            return Advance::EnRoute(self.current_position());
        }

        let mut remaining = distance_m;
        if self.looping {
            if self.total_length_m <= 0.0 {
                return Advance::EnRoute(self.current_position());
            }
            if remaining >= self.total_length_m {
                remaining %= self.total_length_m;
            }
        }

        let last_segment = self.segment_lengths.len() - 1;

        while remaining > DISTANCE_EPSILON_M {
            let segment_length = self.segment_lengths[self.cursor.segment_index];
            let left_in_segment = segment_length - self.cursor.progress_m;

            if remaining < left_in_segment - DISTANCE_EPSILON_M {
                self.cursor.progress_m += remaining;
                break;
            }

            remaining = (remaining - left_in_segment).max(0.0);

            if self.cursor.segment_index < last_segment {
                self.cursor.segment_index += 1;
                self.cursor.progress_m = 0.0;
            } else if self.looping {
                self.cursor = Cursor::origin();
            } else {
                self.cursor = Cursor {
                    segment_index: last_segment,
                    progress_m: segment_length,
                };
                self.arrived = true;
                return Advance::Arrived(self.current_position());
            }
        }

        Advance::EnRoute(self.current_position())
    }

    /// Position at the cursor
    pub fn current_position(&self) -> Position {
        let index = self.cursor.segment_index;
        let t = segment_fraction(self.cursor.progress_m, self.segment_lengths[index]).min(1.0);
        interpolate(&self.waypoints[index], &self.waypoints[index + 1], t)
    }

    /// Rewind to the first waypoint and clear arrival
    pub fn reset(&mut self) {
        self.cursor = Cursor::origin();
        self.arrived = false;
    }

    /// Great-circle length of segment `index` (metres)
    pub fn segment_length(&self, index: usize) -> Option<f64> {
        self.segment_lengths.get(index).copied()
    }

    /// Linear interpolation within segment `index`, `t` in `[0, 1]`
    pub fn interpolate(&self, index: usize, t: f64) -> Option<Position> {
        let from = self.waypoints.get(index)?;
        let to = self.waypoints.get(index + 1)?;
        Some(interpolate(from, to, t))
    }

    /// Distance covered since the first waypoint on the current lap (metres)
    pub fn distance_along_m(&self) -> f64 {
        let completed: f64 = self.segment_lengths[..self.cursor.segment_index].iter().sum();
        completed + self.cursor.progress_m
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Change looping for subsequent advances; an arrival stays terminal
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn total_length_m(&self) -> f64 {
        self.total_length_m
    }

    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_route() -> Vec<Waypoint> {
        vec![Waypoint::new(0.0, 0.0), Waypoint::new(0.0, 0.01)]
    }

    fn square_route() -> Vec<Waypoint> {
        vec![
            Waypoint::new(14.5995, 120.9842),
            Waypoint::new(14.6050, 120.9842),
            Waypoint::new(14.6050, 120.9900),
            Waypoint::new(14.5995, 120.9900),
        ]
    }

    #[test]
    fn test_requires_two_waypoints() {
        let result = PathFollower::new(vec![Waypoint::new(1.0, 1.0)], false);
        assert_eq!(
            result.unwrap_err(),
            SimulationError::InsufficientWaypoints { available: 1, required: 2 }
        );
        assert!(PathFollower::new(Vec::new(), true).is_err());
    }

    #[test]
    fn test_starts_at_first_waypoint() {
        let follower = PathFollower::new(square_route(), false).unwrap();
        assert!(follower.cursor().is_origin());
        assert_eq!(follower.current_position(), Position::new(14.5995, 120.9842));
        assert_eq!(follower.segment_count(), 3);
    }

    #[test]
    fn test_zero_advance_keeps_cursor() {
        let mut follower = PathFollower::new(square_route(), false).unwrap();
        follower.advance(120.0);
        let before = follower.cursor();
        for _ in 0..10 {
            follower.advance(0.0);
        }
        assert_eq!(follower.cursor(), before);

        follower.advance(-5.0);
        follower.advance(f64::NAN);
        assert_eq!(follower.cursor(), before);
    }

    #[test]
    fn test_three_ticks_at_eighteen_kmh() {
        let mut follower = PathFollower::new(north_route(), false).unwrap();
        let segment_length = follower.segment_length(0).unwrap();
        assert!((segment_length - 1112.0).abs() < 2.0, "got {}", segment_length);

        // 18 km/h for 10 s
        let per_tick: f64 = 18.0 * 1000.0 / 3600.0 * 10.0;
        assert!((per_tick - 50.0).abs() < 1e-9);

        let mut outcome = follower.advance(per_tick);
        for _ in 0..2 {
            outcome = follower.advance(per_tick);
        }

        assert!(!outcome.is_arrived());
        let cursor = follower.cursor();
        assert_eq!(cursor.segment_index, 0);
        assert!((cursor.progress_m - 150.0).abs() < 1e-9);

        let position = outcome.position();
        assert_eq!(position.latitude, 0.0);
        let expected = 0.01 * 150.0 / segment_length;
        assert!((position.longitude - expected).abs() < 1e-12);
    }

    #[test]
    fn test_crosses_multiple_segments_in_one_call() {
        let mut follower = PathFollower::new(square_route(), false).unwrap();
        let first = follower.segment_length(0).unwrap();
        let second = follower.segment_length(1).unwrap();

        follower.advance(first + second + 10.0);
        let cursor = follower.cursor();
        assert_eq!(cursor.segment_index, 2);
        assert!((cursor.progress_m - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_lands_exactly_on_boundary() {
        let mut follower = PathFollower::new(square_route(), false).unwrap();
        let first = follower.segment_length(0).unwrap();

        let outcome = follower.advance(first);
        assert!(!outcome.is_arrived());
        assert_eq!(follower.cursor(), Cursor { segment_index: 1, progress_m: 0.0 });
        assert_eq!(outcome.position(), Position::new(14.6050, 120.9842));
    }

    #[test]
    fn test_arrival_on_open_route() {
        let mut follower = PathFollower::new(north_route(), false).unwrap();
        let length = follower.total_length_m();

        let outcome = follower.advance(length * 0.6);
        assert!(!outcome.is_arrived());

        let outcome = follower.advance(length * 0.6);
        assert_eq!(outcome, Advance::Arrived(Position::new(0.0, 0.01)));
        assert!(follower.has_arrived());

        let clamped = follower.cursor();
        assert_eq!(clamped.segment_index, 0);
        assert_eq!(clamped.progress_m, length);

        // No further distance is consumed
        let outcome = follower.advance(500.0);
        assert!(outcome.is_arrived());
        assert_eq!(follower.cursor(), clamped);
    }

    #[test]
    fn test_exact_length_arrives() {
        let mut follower = PathFollower::new(square_route(), false).unwrap();
        let total = follower.total_length_m();
        let outcome = follower.advance(total);
        assert_eq!(outcome, Advance::Arrived(Position::new(14.5995, 120.9900)));
    }

    #[test]
    fn test_full_loop_returns_to_origin() {
        let mut follower = PathFollower::new(north_route(), true).unwrap();
        let outcome = follower.advance(follower.total_length_m());
        assert!(!outcome.is_arrived());
        assert!(follower.cursor().is_origin());

        let mut follower = PathFollower::new(square_route(), true).unwrap();
        let total = follower.total_length_m();
        follower.advance(total);
        assert!(follower.cursor().is_origin());
        assert_eq!(follower.current_position(), Position::new(14.5995, 120.9842));
    }

    #[test]
    fn test_loop_in_steps_wraps_to_origin() {
        let mut follower = PathFollower::new(square_route(), true).unwrap();
        for i in 0..follower.segment_count() {
            let length = follower.segment_length(i).unwrap();
            follower.advance(length);
        }
        assert!(follower.cursor().is_origin());
    }

    #[test]
    fn test_loop_wraps_with_remainder() {
        let mut follower = PathFollower::new(north_route(), true).unwrap();
        let length = follower.total_length_m();

        let outcome = follower.advance(length * 2.0 + 100.0);
        assert!(!outcome.is_arrived());
        let cursor = follower.cursor();
        assert_eq!(cursor.segment_index, 0);
        assert!((cursor.progress_m - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_segments() {
        let route = vec![
            Waypoint::new(1.0, 1.0),
            Waypoint::new(1.0, 1.0),
            Waypoint::new(1.0, 1.01),
        ];
        let mut follower = PathFollower::new(route, false).unwrap();
        assert_eq!(follower.segment_length(0), Some(0.0));
        assert_eq!(follower.current_position(), Position::new(1.0, 1.0));

        let outcome = follower.advance(10.0);
        assert!(!outcome.is_arrived());
        assert_eq!(follower.cursor().segment_index, 1);
        assert!((follower.cursor().progress_m - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_loop_does_not_spin() {
        let route = vec![Waypoint::new(5.0, 5.0), Waypoint::new(5.0, 5.0)];
        let mut follower = PathFollower::new(route.clone(), true).unwrap();
        let outcome = follower.advance(1000.0);
        assert_eq!(outcome, Advance::EnRoute(Position::new(5.0, 5.0)));
        assert!(follower.cursor().is_origin());

        let mut follower = PathFollower::new(route, false).unwrap();
        assert!(follower.advance(1.0).is_arrived());
    }

    #[test]
    fn test_reset_clears_arrival() {
        let mut follower = PathFollower::new(north_route(), false).unwrap();
        follower.advance(10_000.0);
        assert!(follower.has_arrived());

        follower.reset();
        assert!(!follower.has_arrived());
        assert!(follower.cursor().is_origin());
        assert!(!follower.advance(50.0).is_arrived());
    }

    #[test]
    fn test_interpolate_bounds() {
        let follower = PathFollower::new(square_route(), false).unwrap();
        assert_eq!(follower.interpolate(1, 0.0), Some(Position::new(14.6050, 120.9842)));
        assert_eq!(follower.interpolate(1, 1.0), Some(Position::new(14.6050, 120.9900)));
        assert_eq!(follower.interpolate(3, 0.5), None);
        assert_eq!(follower.segment_length(3), None);
    }

    #[test]
    fn test_distance_along() {
        let mut follower = PathFollower::new(square_route(), false).unwrap();
        let first = follower.segment_length(0).unwrap();
        follower.advance(first + 25.0);
        assert!((follower.distance_along_m() - (first + 25.0)).abs() < 1e-6);
    }
}
