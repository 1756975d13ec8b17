//! Route geometry and motion algorithms

pub mod geodesy;
pub mod path_follower;

pub use geodesy::{haversine_distance, interpolate};
pub use path_follower::{Advance, PathFollower};
