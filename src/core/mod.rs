//! Core types and constants for the route simulator

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
