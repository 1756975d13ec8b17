//! Route Simulator
//!
//! Moves a simulated vehicle along a route of geographic waypoints at a
//! configurable speed and publishes its position, plus on-demand emergency
//! alerts, to a remote JSON key-value store.

pub mod core;
pub mod algorithms;
pub mod simulation;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{Cursor, Position, Waypoint, EARTH_RADIUS_M};
pub use crate::algorithms::{haversine_distance, Advance, PathFollower};
pub use crate::simulation::{
    run_simulation, IntervalTicker, ManualTicker, RunSummary, SimulationController, SimulationError,
    SimulationPhase, SimulationResult, StopHandle, Ticker, TickReport,
};
pub use crate::telemetry::{MockSink, RestSink, SinkError, SinkResult, TelemetrySink};
pub use crate::utils::{ConfigError, ConfigurationManager, SimulationConfig, SimulatorConfig, SinkConfig};
