//! Simulation control: route editing, run state machine and tick driving

pub mod controller;
pub mod error;
pub mod runner;
pub mod ticker;

pub use controller::{SimulationController, SimulationPhase, SimulationState, TickReport};
pub use error::{SimulationError, SimulationResult};
pub use runner::{run_simulation, RunSummary};
pub use ticker::{IntervalTicker, ManualTicker, StopHandle, Ticker};
