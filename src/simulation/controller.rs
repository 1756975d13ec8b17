//! Simulation controller
//!
//! Owns the editable route, the run state and the telemetry sink. All
//! mutation goes through `&mut self`, so whoever drives the ticks has
//! exclusive access to the cursor.

use crate::algorithms::path_follower::PathFollower;
use crate::core::{Cursor, Position, Waypoint, MIN_WAYPOINTS};
use crate::simulation::error::{SimulationError, SimulationResult};
use crate::telemetry::{AlertReceipt, AlertRecord, SignalQuality, SinkResult, StateRecord, TelemetrySink};
use crate::utils::config::{SimulationConfig, SimulatorConfig};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationPhase {
    /// No run started (or reset)
    #[default]
    Idle,
    /// Cursor advances on every tick
    Running,
    /// Cursor frozen, resumable
    Paused,
    /// Non-looping route exhausted
    Arrived,
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationPhase::Idle => "idle",
            SimulationPhase::Running => "running",
            SimulationPhase::Paused => "paused",
            SimulationPhase::Arrived => "arrived",
        };
        f.write_str(name)
    }
}

/// Mutable run state
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    phase: SimulationPhase,
    /// Present once a run has started; holds a snapshot of the route
    follower: Option<PathFollower>,
    last_position: Option<Position>,
    ticks: u64,
}

impl SimulationState {
    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.follower.as_ref().map(PathFollower::cursor)
    }

    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    /// Ticks since the current run started
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn follower(&self) -> Option<&PathFollower> {
        self.follower.as_ref()
    }
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick number within the run
    pub sequence: u64,
    pub position: Position,
    /// Distance requested for this tick (metres)
    pub distance_m: f64,
    pub arrived: bool,
    /// Outcome of publishing the state record
    pub publish: SinkResult<u16>,
}

/// Single owner of route, run state and sink
pub struct SimulationController<S: TelemetrySink> {
    route: Vec<Waypoint>,
    config: SimulationConfig,
    entity_id: String,
    sink: S,
    rng: StdRng,
    state: SimulationState,
}

impl<S: TelemetrySink> SimulationController<S> {
    pub fn new(config: SimulationConfig, entity_id: &str, sink: S) -> Self {
        Self {
            route: Vec::new(),
            config,
            entity_id: entity_id.to_string(),
            sink,
            rng: StdRng::from_entropy(),
            state: SimulationState::default(),
        }
    }

    /// Build a controller with the configured route preloaded
    pub fn from_config(config: &SimulatorConfig, sink: S) -> SimulationResult<Self> {
        let mut controller = Self::new(config.simulation.clone(), config.sink.effective_entity_id(), sink);
        for waypoint in &config.route {
            controller.add_waypoint(waypoint.latitude, waypoint.longitude)?;
        }
        Ok(controller)
    }

    /// Use a specific random source for the mocked signal metrics
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Append a waypoint to the route
    pub fn add_waypoint(&mut self, latitude: f64, longitude: f64) -> SimulationResult<usize> {
        let waypoint = Waypoint::new(latitude, longitude);
        if !waypoint.is_valid() {
            return Err(SimulationError::InvalidWaypoint { latitude, longitude });
        }
        self.route.push(waypoint);
        info!("+ waypoint {:.5}, {:.5}", latitude, longitude);
        Ok(self.route.len())
    }

    /// Remove the last waypoint
    pub fn undo_waypoint(&mut self) -> Option<Waypoint> {
        let removed = self.route.pop();
        if removed.is_some() {
            info!("removed last waypoint");
        }
        removed
    }

    /// Empty the route and drop any run in progress
    pub fn clear_route(&mut self) {
        self.route.clear();
        self.state = SimulationState::default();
        info!("route cleared");
    }

    pub fn route(&self) -> &[Waypoint] {
        &self.route
    }

    /// Start or resume the simulation.
    ///
    /// From `Idle` or `Arrived` a fresh run begins at the first waypoint;
    /// from `Paused` the run resumes where it stopped; while `Running` this
    /// is a no-op.
    pub fn start(&mut self) -> SimulationResult<SimulationPhase> {
        match self.state.phase {
            SimulationPhase::Running => {}
            SimulationPhase::Paused => {
                self.state.phase = SimulationPhase::Running;
                info!("simulation resumed");
            }
            SimulationPhase::Idle | SimulationPhase::Arrived => {
                if self.route.len() < MIN_WAYPOINTS {
                    return Err(SimulationError::InsufficientWaypoints {
                        available: self.route.len(),
                        required: MIN_WAYPOINTS,
                    });
                }

                let follower = PathFollower::new(self.route.clone(), self.config.loop_route)?;
                self.state.last_position = Some(follower.current_position());
                self.state.follower = Some(follower);
                self.state.ticks = 0;
                self.state.phase = SimulationPhase::Running;
                info!("simulation started: {}", self.status_line());
            }
        }
        Ok(self.state.phase)
    }

    /// Pause a running simulation
    pub fn stop(&mut self) -> SimulationPhase {
        if self.state.phase == SimulationPhase::Running {
            self.state.phase = SimulationPhase::Paused;
            info!("simulation paused");
        }
        self.state.phase
    }

    /// Return to `Idle` with the cursor rewound and no last position
    pub fn reset(&mut self) {
        if let Some(follower) = self.state.follower.as_mut() {
            follower.reset();
        }
        self.state.phase = SimulationPhase::Idle;
        self.state.last_position = None;
        self.state.ticks = 0;
        debug!("simulation reset");
    }

    /// Advance one tick and publish the resulting position.
    /// Returns `None` unless running.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.state.phase != SimulationPhase::Running {
            return None;
        }

        let distance_m = self.config.distance_per_tick_m();
        let outcome = self.state.follower.as_mut()?.advance(distance_m);
        let position = outcome.position();

        self.state.last_position = Some(position);
        self.state.ticks += 1;
        if outcome.is_arrived() {
            self.state.phase = SimulationPhase::Arrived;
            info!("arrived (end of route)");
        }

        let publish = self.publish_position(position);

        Some(TickReport {
            sequence: self.state.ticks,
            position,
            distance_m,
            arrived: outcome.is_arrived(),
            publish,
        })
    }

    /// Publish an emergency alert, with the last position unless GPS fix
    /// is suppressed
    pub fn send_emergency(&mut self) -> SinkResult<AlertReceipt> {
        let location = if self.config.no_fix {
            None
        } else {
            self.state.last_position
        };
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let alert = AlertRecord::emergency(&self.entity_id, location, SignalQuality::sample(&mut self.rng), now_ms);

        match self.sink.publish_alert(&alert) {
            Ok(receipt) if !receipt.is_accepted() => {
                warn!(
                    "emergency via {} not accepted: POST={} PUT={}",
                    self.sink.name(),
                    receipt.log_status,
                    receipt.latest_status
                );
                Ok(receipt)
            }
            Ok(receipt) => {
                match location {
                    Some(p) => info!(
                        "emergency sent POST={} PUT={} with lat={:.6} lng={:.6}",
                        receipt.log_status, receipt.latest_status, p.latitude, p.longitude
                    ),
                    None => info!(
                        "emergency sent POST={} PUT={} (no location)",
                        receipt.log_status, receipt.latest_status
                    ),
                }
                Ok(receipt)
            }
            Err(e) => {
                warn!("emergency via {} failed: {}", self.sink.name(), e);
                Err(e)
            }
        }
    }

    fn publish_position(&mut self, position: Position) -> SinkResult<u16> {
        let reported = if self.config.no_fix { None } else { Some(position) };
        let record = StateRecord::new(&self.entity_id, reported, SignalQuality::sample(&mut self.rng));

        match self.sink.publish_state(&record) {
            Ok(status) => {
                info!(
                    "PUT {} ({}) lat={:.6} lng={:.6}",
                    self.sink.name(),
                    status,
                    position.latitude,
                    position.longitude
                );
                Ok(status)
            }
            Err(e) => {
                warn!("publish via {} failed: {}", self.sink.name(), e);
                Err(e)
            }
        }
    }

    /// Human-readable run status
    pub fn status_line(&self) -> String {
        match self.state.phase {
            SimulationPhase::Idle => "Idle".to_string(),
            SimulationPhase::Running => format!(
                "Running @ {} km/h, every {}s",
                self.config.speed_kmh, self.config.interval_sec
            ),
            SimulationPhase::Paused => "Paused".to_string(),
            SimulationPhase::Arrived => "Arrived (end of route)".to_string(),
        }
    }

    /// Replace the motion parameters; takes effect on the next tick
    pub fn set_config(&mut self, config: SimulationConfig) {
        if let Some(follower) = self.state.follower.as_mut() {
            follower.set_looping(config.loop_route);
        }
        self.config = config;
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> SimulationPhase {
        self.state.phase
    }

    pub fn last_position(&self) -> Option<Position> {
        self.state.last_position
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
