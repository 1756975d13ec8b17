//! Tick driver

use crate::core::Position;
use crate::simulation::controller::{SimulationController, SimulationPhase};
use crate::simulation::error::SimulationResult;
use crate::simulation::ticker::Ticker;
use crate::telemetry::TelemetrySink;
use log::info;

/// What a run did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub publish_failures: u64,
    pub last_position: Option<Position>,
    pub final_phase: SimulationPhase,
}

/// Start (or resume) the controller and tick it until the route is exhausted
/// or the ticker stops. A stopped ticker leaves the simulation `Paused`.
pub fn run_simulation<S, T>(controller: &mut SimulationController<S>, ticker: &mut T) -> SimulationResult<RunSummary>
where
    S: TelemetrySink,
    T: Ticker + ?Sized,
{
    controller.start()?;
    let mut summary = RunSummary::default();

    while controller.phase() == SimulationPhase::Running {
        if !ticker.next_tick() {
            controller.stop();
            break;
        }
        if let Some(report) = controller.tick() {
            summary.ticks += 1;
            if report.publish.is_err() {
                summary.publish_failures += 1;
            }
            summary.last_position = Some(report.position);
        }
    }

    summary.final_phase = controller.phase();
    info!(
        "run finished after {} ticks ({} publish failures), {}",
        summary.ticks,
        summary.publish_failures,
        controller.status_line()
    );
    Ok(summary)
}
