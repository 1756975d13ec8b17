use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use route_simulator::{
    run_simulation, ConfigurationManager, IntervalTicker, MockSink, RestSink, SimulationController,
    TelemetrySink,
};
use std::path::PathBuf;

/// Simulate a vehicle travelling a waypoint route and publish its position
#[derive(Parser, Debug)]
#[command(name = "route-simulator", version)]
struct Args {
    /// JSON configuration file (route, simulation and sink settings)
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured speed (km/h)
    #[arg(long)]
    speed_kmh: Option<f64>,

    /// Override the configured tick interval (seconds)
    #[arg(long)]
    interval_sec: Option<f64>,

    /// Restart from the first waypoint after reaching the last
    #[arg(long)]
    loop_route: bool,

    /// Report NO_GPS_FIX and withhold coordinates
    #[arg(long)]
    no_fix: bool,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Send one emergency alert when the run ends
    #[arg(long)]
    emergency: bool,

    /// Publish to an in-memory sink instead of the remote store
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("ROUTE_SIM_LOG", "info"))
        .target(env_logger::Target::Stdout)
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut manager = ConfigurationManager::new();
    let warnings = manager
        .load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    if let Some(speed_kmh) = args.speed_kmh {
        manager.set_speed_kmh(speed_kmh)?;
    }
    if let Some(interval_sec) = args.interval_sec {
        manager.set_interval_sec(interval_sec)?;
    }
    if args.loop_route {
        manager.set_loop_route(true);
    }
    if args.no_fix {
        manager.set_no_fix(true);
    }

    for warning in warnings {
        warn!("{}", warning);
    }

    let config = manager.config().clone();
    let sink: Box<dyn TelemetrySink> = if args.dry_run {
        info!("dry run, nothing leaves this process");
        Box::new(MockSink::new())
    } else {
        Box::new(RestSink::new(&config.sink).context("creating sink")?)
    };

    let mut controller = SimulationController::from_config(&config, sink)?;
    info!(
        "route of {} waypoints, {} m per tick",
        controller.route().len(),
        config.simulation.distance_per_tick_m()
    );

    let mut ticker = IntervalTicker::new(config.simulation.tick_interval());
    if let Some(max_ticks) = args.max_ticks {
        ticker = ticker.with_max_ticks(max_ticks);
    }

    let stop = ticker.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
        warn!("failed to install Ctrl+C handler: {}", e);
    }
    info!("press Ctrl+C to stop");

    let summary = run_simulation(&mut controller, &mut ticker)?;

    if let Some(position) = summary.last_position {
        info!(
            "{} after {} ticks at lat={:.6} lng={:.6}",
            summary.final_phase, summary.ticks, position.latitude, position.longitude
        );
    }

    if args.emergency {
        controller.send_emergency().context("sending emergency alert")?;
    }
    Ok(())
}
