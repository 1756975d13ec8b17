//! Route simulation walkthrough
//!
//! Follows a short harbour route with the in-memory sink, so nothing is sent
//! over the network.

use route_simulator::{
    run_simulation, ManualTicker, MockSink, PathFollower, SimulationConfig, SimulationController, Waypoint,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Route Simulator Demo ===\n");

    demo_path_follower()?;
    demo_dry_run()?;

    println!("Route simulator demo completed successfully!");
    Ok(())
}

fn demo_path_follower() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Path Follower ---");

    let route = vec![
        Waypoint::new(14.5995, 120.9842),
        Waypoint::new(14.6050, 120.9842),
        Waypoint::new(14.6050, 120.9900),
    ];
    let mut follower = PathFollower::new(route, false)?;

    for i in 0..follower.segment_count() {
        println!("Segment {}: {:.1} m", i, follower.segment_length(i).unwrap_or(0.0));
    }
    println!("Total: {:.1} m", follower.total_length_m());

    // 36 km/h with a 30 s interval
    for tick in 1..=8 {
        let outcome = follower.advance(300.0);
        let position = outcome.position();
        println!(
            "Tick {}: lat={:.6} lng={:.6}{}",
            tick,
            position.latitude,
            position.longitude,
            if outcome.is_arrived() { " (arrived)" } else { "" }
        );
        if outcome.is_arrived() {
            break;
        }
    }

    println!();
    Ok(())
}

fn demo_dry_run() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Dry Run ---");

    let config = SimulationConfig {
        speed_kmh: 36.0,
        interval_sec: 30.0,
        loop_route: true,
        no_fix: false,
    };
    let mut controller = SimulationController::new(config, "BOAT_001", MockSink::new());
    controller.add_waypoint(14.5995, 120.9842)?;
    controller.add_waypoint(14.6050, 120.9842)?;
    controller.add_waypoint(14.6050, 120.9900)?;

    let summary = run_simulation(&mut controller, &mut ManualTicker::new(10))?;
    println!("Ticks: {}, final phase: {}", summary.ticks, summary.final_phase);

    let receipt = controller.send_emergency()?;
    println!("Emergency: POST={} PUT={}", receipt.log_status, receipt.latest_status);

    for record in controller.sink().published_states().iter().take(3) {
        println!("{}", serde_json::to_string(record)?);
    }
    println!("Alerts logged: {}\n", controller.sink().published_alerts().len());

    Ok(())
}
