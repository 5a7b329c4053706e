//! Headless flight simulation: plans a route over the farm and flies it.
//!
//! Usage: cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   JSON simulation config (default: built-in farm)
//!   --seed <SEED>     World seed (overrides config)
//!   --ticks <N>       Ticks to simulate (default: 3600)
//!   --goal <X,Y,Z>    Goal in map coordinates, Y above ground (default: far farm corner)
//!   --dt <SECONDS>    Tick length (overrides config)
//!   --out <PATH>      Write telemetry as JSON

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use glam::Vec3;

use agrodrone::costmap::GridCoord;
use agrodrone::sim::{SimConfig, Simulation};

fn main() -> ExitCode {
    agrodrone::core::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> agrodrone::core::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SimConfig::load_sync(&PathBuf::from(path))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(dt) = parse_f32_arg(&args, "--dt") {
        config.tick_seconds = dt;
    }
    let ticks = parse_usize_arg(&args, "--ticks").unwrap_or(3600);
    let out = parse_str_arg(&args, "--out").map(PathBuf::from);

    let mut sim = Simulation::new(config)?;

    let goal = parse_vec3_arg(&args, "--goal").unwrap_or_else(|| {
        let (cols, rows, _) = sim.costmap().dims();
        let corner = GridCoord::new(cols as i32 - 2, rows as i32 - 2, 0);
        sim.costmap().grid_to_world(corner)
    });

    println!("=== Agrodrone Simulation ===");
    println!("Seed:    {}", sim.config().seed);
    println!("Costmap: {:?}", sim.costmap().dims());
    println!("Start:   {:?}", sim.drone().position);
    println!("Goal:    {:?}", goal);
    println!("Ticks:   {} x {}s", ticks, sim.config().tick_seconds);
    println!();

    let plan_start = Instant::now();
    let waypoints = sim.plan_to(goal);
    println!("Planned {} waypoints in {:.2?}", waypoints, plan_start.elapsed());

    let sim_start = Instant::now();
    let report_every = (ticks / 10).max(1);
    let mut samples = Vec::with_capacity(ticks);
    for i in 0..ticks {
        sim.step();
        let sample = sim.telemetry();
        if (i + 1) % report_every == 0 {
            log::info!(
                "t={:.1}s pos=({:.1}, {:.1}, {:.1}) battery={:.3} waypoints left={}",
                sample.time,
                sample.position.x,
                sample.position.y,
                sample.position.z,
                sample.battery_level,
                sample.waypoints_remaining
            );
        }
        samples.push(sample);
        if waypoints > 0 && sim.autopilot().is_idle() && sim.drone().is_hovering {
            log::info!("Goal reached at tick {}", sim.tick());
            break;
        }
    }
    let elapsed = sim_start.elapsed();

    let drone = sim.drone();
    println!();
    println!("Simulated {} ticks in {:.2?}", sim.tick(), elapsed);
    println!("Final position: {:?}", drone.position);
    println!("Battery:        {:.1}%", drone.battery_level * 100.0);
    println!("Distance to goal: {:.2}m", sim.world_to_map(drone.position).distance(goal));

    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(&samples)?)?;
        println!("Telemetry: {} samples -> {}", samples.len(), path.display());
    }

    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_vec3_arg(args: &[String], flag: &str) -> Option<Vec3> {
    let s = parse_str_arg(args, flag)?;
    let parts: Vec<f32> = s.split(',').map(|p| p.trim().parse().ok()).collect::<Option<_>>()?;
    match parts.as_slice() {
        [x, y, z] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}
