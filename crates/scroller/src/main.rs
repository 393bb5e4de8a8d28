//! Headless side-scroller runner
//!
//! Loads tuning, entity catalog and map from disk, replays an input script
//! through the simulation and logs what happens each tick.
//!
//! Usage: `scroller [runner.toml]`

#![warn(missing_docs)]

mod config;
mod script;

use config::RunnerConfig;
use scroll_engine::config::Config;
use scroll_engine::foundation::logging;
use scroll_engine::foundation::time::Stopwatch;
use scroll_engine::world::RonMapDirectory;
use scroll_engine::Simulation;
use script::InputScript;
use std::sync::Arc;

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("scroller: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runner = match std::env::args().nth(1) {
        Some(path) => RunnerConfig::load_from_file(&path)?,
        None => RunnerConfig::default(),
    };
    logging::init_with_level(&runner.log_level);
    log::info!("Starting scroller with {:?}", runner);

    let tuning = Arc::new(runner.load_simulation()?);
    let catalog = Arc::new(runner.load_catalog()?);
    let map = Arc::new(RonMapDirectory::open(&runner.map_dir)?);
    let script = match &runner.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };

    if script.is_empty() && runner.ticks == 0 {
        log::warn!("No input script and no tick count configured; nothing to run");
    }
    let ticks = if runner.ticks > 0 { runner.ticks } else { script.len_ticks() };
    let mut simulation = Simulation::new(tuning, catalog, map, runner.start_room(), runner.spawn_point())?;

    let stopwatch = Stopwatch::start_new();
    for tick in 0..ticks {
        let report = simulation.tick(script.actions_at(tick));

        if let Some(room) = &report.entered_room {
            log::info!("Tick {}: entered room {}", report.tick, room);
        }
        if let Some(splice) = &report.splice {
            log::info!(
                "Tick {}: streamed in {:?}, out {:?} ({} failed)",
                report.tick,
                splice.loaded,
                splice.unloaded,
                splice.failed.len()
            );
        }
        if let Some(player) = simulation.player() {
            log::debug!(
                "Tick {}: {:?} at ({:.1}, {:.1}) v=({:.1}, {:.1}), {} events, {} actors",
                report.tick,
                player.state,
                player.position.x,
                player.position.y,
                player.velocity.x,
                player.velocity.y,
                report.physics.events.len(),
                simulation.actors().len()
            );
        }

        if simulation.player_dead() {
            log::warn!("Player died at tick {}", report.tick);
            break;
        }
    }

    match simulation.player() {
        Some(player) => log::info!(
            "Finished {} ticks in {:?}, room {}: {:?} at ({:.1}, {:.1}), health {:?}",
            simulation.clock().ticks(),
            stopwatch.elapsed(),
            simulation.current_room(),
            player.state,
            player.position.x,
            player.position.y,
            player.health()
        ),
        None => log::info!("Finished {} ticks in {:?}", simulation.clock().ticks(), stopwatch.elapsed()),
    }
    Ok(())
}
