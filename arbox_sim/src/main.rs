// arbox_sim/src/main.rs

//! Runs the marker demo.
//!
//! Windowed: `cargo run --bin arbox` then press `F`/`L` to find or lose the
//! marker, `N`/`U`/`I` to change the tracking quality.
//! Headless: `cargo run --bin arbox -- --headless` plays the scenario's
//! tracker script and logs what the spawner does.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*, state::app::StatesPlugin};
use clap::Parser;

use arbox_sim::cli::Cli;
use arbox_sim::scene::config::load_scene;
use arbox_sim::ArBoxPlugin;

const LOG_FILTER: &str = "info,wgpu_core=error,wgpu_hal=error,arbox_sim=debug";

fn main() -> AppExit {
    let cli = Cli::parse();
    let mut app = App::new();

    // --- 1. Add Core Bevy Plugins ---
    let log_plugin = LogPlugin {
        level: bevy::log::Level::INFO,
        filter: LOG_FILTER.to_string(),
        ..default()
    };
    if cli.headless {
        app.add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
            log_plugin,
            StatesPlugin,
        ));
    } else {
        app.add_plugins(DefaultPlugins.set(log_plugin))
            // The Avian3D physics plugins drop the boxes onto the floor.
            .add_plugins(PhysicsPlugins::default());
    }

    // --- 2. Load the Scenario ---
    let mut resolved = match load_scene(&cli.scenario) {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("Could not load scenario '{}': {}", cli.scenario.display(), e);
            return AppExit::error();
        }
    };
    if let Some(seed) = cli.seed {
        resolved.config.simulation.seed = Some(seed);
    }
    if cli.headless && resolved.config.simulation.duration().is_none() {
        warn!("Headless run without simulation.duration_seconds; it will run until interrupted.");
    }

    // Insert the resolved configuration before the plugins that read it.
    app.insert_resource(resolved.config)
        .insert_resource(resolved.assets);

    // --- 3. Add the Scene Plugin ---
    app.add_plugins(ArBoxPlugin {
        headless: cli.headless,
    });

    // --- 4. Run the App ---
    info!("Starting arbox...");
    app.run()
}
