//! Binary entry point for the Terrella globe viewer.

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::warn;

use terrella_app::platform::PlatformDirs;
use terrella_app::window;
use terrella_config::{CliArgs, Config};
use terrella_solar::SimClock;

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => {
            let dirs = PlatformDirs::resolve_with_root(root);
            if let Err(e) = dirs.create_dirs() {
                eprintln!("Failed to create config directories: {e}");
                std::process::exit(1);
            }
            dirs
        }
        None => match PlatformDirs::resolve_and_create() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to initialize platform directories: {e}");
                std::process::exit(1);
            }
        },
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    config.apply_cli_overrides(&args);

    terrella_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    let clock = build_clock(&config);
    window::run_with_config(config, clock);
}

/// Build the simulated clock from config: a fixed start instant when one
/// is given (deterministic accelerated runs), wall-clock "now" otherwise.
fn build_clock(config: &Config) -> SimClock {
    let start = config.time.start_instant.as_deref().and_then(|s| {
        match DateTime::parse_from_rfc3339(s) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring unparseable start instant {s:?}: {e}");
                None
            }
        }
    });

    let mut clock = match start {
        Some(start) => SimClock::new(start, config.time.speed_factor),
        None => SimClock::starting_now(config.time.speed_factor),
    };
    clock.paused = config.time.paused;
    clock
}
