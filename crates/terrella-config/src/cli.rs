//! Command-line argument parsing for the globe viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrella command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "terrella", about = "Interactive day/night globe viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Simulated seconds per real second (e.g. 600 for fast-forward).
    #[arg(long)]
    pub speed: Option<f64>,

    /// Fixed simulation start instant, RFC 3339 (e.g. 2024-06-21T12:00:00Z).
    #[arg(long)]
    pub start: Option<String>,

    /// Path to the equirectangular Earth texture.
    #[arg(long)]
    pub texture: Option<String>,

    /// Viewer latitude in degrees.
    #[arg(long)]
    pub lat: Option<f64>,

    /// Viewer longitude in degrees.
    #[arg(long)]
    pub lon: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(speed) = args.speed {
            self.time.speed_factor = speed;
        }
        if let Some(ref start) = args.start {
            self.time.start_instant = Some(start.clone());
        }
        if let Some(ref texture) = args.texture {
            self.render.texture_path = texture.clone();
        }
        if let Some(lat) = args.lat {
            self.geo.latitude_deg = Some(lat);
        }
        if let Some(lon) = args.lon {
            self.geo.longitude_deg = Some(lon);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            width: None,
            height: None,
            speed: None,
            start: None,
            texture: None,
            lat: None,
            lon: None,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            speed: Some(600.0),
            lat: Some(45.464),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert!((config.time.speed_factor - 600.0).abs() < f64::EPSILON);
        assert_eq!(config.geo.latitude_deg, Some(45.464));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert!(config.geo.longitude_deg.is_none());
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }
}
