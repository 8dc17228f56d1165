//! Structured logging for the Terrella viewer.
//!
//! Console output with uptime timestamps and module paths via the
//! `tracing` ecosystem, plus JSON file logging in debug builds. The
//! filter string can come from `RUST_LOG`, the config file, or the
//! built-in default that quiets wgpu/naga noise.

use std::path::Path;
use terrella_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// * `log_dir` - optional directory for JSON log files (debug builds only)
/// * `debug_build` - whether this is a debug build (enables file logging)
/// * `config` - optional configuration for a log level override
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .map(|level| format!("{level},wgpu=warn,naga=warn"))
        .unwrap_or_else(|| "info,wgpu=warn,naga=warn".to_string());

    // RUST_LOG wins over both config and default.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("terrella.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The default filter: `info` everywhere, `warn` for the noisy GPU crates.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info,wgpu=warn,naga=warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_gpu_crates() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_config_level_override_shapes_filter() {
        let mut config = terrella_config::Config::default();
        config.debug.log_level = "debug".to_string();

        let filter_str = config.debug.log_level;
        let combined = format!("{filter_str},wgpu=warn,naga=warn");
        let filter = EnvFilter::try_from(combined.as_str());
        assert!(filter.is_ok(), "combined filter should parse: {combined}");
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,terrella_solar=trace",
            "warn,terrella_app=debug",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {filter_str}");
        }
    }

    #[test]
    fn test_log_file_path_shape() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file_path = temp_dir.path().join("terrella.log");
        assert_eq!(log_file_path.file_name().unwrap(), "terrella.log");
    }
}
