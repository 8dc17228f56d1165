//! Configuration for the Terrella globe viewer.
//!
//! Settings persist to disk as RON, load-or-create on startup, and accept
//! CLI overrides via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, GeoConfig, RenderConfig, TimeConfig, WindowConfig};
pub use error::ConfigError;
