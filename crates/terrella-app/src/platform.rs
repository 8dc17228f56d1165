//! Platform abstraction: OS directory resolution for config and logs.

use std::path::PathBuf;
use std::{fmt, io};

/// Errors that can occur during platform operations.
#[derive(Debug)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    NoConfigDir,
    /// An I/O error occurred (e.g., directory creation failed).
    Io(io::Error),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "could not determine OS configuration directory"),
            Self::Io(e) => write!(f, "platform I/O error: {e}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PlatformError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

const APP_NAME: &str = "terrella";

/// OS-specific directory paths for the viewer.
pub struct PlatformDirs {
    /// User configuration: `config.ron`.
    pub config_dir: PathBuf,
    /// Log files.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let app_dir = config_base.join(APP_NAME);

        Ok(Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        })
    }

    /// Resolve directories and create them on disk.
    pub fn resolve_and_create() -> Result<Self, PlatformError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Resolve directories rooted under a custom base path.
    ///
    /// Useful for testing and for the `--config` CLI override.
    pub fn resolve_with_root(root: &std::path::Path) -> Self {
        Self {
            config_dir: root.join("config"),
            log_dir: root.join("logs"),
        }
    }

    /// Create all directories on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
