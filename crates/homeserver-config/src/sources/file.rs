//! File-based configuration source

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::raw::RootConfig;
use crate::{ConfigError, Result};

/// File-based configuration source
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the configuration file.
    ///
    /// A missing file yields an empty configuration, so every section falls
    /// back to its defaults.
    pub fn load(&self) -> Result<RootConfig> {
        let path = &self.path;

        if !path.exists() {
            debug!("Config file does not exist: {:?}", path);
            return Ok(RootConfig::new());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = RootConfig::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse(msg) => ConfigError::parse(format!("{}: {msg}", path.display())),
            other => other,
        })?;

        info!("Loaded config file: {:?}", path);
        Ok(config)
    }
}
