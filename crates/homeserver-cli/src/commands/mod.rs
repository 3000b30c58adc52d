pub mod config;
pub mod redirect;

use std::path::Path;

use anyhow::{Context, Result};
use homeserver_config::{FileSource, ServerConfig};
use homeserver_sso::SsoConfig;
use tracing::debug;

/// Load the `server` and `sso` sections from a config file.
pub fn load_sso(path: &Path) -> Result<(ServerConfig, SsoConfig)> {
    debug!(path = %path.display(), "Loading configuration");
    let root = FileSource::from_path(path)
        .load()
        .with_context(|| format!("failed to load {}", path.display()))?;
    let server = ServerConfig::read_config(&root).context("invalid server config")?;
    let sso = SsoConfig::load(&root, &server).context("invalid sso config")?;
    Ok((server, sso))
}
