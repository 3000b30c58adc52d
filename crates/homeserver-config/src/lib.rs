//! Configuration loading for the homeserver.
//!
//! This crate provides the generic pieces every configuration section builds on:
//! - Loading the root configuration mapping from TOML files or JSON values
//! - Typed extraction of section keys with dotted key paths in errors
//! - The [`ConfigSection`] trait used to generate documented default config
//! - The `server` section, which resolves the public base URL shared by
//!   other sections
//!
//! # Architecture
//!
//! ```text
//!   homeserver.toml ──► FileSource ──► RootConfig
//!                                          │
//!                    ┌─────────────────────┼─────────────────────┐
//!                    ▼                     ▼                     ▼
//!              ServerConfig          SsoConfig (sso)         other sections
//!              (public_baseurl) ───────────▲
//! ```
//!
//! Configuration is read once at startup. Every error is fatal and carries the
//! key path of the offending value.

pub mod raw;
pub mod section;
pub mod server;
pub mod sources;

pub use raw::{RootConfig, Section};
pub use section::{ConfigSection, generate_config};
pub use server::ServerConfig;
pub use sources::FileSource;

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// A configured value has the wrong shape.
    #[error("Invalid type for '{path}': {message}")]
    InvalidType { path: String, message: String },

    /// A configured value has the right shape but is not acceptable.
    #[error("Invalid value for '{path}': {message}")]
    InvalidValue { path: String, message: String },
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_type(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidType {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_value(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Key path of the offending value, if the error refers to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidType { path, .. } | Self::InvalidValue { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let err = ConfigError::invalid_type("sso.client_whitelist", "expected a sequence");
        assert_eq!(
            err.to_string(),
            "Invalid type for 'sso.client_whitelist': expected a sequence"
        );
        assert_eq!(err.path(), Some("sso.client_whitelist"));
    }

    #[test]
    fn test_parse_error_has_no_path() {
        let err = ConfigError::parse("bad toml");
        assert_eq!(err.to_string(), "Parse error: bad toml");
        assert!(err.path().is_none());
    }
}
