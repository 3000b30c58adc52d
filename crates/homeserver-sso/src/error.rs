//! Error types for loading the SSO configuration.

use homeserver_config::ConfigError;

use crate::templates::TemplateError;

/// Errors that abort startup while reading the `sso` section.
#[derive(Debug, thiserror::Error)]
pub enum SsoConfigError {
    /// A configured value has the wrong shape or an unacceptable value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A template could not be resolved, parsed or pre-rendered.
    #[error("SSO template error: {0}")]
    Template(#[from] TemplateError),
}

impl SsoConfigError {
    /// Key path of the offending value, if the error refers to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Config(e) => e.path(),
            Self::Template(_) => None,
        }
    }
}
