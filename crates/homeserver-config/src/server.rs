//! The `server` section.
//!
//! Only the settings other sections depend on live here. `public_baseurl` is
//! normalized to end with `/`, so consumers can append path suffixes directly.

use tracing::debug;
use url::Url;

use crate::raw::RootConfig;
use crate::section::ConfigSection;
use crate::{ConfigError, Result};

/// Server-wide settings shared with other sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    public_baseurl: Option<String>,
}

impl ServerConfig {
    /// Read the `server` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidType`] if `public_baseurl` is not a string
    /// and [`ConfigError::InvalidValue`] if it is not an absolute http(s) URL
    /// or carries a query or fragment.
    pub fn read_config(config: &RootConfig) -> Result<Self> {
        let section = config.section(Self::SECTION)?;

        let public_baseurl = match section.get::<String>("public_baseurl")? {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(normalize_baseurl(&section.path("public_baseurl"), raw.trim())?),
        };

        debug!(?public_baseurl, "Read server config");
        Ok(Self { public_baseurl })
    }

    /// Public base URL, always ending with `/`.
    pub fn public_baseurl(&self) -> Option<&str> {
        self.public_baseurl.as_deref()
    }
}

fn normalize_baseurl(path: &str, raw: &str) -> Result<String> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::invalid_value(path, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::invalid_value(
                path,
                format!("unsupported scheme '{other}', expected http or https"),
            ));
        }
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::invalid_value(
            path,
            "must not contain a query or fragment",
        ));
    }

    let mut baseurl = raw.to_string();
    if !baseurl.ends_with('/') {
        baseurl.push('/');
    }
    Ok(baseurl)
}

impl ConfigSection for ServerConfig {
    const SECTION: &'static str = "server";

    fn generate_config_section() -> String {
        r#"[server]
# The public-facing base URL that clients use to access this homeserver
# (not including _matrix/...). This is the same URL a user might enter into
# the 'Custom Homeserver URL' field on their client. If you use a reverse
# proxy, this should be the URL to reach the homeserver via the proxy.
# A trailing slash is added if missing.
#
# Other sections rely on this value; for example the SSO client whitelist
# automatically includes the login fallback page when it is set.
#
#public_baseurl = "https://example.com/"
"#
        .to_string()
    }
}
