//! Client redirect whitelist.
//!
//! After an SSO login completes, the user is sent back to the client with a
//! login token. Unless the client's redirect URL is whitelisted, the user is
//! first asked to confirm. A redirect URL is trusted if it starts with any
//! whitelist entry.
//!
//! Matching is a plain string prefix test, not hostname-aware: an entry such as
//! `https://my.client` also matches `https://my.client.evil.site`. Entries
//! should end with a path separator (`https://my.client/`).

use tracing::warn;
use url::Url;

/// Path of the server's login fallback page, relative to the public base URL.
pub const LOGIN_FALLBACK_PATH: &str = "_matrix/static/client/login";

/// Ordered list of URL prefixes trusted for redirects without confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientWhitelist {
    entries: Vec<String>,
}

impl ClientWhitelist {
    /// Build the whitelist from configured entries.
    ///
    /// If a public base URL is known, the login fallback page
    /// (`<public_baseurl>_matrix/static/client/login`) is appended after the
    /// configured entries. The fallback sets the redirect URL to itself so it
    /// can consume the login token, so confirming it would be pointless. The
    /// base URL is expected to end with `/` already.
    pub fn build(entries: Vec<String>, public_baseurl: Option<&str>) -> Self {
        for entry in &entries {
            if is_bare_origin(entry) {
                warn!(
                    entry = %entry,
                    "SSO client whitelist entry has no trailing slash and also matches \
                     other hosts sharing this prefix"
                );
            }
        }

        let Some(baseurl) = public_baseurl.filter(|b| !b.is_empty()) else {
            return Self { entries };
        };

        let fallback = login_fallback_url(baseurl);
        let mut entries: Vec<String> = entries.into_iter().filter(|e| *e != fallback).collect();
        entries.push(fallback);

        Self { entries }
    }

    /// Whitelist entries in configured order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `redirect_url` starts with any whitelist entry.
    pub fn is_trusted(&self, redirect_url: &str) -> bool {
        self.matching_entry(redirect_url).is_some()
    }

    /// First entry that `redirect_url` starts with.
    pub fn matching_entry(&self, redirect_url: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|entry| redirect_url.starts_with(entry))
    }
}

/// URL of the login fallback page for a public base URL ending with `/`.
pub fn login_fallback_url(public_baseurl: &str) -> String {
    format!("{public_baseurl}{LOGIN_FALLBACK_PATH}")
}

// `https://my.client` parses with path "/" but the text itself has no slash
// after the host.
fn is_bare_origin(entry: &str) -> bool {
    match Url::parse(entry) {
        Ok(url) => url.has_host() && url.path() == "/" && !entry.ends_with('/'),
        Err(_) => false,
    }
}
