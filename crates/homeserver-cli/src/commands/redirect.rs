use std::path::Path;

use anyhow::Result;

use crate::output::{print_success, print_warning};

/// Report whether `url` skips the redirect confirmation step.
///
/// Returns `true` if the URL is trusted.
pub fn check(path: &Path, url: &str) -> Result<bool> {
    let (_, sso) = super::load_sso(path)?;

    match sso.client_whitelist().matching_entry(url) {
        Some(entry) => {
            print_success(&format!("{url} is trusted (matches {entry})"));
            Ok(true)
        }
        None => {
            print_warning(&format!("{url} requires confirmation"));
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_url_trusted() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("homeserver.toml");
        std::fs::write(
            &path,
            "[server]\npublic_baseurl = \"https://example.org/\"\n\n[sso]\nclient_whitelist = [\"https://a.client/\"]\n",
        )
        .unwrap();

        assert!(check(&path, "https://example.org/_matrix/static/client/login").unwrap());
        assert!(check(&path, "https://a.client/app").unwrap());
        assert!(!check(&path, "https://b.client/").unwrap());
    }
}
