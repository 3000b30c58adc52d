use std::path::Path;

use anyhow::{Context, Result};
use homeserver_config::{ConfigSection, ServerConfig, generate_config};
use homeserver_sso::SsoConfig;

use crate::output::{print_field, print_success, print_warning};

/// Full default configuration file.
pub fn default_config() -> String {
    generate_config([
        ServerConfig::generate_config_section(),
        SsoConfig::generate_config_section(),
    ])
}

pub fn generate(output: Option<&Path>) -> Result<()> {
    let text = default_config();
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            print_success(&format!("Wrote {}", path.display()));
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn check(path: &Path) -> Result<()> {
    if !path.exists() {
        print_warning(&format!("{} not found, using defaults", path.display()));
    }

    let (server, sso) = super::load_sso(path)?;

    print_field("Public base URL", server.public_baseurl().unwrap_or("(not set)"));
    print_field(
        "Template dir",
        &sso.template_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string()),
    );
    print_field(
        "Update profile information",
        &sso.update_profile_information().to_string(),
    );

    let whitelist = sso.client_whitelist();
    if whitelist.is_empty() {
        print_field("Client whitelist", "(empty)");
    } else {
        print_field("Client whitelist", "");
        for entry in whitelist.entries() {
            println!("  - {entry}");
        }
    }

    print_success("Configuration is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeserver_config::RootConfig;
    use homeserver_sso::FileTemplateResolver;

    #[test]
    fn test_default_config_loads() {
        let root = RootConfig::from_toml(&default_config()).unwrap();
        let server = ServerConfig::read_config(&root).unwrap();
        let resolver = FileTemplateResolver::new();
        let sso = SsoConfig::read_config(&root, server.public_baseurl(), &resolver).unwrap();
        assert!(sso.client_whitelist().is_empty());
    }

    #[test]
    fn test_default_config_contains_sections() {
        let text = default_config();
        assert!(text.contains("[server]"));
        assert!(text.contains("[sso]"));
    }

    #[test]
    fn test_generate_to_file_then_check() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("homeserver.toml");
        generate(Some(&path)).unwrap();
        check(&path).unwrap();
    }

    #[test]
    fn test_check_reports_bad_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("homeserver.toml");
        std::fs::write(&path, "[sso]\nupdate_profile_information = \"yes\"\n").unwrap();

        let err = check(&path).unwrap_err();
        assert!(format!("{err:#}").contains("sso.update_profile_information"));
    }
}
