//! Integration tests for loading the `sso` section.
//!
//! Templates are resolved through an in-memory resolver so the loader can be
//! exercised without touching the filesystem.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use homeserver_config::{FileSource, RootConfig, ServerConfig};
use homeserver_sso::{
    SSO_TEMPLATES, SsoConfig, SsoConfigError, Template, TemplateError, TemplateResolver,
    compile_templates,
};
use serde_json::json;

/// Resolver backed by a name → source map, recording every call.
#[derive(Default)]
struct InMemoryResolver {
    overrides: HashMap<PathBuf, HashMap<String, String>>,
    calls: RefCell<Vec<(Vec<String>, Option<PathBuf>)>>,
}

impl InMemoryResolver {
    fn with_override(mut self, dir: &str, name: &str, source: &str) -> Self {
        self.overrides
            .entry(PathBuf::from(dir))
            .or_default()
            .insert(name.to_string(), source.to_string());
        self
    }
}

impl TemplateResolver for InMemoryResolver {
    fn read_templates(
        &self,
        names: &[&str],
        custom_dir: Option<&Path>,
    ) -> Result<Vec<Template>, TemplateError> {
        self.calls.borrow_mut().push((
            names.iter().map(|n| n.to_string()).collect(),
            custom_dir.map(Path::to_path_buf),
        ));

        let overrides = custom_dir.and_then(|dir| self.overrides.get(dir));
        compile_templates(names.iter().map(|&name| {
            let source = overrides
                .and_then(|o| o.get(name).cloned())
                .unwrap_or_else(|| format!("default:{name}"));
            (name.to_string(), source)
        }))
    }
}

/// Resolver that drops the last template.
struct ShortResolver;

impl TemplateResolver for ShortResolver {
    fn read_templates(
        &self,
        names: &[&str],
        _custom_dir: Option<&Path>,
    ) -> Result<Vec<Template>, TemplateError> {
        compile_templates(names[..names.len() - 1].iter().map(|&n| (n, "x")))
    }
}

fn load(
    value: serde_json::Value,
    baseurl: Option<&str>,
    resolver: &dyn TemplateResolver,
) -> Result<SsoConfig, SsoConfigError> {
    SsoConfig::read_config(&RootConfig::from_json(value).unwrap(), baseurl, resolver)
}

// =============================================================================
// Template resolution
// =============================================================================

#[test]
fn test_resolves_all_templates_in_order() {
    let resolver = InMemoryResolver::default();
    let config = load(json!({}), None, &resolver).unwrap();

    let calls = resolver.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, SSO_TEMPLATES.map(String::from).to_vec());
    assert_eq!(calls[0].1, None);

    assert_eq!(config.login_idp_picker_template().name(), "sso_login_idp_picker.html");
    assert_eq!(config.redirect_confirm_template().name(), "sso_redirect_confirm.html");
    assert_eq!(config.auth_confirm_template().name(), "sso_auth_confirm.html");
    assert_eq!(config.error_template().name(), "sso_error.html");
    assert_eq!(config.auth_bad_user_template().name(), "sso_auth_bad_user.html");
}

#[test]
fn test_template_dir_passed_to_resolver() {
    let resolver = InMemoryResolver::default().with_override(
        "/srv/templates",
        "sso_error.html",
        "custom {{error}}",
    );
    let config = load(
        json!({ "sso": { "template_dir": "/srv/templates" } }),
        None,
        &resolver,
    )
    .unwrap();

    assert_eq!(config.template_dir(), Some(Path::new("/srv/templates")));
    assert_eq!(
        resolver.calls.borrow()[0].1.as_deref(),
        Some(Path::new("/srv/templates"))
    );
    assert_eq!(
        config.error_template().render(&json!({ "error": "E" })).unwrap(),
        "custom E"
    );
    assert_eq!(
        config.redirect_confirm_template().source(),
        "default:sso_redirect_confirm.html"
    );
}

#[test]
fn test_static_pages_are_prerendered() {
    let resolver = InMemoryResolver::default()
        .with_override(
            "/t",
            "sso_auth_success.html",
            "<p>{{#if missing}}no{{else}}ok{{/if}}</p>",
        )
        .with_override("/t", "sso_account_deactivated.html", "<p>gone</p>");
    let config = load(json!({ "sso": { "template_dir": "/t" } }), None, &resolver).unwrap();

    assert_eq!(config.auth_success_html(), "<p>ok</p>");
    assert_eq!(config.account_deactivated_html(), "<p>gone</p>");
}

#[test]
fn test_malformed_template_aborts_loading() {
    let resolver = InMemoryResolver::default().with_override(
        "/t",
        "sso_auth_confirm.html",
        "{{#each providers}}",
    );
    let err = load(json!({ "sso": { "template_dir": "/t" } }), None, &resolver).unwrap_err();
    assert!(matches!(
        err,
        SsoConfigError::Template(TemplateError::Parse { ref name, .. }) if name == "sso_auth_confirm.html"
    ));
}

#[test]
fn test_resolver_count_mismatch() {
    let err = load(json!({}), None, &ShortResolver).unwrap_err();
    assert!(matches!(
        err,
        SsoConfigError::Template(TemplateError::CountMismatch {
            expected: 7,
            actual: 6
        })
    ));
}

// =============================================================================
// Whitelist and flags
// =============================================================================

#[test]
fn test_defaults_are_total() {
    let resolver = InMemoryResolver::default();
    let absent = load(json!({}), None, &resolver).unwrap();
    let empty = load(json!({ "sso": {} }), None, &resolver).unwrap();
    assert_eq!(absent, empty);
    assert!(!absent.update_profile_information());
    assert!(absent.client_whitelist().is_empty());
}

#[test]
fn test_fallback_only_whitelist() {
    let config = load(
        json!({ "sso": { "client_whitelist": [] } }),
        Some("https://example.org/"),
        &InMemoryResolver::default(),
    )
    .unwrap();
    assert_eq!(
        config.client_whitelist().entries(),
        &["https://example.org/_matrix/static/client/login".to_string()]
    );
}

#[test]
fn test_configured_whitelist_unchanged_without_baseurl() {
    let config = load(
        json!({ "sso": { "client_whitelist": ["https://b/", "https://a/"] } }),
        None,
        &InMemoryResolver::default(),
    )
    .unwrap();
    assert_eq!(
        config.client_whitelist().entries(),
        &["https://b/".to_string(), "https://a/".to_string()]
    );
}

#[test]
fn test_prefix_collision_documented() {
    let config = load(
        json!({ "sso": { "client_whitelist": ["https://a.client"] } }),
        None,
        &InMemoryResolver::default(),
    )
    .unwrap();
    assert!(config.client_whitelist().is_trusted("https://a.client.evil.com/x"));
}

#[test]
fn test_type_error_names_key() {
    let err = load(
        json!({ "sso": { "client_whitelist": { "a": 1 } } }),
        None,
        &InMemoryResolver::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SsoConfigError::Config(_)));
    assert_eq!(err.path(), Some("sso.client_whitelist"));
    assert!(err.to_string().contains("sso.client_whitelist"));
}

// =============================================================================
// End to end from a config file
// =============================================================================

#[test]
fn test_load_from_file_with_server_section() {
    let dir = tempfile::TempDir::new().unwrap();
    let templates = dir.path().join("templates");
    std::fs::create_dir(&templates).unwrap();
    std::fs::write(templates.join("sso_auth_success.html"), "<p>custom success</p>").unwrap();

    let config_path = dir.path().join("homeserver.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[server]
public_baseurl = "https://matrix.example.org"

[sso]
client_whitelist = ["https://app.example.org/"]
update_profile_information = true
template_dir = "{}"
"#,
            templates.display()
        ),
    )
    .unwrap();

    let root = FileSource::from_path(&config_path).load().unwrap();
    let server = ServerConfig::read_config(&root).unwrap();
    let sso = SsoConfig::load(&root, &server).unwrap();

    assert!(sso.update_profile_information());
    assert_eq!(sso.auth_success_html(), "<p>custom success</p>");
    assert_eq!(
        sso.client_whitelist().entries(),
        &[
            "https://app.example.org/".to_string(),
            "https://matrix.example.org/_matrix/static/client/login".to_string(),
        ]
    );
    assert!(
        sso.client_whitelist()
            .is_trusted("https://matrix.example.org/_matrix/static/client/login?loginToken=x")
    );
}
