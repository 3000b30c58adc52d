//! HTML templates for the SSO flow.
//!
//! Templates are resolved by name through a [`TemplateResolver`]. The default
//! [`FileTemplateResolver`] looks in an optional override directory first and
//! falls back to the built-in templates compiled into this crate. Templates use
//! Handlebars syntax with HTML escaping enabled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, warn};

/// Built-in templates, keyed by file name.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "sso_login_idp_picker.html",
        include_str!("../res/templates/sso_login_idp_picker.html"),
    ),
    (
        "sso_redirect_confirm.html",
        include_str!("../res/templates/sso_redirect_confirm.html"),
    ),
    (
        "sso_auth_confirm.html",
        include_str!("../res/templates/sso_auth_confirm.html"),
    ),
    ("sso_error.html", include_str!("../res/templates/sso_error.html")),
    (
        "sso_account_deactivated.html",
        include_str!("../res/templates/sso_account_deactivated.html"),
    ),
    (
        "sso_auth_success.html",
        include_str!("../res/templates/sso_auth_success.html"),
    ),
    (
        "sso_auth_bad_user.html",
        include_str!("../res/templates/sso_auth_bad_user.html"),
    ),
];

/// Source of a built-in template.
pub fn builtin_template(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, source)| *source)
}

/// Errors that can occur while resolving or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The configured template directory does not exist or is not a directory.
    #[error("Configured template directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// No override and no built-in template with this name.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// The template file exists but could not be read.
    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template has invalid syntax.
    #[error("Failed to parse template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// A resolver returned a different number of templates than requested.
    #[error("Template resolver returned {actual} templates for {expected} names")]
    CountMismatch { expected: usize, actual: usize },

    /// Rendering failed.
    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// A compiled, renderable template.
///
/// Cheap to clone; handles resolved together share one registry. Two templates
/// are equal when they have the same name and source text.
#[derive(Clone)]
pub struct Template {
    name: String,
    source: Arc<str>,
    registry: Arc<Handlebars<'static>>,
}

impl Template {
    /// Template name (file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render with the given variables.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        self.registry
            .render(&self.name, data)
            .map_err(|e| TemplateError::Render {
                name: self.name.clone(),
                source: Box::new(e),
            })
    }

    /// Render a template that takes no variables.
    pub fn render_static(&self) -> Result<String, TemplateError> {
        self.render(&serde_json::json!({}))
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.source == other.source
    }
}

impl Eq for Template {}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .finish()
    }
}

/// Compile named template sources into handles sharing one registry.
///
/// Handles are returned in input order.
pub fn compile_templates<I, N, S>(sources: I) -> Result<Vec<Template>, TemplateError>
where
    I: IntoIterator<Item = (N, S)>,
    N: Into<String>,
    S: Into<String>,
{
    let mut registry = Handlebars::new();
    let mut compiled = Vec::new();

    for (name, source) in sources {
        let name = name.into();
        let source: String = source.into();
        registry
            .register_template_string(&name, &source)
            .map_err(|e| TemplateError::Parse {
                name: name.clone(),
                source: Box::new(e),
            })?;
        compiled.push((name, Arc::<str>::from(source)));
    }

    let registry = Arc::new(registry);
    Ok(compiled
        .into_iter()
        .map(|(name, source)| Template {
            name,
            source,
            registry: Arc::clone(&registry),
        })
        .collect())
}

/// Resolves named templates, given an optional override directory.
///
/// Implementations fall back to built-in defaults for names missing from the
/// override directory. Results are returned in the order of `names`.
pub trait TemplateResolver {
    fn read_templates(
        &self,
        names: &[&str],
        custom_dir: Option<&Path>,
    ) -> Result<Vec<Template>, TemplateError>;
}

/// Resolves templates from disk with built-in fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTemplateResolver;

impl FileTemplateResolver {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateResolver for FileTemplateResolver {
    fn read_templates(
        &self,
        names: &[&str],
        custom_dir: Option<&Path>,
    ) -> Result<Vec<Template>, TemplateError> {
        if let Some(dir) = custom_dir
            && !dir.is_dir()
        {
            return Err(TemplateError::MissingDirectory(dir.to_path_buf()));
        }

        let mut sources = Vec::with_capacity(names.len());
        for &name in names {
            let custom = custom_dir.map(|dir| dir.join(name)).filter(|p| {
                if p.exists() && !p.is_file() {
                    warn!(path = %p.display(), "Template override is not a file, ignoring");
                    return false;
                }
                p.exists()
            });

            let source = match custom {
                Some(path) => {
                    debug!(template = name, path = %path.display(), "Using custom template");
                    std::fs::read_to_string(&path)
                        .map_err(|source| TemplateError::Read { path, source })?
                }
                None => {
                    debug!(template = name, "Using built-in template");
                    builtin_template(name)
                        .ok_or_else(|| TemplateError::NotFound(name.to_string()))?
                        .to_string()
                }
            };

            sources.push((name, source));
        }

        compile_templates(sources)
    }
}
