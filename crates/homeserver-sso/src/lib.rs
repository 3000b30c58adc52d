//! # homeserver-sso
//!
//! Single sign-on configuration for the homeserver.
//!
//! This crate provides:
//! - The `sso` configuration section: client redirect whitelist, profile
//!   syncing, and the HTML templates rendered during the SSO flow
//! - Attribute requirements checked against identity provider claims, with
//!   the JSON schema used to validate them
//! - Template resolution with an override directory and built-in defaults
//!
//! ## Modules
//!
//! - [`attributes`] - Attribute requirements and their schema
//! - [`config`] - The `sso` section loader
//! - [`templates`] - Template resolution and rendering
//! - [`whitelist`] - Trusted client redirect prefixes

pub mod attributes;
pub mod config;
pub mod error;
pub mod templates;
pub mod whitelist;

pub use attributes::{
    SsoAttributeRequirement, attribute_requirement_list_schema, attribute_requirement_schema,
    parse_attribute_requirements, satisfies_all,
};
pub use config::{SSO_KEYS, SSO_TEMPLATES, SsoConfig};
pub use error::SsoConfigError;
pub use templates::{
    FileTemplateResolver, Template, TemplateError, TemplateResolver, builtin_template,
    compile_templates,
};
pub use whitelist::{ClientWhitelist, LOGIN_FALLBACK_PATH, login_fallback_url};
