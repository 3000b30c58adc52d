//! The `sso` configuration section.
//!
//! Additional settings shared by all single sign-on providers (OpenID Connect,
//! SAML2, CAS): the redirect whitelist, profile syncing, and the HTML templates
//! rendered during the SSO flow.
//!
//! # Example (TOML)
//!
//! ```toml
//! [sso]
//! client_whitelist = ["https://app.example.org/"]
//! update_profile_information = true
//! template_dir = "/etc/homeserver/templates"
//! ```

use std::path::{Path, PathBuf};

use homeserver_config::{ConfigSection, RootConfig, ServerConfig};
use tracing::{info, warn};

use crate::error::SsoConfigError;
use crate::templates::{FileTemplateResolver, Template, TemplateError, TemplateResolver};
use crate::whitelist::ClientWhitelist;

pub const LOGIN_IDP_PICKER_TEMPLATE: &str = "sso_login_idp_picker.html";
pub const REDIRECT_CONFIRM_TEMPLATE: &str = "sso_redirect_confirm.html";
pub const AUTH_CONFIRM_TEMPLATE: &str = "sso_auth_confirm.html";
pub const ERROR_TEMPLATE: &str = "sso_error.html";
pub const ACCOUNT_DEACTIVATED_TEMPLATE: &str = "sso_account_deactivated.html";
pub const AUTH_SUCCESS_TEMPLATE: &str = "sso_auth_success.html";
pub const AUTH_BAD_USER_TEMPLATE: &str = "sso_auth_bad_user.html";

/// Templates read for the SSO flow, in resolution order.
pub const SSO_TEMPLATES: [&str; 7] = [
    LOGIN_IDP_PICKER_TEMPLATE,
    REDIRECT_CONFIRM_TEMPLATE,
    AUTH_CONFIRM_TEMPLATE,
    ERROR_TEMPLATE,
    ACCOUNT_DEACTIVATED_TEMPLATE,
    AUTH_SUCCESS_TEMPLATE,
    AUTH_BAD_USER_TEMPLATE,
];

/// Keys read from the `sso` section.
pub const SSO_KEYS: [&str; 3] = ["client_whitelist", "update_profile_information", "template_dir"];

/// Finalized SSO settings.
///
/// Built once at startup and read-only afterwards; share it behind an `Arc`
/// with whatever handles SSO logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoConfig {
    template_dir: Option<PathBuf>,
    login_idp_picker_template: Template,
    redirect_confirm_template: Template,
    auth_confirm_template: Template,
    error_template: Template,
    account_deactivated_html: String,
    auth_success_html: String,
    auth_bad_user_template: Template,
    client_whitelist: ClientWhitelist,
    update_profile_information: bool,
}

impl SsoConfig {
    /// Read the `sso` section.
    ///
    /// `public_baseurl` comes from the `server` section and is expected to end
    /// with `/`. Templates are resolved through `resolver`, using the section's
    /// `template_dir` as override directory.
    ///
    /// # Errors
    ///
    /// Returns [`SsoConfigError::Config`] when a key has the wrong type, and
    /// [`SsoConfigError::Template`] when a template cannot be resolved, parsed
    /// or pre-rendered.
    pub fn read_config(
        config: &RootConfig,
        public_baseurl: Option<&str>,
        resolver: &dyn TemplateResolver,
    ) -> Result<Self, SsoConfigError> {
        let section = config.section(Self::SECTION)?;

        for key in section.keys().filter(|k| !SSO_KEYS.contains(k)) {
            warn!(key = %section.path(key), "Ignoring unknown configuration key");
        }

        let template_dir = section
            .get::<PathBuf>("template_dir")?
            .filter(|dir| !dir.as_os_str().is_empty());

        let templates = resolver.read_templates(&SSO_TEMPLATES, template_dir.as_deref())?;
        let actual = templates.len();
        let [
            login_idp_picker_template,
            redirect_confirm_template,
            auth_confirm_template,
            error_template,
            account_deactivated_template,
            auth_success_template,
            auth_bad_user_template,
        ]: [Template; 7] = templates.try_into().map_err(|_| TemplateError::CountMismatch {
            expected: SSO_TEMPLATES.len(),
            actual,
        })?;

        // These take no variables, so render them once here.
        let account_deactivated_html = account_deactivated_template.render_static()?;
        let auth_success_html = auth_success_template.render_static()?;

        let client_whitelist: Vec<String> = section.get_or_default("client_whitelist")?;
        let client_whitelist = ClientWhitelist::build(client_whitelist, public_baseurl);

        let update_profile_information: bool =
            section.get_or_default("update_profile_information")?;

        info!(
            template_dir = ?template_dir,
            client_whitelist = ?client_whitelist.entries(),
            update_profile_information,
            "Loaded SSO config"
        );

        Ok(Self {
            template_dir,
            login_idp_picker_template,
            redirect_confirm_template,
            auth_confirm_template,
            error_template,
            account_deactivated_html,
            auth_success_html,
            auth_bad_user_template,
            client_whitelist,
            update_profile_information,
        })
    }

    /// Read the `sso` section, resolving templates from disk.
    pub fn load(config: &RootConfig, server: &ServerConfig) -> Result<Self, SsoConfigError> {
        Self::read_config(config, server.public_baseurl(), &FileTemplateResolver::new())
    }

    /// Override directory for templates, if configured.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    /// Page prompting the user to choose an identity provider.
    ///
    /// Variables: `redirect_url`, `server_name`, `providers` (each with
    /// `idp_id`, `idp_name`, `idp_icon`, `idp_brand`).
    pub fn login_idp_picker_template(&self) -> &Template {
        &self.login_idp_picker_template
    }

    /// Confirmation step before redirecting back to the client.
    ///
    /// Variables: `redirect_url`, `display_url`, `server_name`, `new_user`,
    /// `user_id`, `user_profile.avatar_url`, `user_profile.display_name`.
    pub fn redirect_confirm_template(&self) -> &Template {
        &self.redirect_confirm_template
    }

    /// Page asking the user to re-authenticate to confirm an operation.
    ///
    /// Variables: `redirect_url`, `description`, `idp`.
    pub fn auth_confirm_template(&self) -> &Template {
        &self.auth_confirm_template
    }

    /// Error page. Variables: `error`, `error_description`.
    pub fn error_template(&self) -> &Template {
        &self.error_template
    }

    /// Pre-rendered page shown when a deactivated user logs in.
    pub fn account_deactivated_html(&self) -> &str {
        &self.account_deactivated_html
    }

    /// Pre-rendered page shown after a successful user-interactive auth session.
    pub fn auth_success_html(&self) -> &str {
        &self.auth_success_html
    }

    /// Page shown when re-authentication maps to a different user.
    ///
    /// Variables: `server_name`, `user_id_to_verify`.
    pub fn auth_bad_user_template(&self) -> &Template {
        &self.auth_bad_user_template
    }

    /// Redirect URL prefixes trusted without confirmation.
    pub fn client_whitelist(&self) -> &ClientWhitelist {
        &self.client_whitelist
    }

    /// Whether profile fields are re-synced from the IdP on every login.
    pub fn update_profile_information(&self) -> bool {
        self.update_profile_information
    }
}

impl ConfigSection for SsoConfig {
    const SECTION: &'static str = "sso";

    fn generate_config_section() -> String {
        r#"# Additional settings to use with single-sign on systems such as OpenID Connect,
# SAML2 and CAS.
#
[sso]
# A list of client URLs which are whitelisted so that the user does not
# have to confirm giving access to their account to the URL. Any client
# whose URL starts with an entry in the following list will not be subject
# to an additional confirmation step after the SSO login is completed.
#
# WARNING: An entry such as "https://my.client" is insecure, because it
# will also match "https://my.client.evil.site", exposing your users to
# phishing attacks from evil.site. To avoid this, include a slash after the
# hostname: "https://my.client/".
#
# If server.public_baseurl is set, then the login fallback page (used by
# clients that don't natively support the required login flows) is
# whitelisted in addition to any URLs in this list.
#
# By default, this list is empty.
#
#client_whitelist = ["https://riot.im/develop", "https://my.custom.client/"]

# Uncomment to keep a user's profile fields in sync with information from
# the identity provider. Currently only syncing the displayname is
# supported. Fields are checked on every SSO login, and are updated
# if necessary.
#
# Note that enabling this option will override user profile information,
# regardless of whether users have opted-out of syncing that
# information when first signing in. Defaults to false.
#
#update_profile_information = true

# Directory in which the homeserver will try to find the template files
# below. If not set, or the files named below are not found within the
# template directory, the built-in default templates are used.
#
# Templates use Handlebars syntax. The homeserver will look for the
# following templates in this directory:
#
# * HTML page to prompt the user to choose an Identity Provider during
#   login: 'sso_login_idp_picker.html'.
#
#   This is only used if multiple SSO Identity Providers are configured.
#
#   When rendering, this template is given the following variables:
#     * redirect_url: the URL that the user will be redirected to after
#       login.
#
#     * server_name: the homeserver's name.
#
#     * providers: a list of available Identity Providers. Each element is
#       an object with the following attributes:
#
#         * idp_id: unique identifier for the IdP
#         * idp_name: user-facing name for the IdP
#         * idp_icon: if specified in the IdP config, an MXC URI for an icon
#              for the IdP
#         * idp_brand: if specified in the IdP config, a textual identifier
#              for the brand of the IdP
#
#   The rendered HTML page should contain a form which submits its results
#   back as a GET request, with the following query parameters:
#
#     * redirectUrl: the client redirect URI (ie, the `redirect_url` passed
#       to the template)
#
#     * idp: the 'idp_id' of the chosen IDP.
#
# * HTML page for a confirmation step before redirecting back to the client
#   with the login token: 'sso_redirect_confirm.html'.
#
#   When rendering, this template is given the following variables:
#
#     * redirect_url: the URL the user is about to be redirected to.
#
#     * display_url: the same as `redirect_url`, but with the query
#                    parameters stripped. The intention is to have a
#                    human-readable URL to show to users, not to use it as
#                    the final address to redirect to.
#
#     * server_name: the homeserver's name.
#
#     * new_user: a boolean indicating whether this is the user's first time
#          logging in.
#
#     * user_id: the user's matrix ID.
#
#     * user_profile.avatar_url: an MXC URI for the user's avatar, if any.
#           Unset if the user has not set an avatar.
#
#     * user_profile.display_name: the user's display name. Unset if the user
#           has not set a display name.
#
# * HTML page which notifies the user that they are authenticating to confirm
#   an operation on their account during the user interactive authentication
#   process: 'sso_auth_confirm.html'.
#
#   When rendering, this template is given the following variables:
#     * redirect_url: the URL the user is about to be redirected to.
#
#     * description: the operation which the user is being asked to confirm
#
#     * idp: details of the Identity Provider that we will use to confirm
#       the user's identity: an object with the following attributes:
#
#         * idp_id: unique identifier for the IdP
#         * idp_name: user-facing name for the IdP
#         * idp_icon: if specified in the IdP config, an MXC URI for an icon
#              for the IdP
#         * idp_brand: if specified in the IdP config, a textual identifier
#              for the brand of the IdP
#
# * HTML page shown after a successful user interactive authentication session:
#   'sso_auth_success.html'.
#
#   Note that this page must include the JavaScript which notifies of a
#   successful authentication.
#
#   This template has no additional variables. It is rendered once at startup.
#
# * HTML page shown after a user-interactive authentication session which
#   does not map correctly onto the expected user: 'sso_auth_bad_user.html'.
#
#   When rendering, this template is given the following variables:
#     * server_name: the homeserver's name.
#     * user_id_to_verify: the MXID of the user that we are trying to
#       validate.
#
# * HTML page shown during single sign-on if a deactivated user attempts to
#   login: 'sso_account_deactivated.html'.
#
#   This template has no additional variables. It is rendered once at startup.
#
# * HTML page to display to users if something goes wrong during the
#   authentication process: 'sso_error.html'.
#
#   When rendering, this template is given two variables:
#     * error: the technical name of the error
#     * error_description: a human-readable message for the error
#
#template_dir = "res/templates"
"#
        .to_string()
    }
}
