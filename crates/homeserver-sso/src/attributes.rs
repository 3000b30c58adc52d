//! Attribute requirements for SSO logins.
//!
//! An attribute requirement is a rule checked against the claims an identity
//! provider asserts about a user: either "claim X must exist" or "claim X must
//! equal value V". Identity provider sections hold a list of these and reject
//! logins whose claims do not satisfy all of them.
//!
//! # Example (TOML)
//!
//! ```toml
//! attribute_requirements = [
//!     { attribute = "userGroup", value = "staff" },
//!     { attribute = "department" },
//! ]
//! ```

use std::sync::LazyLock;

use homeserver_config::{ConfigError, Section};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A single requirement on an identity provider attribute.
///
/// Instances are immutable; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SsoAttributeRequirement {
    attribute: String,
    /// If not given, the attribute must simply exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

static ATTRIBUTE_REQUIREMENT_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "attribute": { "type": "string" },
            "value": { "type": "string" }
        },
        "required": ["attribute", "value"]
    })
});

static ATTRIBUTE_REQUIREMENT_LIST_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "array",
        "items": &*ATTRIBUTE_REQUIREMENT_SCHEMA
    })
});

/// JSON schema describing one attribute requirement.
///
/// Note that the schema lists `value` as required while
/// [`SsoAttributeRequirement`] treats it as optional. Payloads validated
/// against this schema must always carry a `value`.
pub fn attribute_requirement_schema() -> &'static Value {
    &ATTRIBUTE_REQUIREMENT_SCHEMA
}

/// JSON schema describing a list of attribute requirements.
pub fn attribute_requirement_list_schema() -> &'static Value {
    &ATTRIBUTE_REQUIREMENT_LIST_SCHEMA
}

impl SsoAttributeRequirement {
    /// Create a requirement. `None` means presence of the attribute is enough.
    #[must_use]
    pub fn new(attribute: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.map(Into::into),
        }
    }

    /// Requirement satisfied by the mere presence of `attribute`.
    #[must_use]
    pub fn exists(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: None,
        }
    }

    /// Requirement satisfied only when `attribute` equals `value`.
    #[must_use]
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: Some(value.into()),
        }
    }

    /// Name of the claim this requirement checks.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Expected value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Check this requirement against a set of claims.
    ///
    /// A null claim counts as absent. A list-valued claim (as SAML emits for
    /// multi-valued attributes) matches if any string element equals the
    /// expected value.
    #[must_use]
    pub fn is_satisfied_by(&self, claims: &Map<String, Value>) -> bool {
        let Some(claim) = claims.get(&self.attribute).filter(|v| !v.is_null()) else {
            return false;
        };

        let Some(expected) = self.value.as_deref() else {
            return true;
        };

        match claim {
            Value::String(s) => s == expected,
            Value::Array(items) => items.iter().any(|v| v.as_str() == Some(expected)),
            _ => false,
        }
    }
}

/// Returns `true` if `claims` satisfy every requirement. An empty list passes.
pub fn satisfies_all(
    requirements: &[SsoAttributeRequirement],
    claims: &Map<String, Value>,
) -> bool {
    requirements.iter().all(|req| req.is_satisfied_by(claims))
}

/// Read a list of attribute requirements from a section key.
///
/// Absent keys yield an empty list. Shape errors carry the key path.
pub fn parse_attribute_requirements(
    section: &Section<'_>,
    key: &str,
) -> Result<Vec<SsoAttributeRequirement>, ConfigError> {
    let requirements: Vec<SsoAttributeRequirement> = section.get_or_default(key)?;

    for (idx, req) in requirements.iter().enumerate() {
        if req.attribute.is_empty() {
            return Err(ConfigError::invalid_value(
                format!("{}[{idx}].attribute", section.path(key)),
                "attribute name must not be empty",
            ));
        }
    }

    Ok(requirements)
}
