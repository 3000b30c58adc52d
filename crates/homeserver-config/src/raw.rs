//! Raw configuration mapping and typed key extraction.
//!
//! The root configuration is kept as an untyped JSON mapping of section name to
//! key/value table. Sections pull typed values out of it one key at a time, so a
//! malformed value is reported with its full dotted path (`sso.client_whitelist`)
//! rather than as an opaque whole-file deserialization failure.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{ConfigError, Result};

/// Parsed configuration: section name → key/value table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    sections: Map<String, Value>,
}

impl RootConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let value: Value = toml::from_str(toml_str)
            .map_err(|e| ConfigError::parse(format!("TOML parse error: {e}")))?;
        Self::from_json(value)
    }

    /// Build from a JSON value; the root must be an object.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::parse(format!(
                "configuration root must be a table, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Check if a section is present and not null
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.get(name).is_some_and(|v| !v.is_null())
    }

    /// Get a section by name.
    ///
    /// An absent or null section is returned as an empty section, so every key
    /// falls back to its default. A section that is not a table is an error.
    pub fn section<'a>(&'a self, name: &'a str) -> Result<Section<'a>> {
        let values = match self.sections.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(ConfigError::invalid_type(
                    name,
                    format!("expected a table, got {}", type_name(other)),
                ));
            }
        };

        Ok(Section { name, values })
    }
}

/// A borrowed view of one configuration section.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    name: &'a str,
    values: Option<&'a Map<String, Value>>,
}

impl<'a> Section<'a> {
    /// Section name
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns `true` if the section was absent or has no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_none_or(|m| m.is_empty())
    }

    /// Keys present in this section, in file order.
    pub fn keys(self) -> impl Iterator<Item = &'a str> {
        self.values
            .into_iter()
            .flat_map(|m| m.keys().map(String::as_str))
    }

    /// Dotted path of a key inside this section
    pub fn path(&self, key: &str) -> String {
        format!("{}.{}", self.name, key)
    }

    /// Raw value for a key; null counts as absent.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.values
            .and_then(|m| m.get(key))
            .filter(|v| !v.is_null())
    }

    /// Read a typed value.
    ///
    /// Returns `Ok(None)` for an absent or null key and
    /// [`ConfigError::InvalidType`] when the value has the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.raw(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConfigError::invalid_type(self.path(key), e.to_string())),
        }
    }

    /// Read a typed value, falling back to `T::default()` when absent.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}
