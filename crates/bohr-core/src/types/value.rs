//! Configuration value types.
//!
//! Every configuration tree handled by Bohr is made of [`ConfigValue`]s. The
//! set of variants is closed so merging and coercion can match on it
//! exhaustively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from keys to configuration values.
///
/// Insertion order is kept so that serialized snapshots list keys in the
/// order their sources declared them.
pub type Mapping = IndexMap<String, ConfigValue>;

/// Separator between segments of a fully-qualified configuration name.
pub const PATH_SEPARATOR: char = '.';

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit absence of a value (e.g. a flag given without `=value`)
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integral number
    Integer(i64),
    /// Non-integral number, only produced by JSON files
    Float(f64),
    /// String value
    String(String),
    /// Ordered list, always treated as an opaque leaf
    List(Vec<ConfigValue>),
    /// Nested mapping
    Mapping(Mapping),
}

impl ConfigValue {
    /// Human readable name of this value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Boolean(_) => "a boolean",
            ConfigValue::Integer(_) => "an integer",
            ConfigValue::Float(_) => "a float",
            ConfigValue::String(_) => "a string",
            ConfigValue::List(_) => "a list",
            ConfigValue::Mapping(_) => "a mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view accepting both integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Integer(value) => Some(*value as f64),
            ConfigValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a dotted path below this value.
    ///
    /// Empty segments are skipped, so `"server..port"` and `"server.port"`
    /// address the same leaf. An empty path returns the value itself.
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        let mut current = self;
        for segment in path_segments(path) {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }
}

/// Look up a dotted path inside a mapping
pub fn lookup<'a>(map: &'a Mapping, path: &str) -> Option<&'a ConfigValue> {
    let mut segments = path_segments(path);
    let first = segments.next()?;
    let mut current = map.get(first)?;
    for segment in segments {
        current = current.as_mapping()?.get(segment)?;
    }
    Some(current)
}

/// Split a fully-qualified name into its segments, skipping blank ones
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(values: Vec<ConfigValue>) -> Self {
        ConfigValue::List(values)
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                // u64 above i64::MAX and non-integral numbers
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(values) => {
                ConfigValue::List(values.into_iter().map(ConfigValue::from).collect())
            },
            serde_json::Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}
