//! The immutable result of configuration resolution.
//!
//! Consumers read known paths through the typed accessors here, which turn an
//! absent or mistyped key into a `MissingKey` or `TypeMismatch` error instead
//! of a panic further down.

use bohr_core::error::BohrError;
use bohr_core::types::lookup;
use bohr_core::{ConfigValue, Mapping};
use serde::Serialize;

use crate::ConfigResult;

/// Fully resolved configuration.
///
/// Produced by [`Resolver::build`](crate::Resolver::build); it owns its tree
/// and shares nothing with the resolver that built it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    root: Mapping,
}

impl ResolvedConfig {
    /// The whole tree
    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    pub fn into_mapping(self) -> Mapping {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Value at a dotted path, if present
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        lookup(&self.root, path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Value at a dotted path, or `MissingKey`
    pub fn require(&self, path: &str) -> ConfigResult<&ConfigValue> {
        self.get(path).ok_or_else(|| BohrError::MissingKey {
            path: path.to_string(),
        })
    }

    /// String at a dotted path; absent is `MissingKey`, any other kind (null
    /// included) is `TypeMismatch`
    pub fn require_str(&self, path: &str) -> ConfigResult<&str> {
        let value = self.require(path)?;
        value
            .as_str()
            .ok_or_else(|| BohrError::type_mismatch(path, "a string", value.kind()))
    }

    /// Integer at a dotted path
    pub fn require_integer(&self, path: &str) -> ConfigResult<i64> {
        let value = self.require(path)?;
        value
            .as_i64()
            .ok_or_else(|| BohrError::type_mismatch(path, "an integer", value.kind()))
    }

    /// Optional string; absent and null both read as `None`
    pub fn get_str(&self, path: &str) -> ConfigResult<Option<&str>> {
        self.optional(path, "a string", ConfigValue::as_str)
    }

    /// Optional boolean; absent and null both read as `None`
    pub fn get_bool(&self, path: &str) -> ConfigResult<Option<bool>> {
        self.optional(path, "a boolean", ConfigValue::as_bool)
    }

    /// Optional list; absent and null both read as `None`
    pub fn get_list(&self, path: &str) -> ConfigResult<Option<&[ConfigValue]>> {
        self.optional(path, "a list", ConfigValue::as_list)
    }

    /// Compact JSON rendering of the whole tree.
    ///
    /// Browser-facing snapshots are embedded verbatim into served HTML with
    /// this, so anything resolved into them is readable by every visitor.
    /// They must never hold secrets.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        serde_json::to_string(&self.root).map_err(|e| BohrError::ConfigValidation {
            field: "<root>".to_string(),
            reason: format!("JSON serialization error: {}", e),
        })
    }

    /// Indented JSON rendering, for display
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.root).map_err(|e| BohrError::ConfigValidation {
            field: "<root>".to_string(),
            reason: format!("JSON serialization error: {}", e),
        })
    }

    fn optional<'a, T>(
        &'a self,
        path: &str,
        expected: &'static str,
        view: impl Fn(&'a ConfigValue) -> Option<T>,
    ) -> ConfigResult<Option<T>> {
        match self.get(path) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(value) => view(value)
                .map(Some)
                .ok_or_else(|| BohrError::type_mismatch(path, expected, value.kind())),
        }
    }
}

impl From<Mapping> for ResolvedConfig {
    fn from(root: Mapping) -> Self {
        Self { root }
    }
}
