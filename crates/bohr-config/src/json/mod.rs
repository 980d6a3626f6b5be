//! JSON configuration file parsing

use bohr_core::error::BohrError;
use bohr_core::{ConfigValue, Mapping};
use camino::Utf8Path;

use crate::ConfigResult;

/// Parse a JSON document into a configuration mapping.
///
/// `origin` names the document in error messages (usually its path). The
/// top level must be an object; key order is preserved.
pub fn parse_config_json(content: &str, origin: &str) -> ConfigResult<Mapping> {
    let value: ConfigValue = serde_json::from_str(content).map_err(|e| BohrError::ConfigParse {
        path: origin.to_string(),
        message: parse_message(&e),
        line: e.line(),
        column: e.column(),
    })?;

    match value {
        ConfigValue::Mapping(map) => Ok(map),
        other => Err(BohrError::ConfigValidation {
            field: origin.to_string(),
            reason: format!("top level must be a JSON object, found {}", other.kind()),
        }),
    }
}

/// Read and parse a JSON configuration file.
///
/// This is a blocking read; configuration is resolved once before the
/// server starts.
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<Mapping> {
    let content = std::fs::read_to_string(path).map_err(|e| BohrError::ConfigRead {
        path: path.to_string(),
        source: e,
    })?;

    parse_config_json(&content, path.as_str())
}

/// serde_json appends " at line X column Y" to its Display output; the
/// location is reported separately.
fn parse_message(error: &serde_json::Error) -> String {
    let full = error.to_string();
    match full.rfind(" at line ") {
        Some(index) => full[..index].to_string(),
        None => full,
    }
}
