//! Non-fatal diagnostics collected while scanning textual sources.

use std::fmt;

use thiserror::Error;

/// Where a malformed entry was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    Environment,
    CommandLine,
}

impl fmt::Display for InputOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputOrigin::Environment => f.write_str("environment variable"),
            InputOrigin::CommandLine => f.write_str("command-line flag"),
        }
    }
}

/// Malformed input that was skipped or degraded instead of failing resolution.
///
/// Entries never carry the raw value, which may be a secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    /// The name left no key once the prefix was removed; nothing was merged
    #[error("{origin} '{input}' names no configuration key")]
    EmptyName { origin: InputOrigin, input: String },

    /// The name had leading, trailing or doubled separators; they were skipped
    #[error("{origin} '{input}' contains empty path segments")]
    EmptySegments { origin: InputOrigin, input: String },

    /// A flag without `=value`; merged as null
    #[error("command-line flag '{flag}' has no value, using null")]
    MissingValue { flag: String },
}
