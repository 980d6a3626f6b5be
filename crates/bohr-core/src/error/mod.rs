//! Error types and result aliases for Bohr operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the Bohr crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all Bohr operations
#[derive(Error, Debug)]
pub enum BohrError {
    // Config errors
    #[error("Failed to read configuration file {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {message} at line {line}, column {column}")]
    ConfigParse {
        path: String,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Configuration key '{path}' is missing")]
    MissingKey { path: String },

    #[error("Configuration key '{path}' should be {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    // Server errors
    #[error("Path escapes the served directory: {path}")]
    PathTraversal { path: String },

    #[error("Failed to bind to {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Bohr operations
pub type BohrResult<T> = Result<T, BohrError>;

impl BohrError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a type mismatch error for a configuration path
    pub fn type_mismatch(path: &str, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected,
            found,
        }
    }

    /// Check if this error came from reading or interpreting configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BohrError::ConfigRead { .. }
                | BohrError::ConfigParse { .. }
                | BohrError::ConfigValidation { .. }
                | BohrError::MissingKey { .. }
                | BohrError::TypeMismatch { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            BohrError::ConfigRead { .. } => {
                Some("Check the path passed with --server-config or --browser-config")
            },
            BohrError::ConfigParse { .. } => {
                Some("Configuration files must contain a single valid JSON object")
            },
            BohrError::MissingKey { .. } => {
                Some("Set the key in the configuration file or pass it as --<path>=<value>")
            },
            BohrError::TypeMismatch { .. } => {
                Some("Command-line and environment values starting with digits become integers, true/false become booleans")
            },
            BohrError::Bind { .. } => Some("Pick another port with --server.port=<port>"),
            BohrError::Network { .. } => Some("Check that the proxied backend is running"),
            _ => None,
        }
    }
}
