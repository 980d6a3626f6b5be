//! Utility functions and helpers.
//!
//! Common functionality used across multiple Bohr crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{extension_of, is_safe_path, resolve_request_path};
