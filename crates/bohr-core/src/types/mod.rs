//! Core data types for Bohr configuration.
//!
//! This module provides the fundamental types used throughout the Bohr crates:
//! - `ConfigValue`, the closed sum type of configuration values
//! - `Mapping`, the ordered key/value tree node
//! - Dotted path helpers shared by the tree builder and lookups

pub mod value;

// Re-export all public types
pub use value::{lookup, path_segments, ConfigValue, Mapping, PATH_SEPARATOR};
