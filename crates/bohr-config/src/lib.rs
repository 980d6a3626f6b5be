//! Layered configuration resolution for Bohr
//!
//! This crate builds one configuration tree out of in-memory defaults, JSON
//! files, environment variables and command-line overrides. Textual values are
//! turned into typed leaves by the coercer, dotted names become nested
//! mappings through the tree builder, and every layer is folded into the
//! accumulator by the deep merger.

pub mod coerce;
pub mod json;
pub mod merge;
pub mod resolver;
pub mod snapshot;
pub mod tree;

// Re-export main types
pub use coerce::{coerce, coerce_with, CoercionMode};
pub use merge::deep_merge;
pub use resolver::{InputOrigin, MalformedInput, Resolver, Source};
pub use snapshot::ResolvedConfig;
pub use tree::{build_tree, build_tree_with};

use bohr_core::error::BohrError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, BohrError>;
