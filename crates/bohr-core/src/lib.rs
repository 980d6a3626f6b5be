//! # bohr-core
//!
//! Core types and utilities shared across all Bohr crates.
//!
//! This crate provides:
//! - `ConfigValue`, the closed value type every configuration tree is built from
//! - `BohrError` enum for unified error handling
//! - Path helpers used when serving files from disk
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Configuration value types (`ConfigValue`, `Mapping`)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{BohrError, BohrResult};
pub use types::{ConfigValue, Mapping};
