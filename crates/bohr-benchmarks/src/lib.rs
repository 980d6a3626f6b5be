//! Bohr benchmarking suite
//!
//! Benchmarks for the configuration engine: value coercion and tree
//! building, deep merging, and end-to-end resolution of the server and
//! browser chains including HTML injection.

pub mod common;

pub use common::*;
