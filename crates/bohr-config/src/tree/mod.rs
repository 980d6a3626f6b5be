//! Turn a fully-qualified name and a value into a single-branch configuration tree.

use bohr_core::types::path_segments;
use bohr_core::{ConfigValue, Mapping};

use crate::coerce::{coerce_with, CoercionMode};

/// Build a tree for `fqn` with `leaf` at the end of the path.
///
/// `build_tree_with("server.port", 8080.into())` yields
/// `{"server": {"port": 8080}}`. Empty and blank segments are skipped; a
/// name made only of separators and whitespace yields an empty mapping,
/// which merges as a no-op.
pub fn build_tree_with(fqn: &str, leaf: ConfigValue) -> Mapping {
    let segments: Vec<&str> = path_segments(fqn).collect();
    let Some((last, parents)) = segments.split_last() else {
        return Mapping::new();
    };

    // Leaf first, then wrap outwards
    let mut node = Mapping::new();
    node.insert((*last).to_string(), leaf);
    for segment in parents.iter().rev() {
        let mut parent = Mapping::new();
        parent.insert((*segment).to_string(), ConfigValue::Mapping(node));
        node = parent;
    }
    node
}

/// Build a tree from an externally supplied raw value.
///
/// A missing or empty raw value becomes [`ConfigValue::Null`]; anything else
/// goes through the coercer.
pub fn build_tree(fqn: &str, raw: Option<&str>, mode: CoercionMode) -> Mapping {
    let leaf = match raw {
        Some(raw) if !raw.is_empty() => coerce_with(raw, mode),
        _ => ConfigValue::Null,
    };
    build_tree_with(fqn, leaf)
}

/// Number of levels in a tree produced by [`build_tree_with`]
pub fn depth(tree: &Mapping) -> usize {
    let mut depth = 0;
    let mut current = Some(tree);
    while let Some(map) = current {
        let Some(child) = map.values().next() else {
            break;
        };
        depth += 1;
        current = child.as_mapping();
    }
    depth
}
