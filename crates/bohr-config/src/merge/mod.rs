//! Deep merging of configuration trees.
//!
//! Mappings merge key by key; every other kind of value (scalars, lists,
//! null) replaces whatever the target held at that key.

use bohr_core::{ConfigValue, Mapping};

/// Merge `source` into `target` in place.
///
/// For each key of `source`:
/// - both sides are mappings: merge recursively, keeping target-only keys;
/// - otherwise: the source value replaces the target value wholesale, even
///   when the target held a mapping or a list there.
pub fn deep_merge(target: &mut Mapping, source: Mapping) {
    for (key, incoming) in source {
        match incoming {
            ConfigValue::Mapping(nested) => {
                if let Some(ConfigValue::Mapping(existing)) = target.get_mut(&key) {
                    deep_merge(existing, nested);
                    continue;
                }
                target.insert(key, ConfigValue::Mapping(nested));
            },
            other => {
                target.insert(key, other);
            },
        }
    }
}

/// Merge `overlay` on top of `base` and return the result
pub fn merged(mut base: Mapping, overlay: Mapping) -> Mapping {
    deep_merge(&mut base, overlay);
    base
}

/// Fold a sequence of layers, later layers taking precedence
pub fn merge_layers(layers: impl IntoIterator<Item = Mapping>) -> Mapping {
    layers.into_iter().fold(Mapping::new(), merged)
}
