//! Common utilities for benchmarks

use bohr_core::{ConfigValue, Mapping};
use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// Mapping with `width` keys per level, nested `depth` levels deep.
///
/// Leaves alternate between integers, booleans and strings so merges see a
/// realistic mix of scalar kinds.
pub fn nested_mapping(width: usize, depth: usize) -> Mapping {
    fn level(width: usize, depth: usize, salt: usize) -> Mapping {
        (0..width)
            .map(|i| {
                let value = if depth == 0 {
                    match (i + salt) % 3 {
                        0 => ConfigValue::Integer((i * salt) as i64),
                        1 => ConfigValue::Boolean(i % 2 == 0),
                        _ => ConfigValue::String(format!("value-{}-{}", salt, i)),
                    }
                } else {
                    ConfigValue::Mapping(level(width, depth - 1, salt + i))
                };
                (format!("key{}", i), value)
            })
            .collect()
    }

    level(width, depth, 1)
}

/// `count` environment variables, half of them carrying `prefix`
pub fn environment(prefix: &str, count: usize) -> Vec<(String, String)> {
    let prefix = prefix.to_uppercase();
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                (format!("{}_SECTION{}_KEY{}", prefix, i % 7, i), i.to_string())
            } else {
                (format!("UNRELATED_VAR_{}", i), "x".to_string())
            }
        })
        .collect()
}

/// `count` command-line overrides below `prefix`
pub fn overrides(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("--{}.section{}.port={}", prefix, i % 5, 8000 + i),
            1 => format!("--{}.section{}.enabled=true", prefix, i % 5),
            _ => format!("--{}.section{}.name{}=svc-{}", prefix, i % 5, i, i),
        })
        .collect()
}
