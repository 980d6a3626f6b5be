//! Layered configuration resolution.
//!
//! A [`Resolver`] owns one accumulating configuration tree. Each merge step
//! consumes the resolver and hands it back, so the order of calls is the
//! order of precedence: whatever is merged last wins for scalars and lists,
//! while mappings are merged key by key.
//!
//! ```no_run
//! use bohr_config::Resolver;
//!
//! # fn main() -> bohr_config::ConfigResult<()> {
//! let config = Resolver::new()
//!     .merge_file("conf/server.json")?
//!     .with_prefix("APP")
//!     .merge_environment(std::env::vars())
//!     .with_prefix("")
//!     .merge_command_line(std::env::args().skip(1))
//!     .build();
//! # Ok(())
//! # }
//! ```

mod source;
mod warning;

#[cfg(test)]
mod tests;

pub use source::Source;
pub use warning::{InputOrigin, MalformedInput};

use bohr_core::types::PATH_SEPARATOR;
use bohr_core::Mapping;
use camino::Utf8Path;
use tracing::{debug, warn};

use crate::coerce::CoercionMode;
use crate::merge::deep_merge;
use crate::snapshot::ResolvedConfig;
use crate::tree::build_tree;
use crate::{json, ConfigResult};

/// Separator between words of an environment variable name
const ENV_SEPARATOR: char = '_';

/// Leading marker of a command-line override
const FLAG_MARKER: &str = "--";

/// Accumulates configuration from ordered sources
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// Configuration merged so far
    accumulator: Mapping,
    /// Filter for environment variables and command-line flags
    prefix: String,
    /// Integer recognition for textual sources
    coercion: CoercionMode,
    /// Malformed entries seen so far
    warnings: Vec<MalformedInput>,
}

impl Resolver {
    /// Create a resolver with an empty accumulator and no prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver whose accumulator starts as a copy of `seed`
    pub fn with_seed(seed: &Mapping) -> Self {
        Self::new().merge_seed(seed)
    }

    /// Run `sources` in order through a fresh resolver and build the result
    pub fn resolve(sources: impl IntoIterator<Item = Source>) -> ConfigResult<ResolvedConfig> {
        sources
            .into_iter()
            .try_fold(Self::new(), Self::apply)
            .map(Self::build)
    }

    /// Set the prefix used by later environment and command-line merges.
    ///
    /// Sources merged earlier are not affected.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Choose how later textual values are turned into integers
    #[must_use]
    pub fn with_coercion(mut self, mode: CoercionMode) -> Self {
        self.coercion = mode;
        self
    }

    /// Current prefix filter
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Malformed environment and command-line entries seen so far
    pub fn warnings(&self) -> &[MalformedInput] {
        &self.warnings
    }

    /// Deep-merge a copy of `seed`; the caller's mapping is left untouched
    #[must_use]
    pub fn merge_seed(mut self, seed: &Mapping) -> Self {
        debug!(keys = seed.len(), "merging seed configuration");
        deep_merge(&mut self.accumulator, seed.clone());
        self
    }

    /// Read a JSON file and deep-merge it.
    ///
    /// Fails with `ConfigRead` when the file cannot be read and with
    /// `ConfigParse` when it is not valid JSON. File values keep their JSON
    /// types and are not coerced.
    pub fn merge_file(mut self, path: impl AsRef<Utf8Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = json::load_from_file(path)?;
        debug!(%path, keys = config.len(), "merging configuration file");
        deep_merge(&mut self.accumulator, config);
        Ok(self)
    }

    /// Like [`merge_file`](Self::merge_file), but a file that does not exist
    /// is skipped. A file that exists and fails to read or parse is still an
    /// error.
    pub fn merge_optional_file(self, path: impl AsRef<Utf8Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(%path, "optional configuration file not found, skipping");
            return Ok(self);
        }
        self.merge_file(path)
    }

    /// Merge environment variables whose names start with the upper-cased prefix.
    ///
    /// The prefix must be followed by `_`, which is dropped. Every other `_`
    /// in the rest of the name becomes `.` and the result is lower-cased, so
    /// with prefix `APP` the variable `APP_SERVER_PORT` sets `server.port`
    /// while `APPLE_X` is ignored. Variables are applied in name order.
    #[must_use]
    pub fn merge_environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut matched: Vec<(String, String, String)> = vars
            .into_iter()
            .filter_map(|(name, value)| {
                let name = name.as_ref();
                env_name_to_fqn(name, &self.prefix)
                    .map(|fqn| (name.to_string(), fqn, value.as_ref().to_string()))
            })
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged = 0usize;
        for (name, fqn, value) in matched {
            if self.merge_textual(InputOrigin::Environment, &name, &fqn, Some(&value)) {
                merged += 1;
            }
        }

        debug!(prefix = %self.prefix, merged, "merged environment variables");
        self
    }

    /// Merge the live process environment
    #[must_use]
    pub fn merge_process_environment(self) -> Self {
        self.merge_environment(std::env::vars())
    }

    /// Merge `--<prefix><path>[=<value>]` arguments.
    ///
    /// The prefix is matched case-sensitively and must be followed by `.`,
    /// which is removed, or by `=`. Everything up to the first `=` is the path; a flag with
    /// no `=` merges null. Other arguments are ignored.
    #[must_use]
    pub fn merge_command_line<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merged = 0usize;
        for arg in args {
            let arg = arg.as_ref();
            let Some((path, value)) = parse_flag(arg, &self.prefix) else {
                continue;
            };

            let flag = arg.split_once('=').map_or(arg, |(flag, _)| flag);
            if !self.merge_textual(InputOrigin::CommandLine, flag, path, value) {
                continue;
            }
            merged += 1;
            if value.is_none() {
                self.record(MalformedInput::MissingValue {
                    flag: flag.to_string(),
                });
            }
        }

        debug!(prefix = %self.prefix, merged, "merged command-line overrides");
        self
    }

    /// Apply one named source
    pub fn apply(self, source: Source) -> ConfigResult<Self> {
        debug!(source = source.kind(), "applying configuration source");
        match source {
            Source::Seed(seed) => Ok(self.merge_seed(&seed)),
            Source::File(path) => self.merge_file(path),
            Source::OptionalFile(path) => self.merge_optional_file(path),
            Source::Environment { prefix, vars } => {
                Ok(self.with_prefix(prefix).merge_environment(vars))
            },
            Source::CommandLine { prefix, args } => {
                Ok(self.with_prefix(prefix).merge_command_line(args))
            },
        }
    }

    /// Finish resolution and hand out the immutable snapshot
    pub fn build(self) -> ResolvedConfig {
        if !self.warnings.is_empty() {
            debug!(warnings = self.warnings.len(), "configuration resolved with warnings");
        }
        ResolvedConfig::from(self.accumulator)
    }

    /// Build a tree for one textual entry and merge it. Returns whether
    /// anything was merged.
    fn merge_textual(
        &mut self,
        origin: InputOrigin,
        input: &str,
        fqn: &str,
        raw: Option<&str>,
    ) -> bool {
        let tree = build_tree(fqn, raw, self.coercion);
        if tree.is_empty() {
            self.record(MalformedInput::EmptyName {
                origin,
                input: input.to_string(),
            });
            return false;
        }
        if has_empty_segments(fqn) {
            self.record(MalformedInput::EmptySegments {
                origin,
                input: input.to_string(),
            });
        }

        deep_merge(&mut self.accumulator, tree);
        true
    }

    fn record(&mut self, warning: MalformedInput) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Translate an environment variable name into a dotted path.
///
/// Returns `None` unless `name` is the upper-cased `prefix` alone or followed
/// by `_`, so with prefix `BROWSER` the variable `BROWSERSLIST_ENV` is not
/// picked up.
pub fn env_name_to_fqn(name: &str, prefix: &str) -> Option<String> {
    let remainder = name.strip_prefix(prefix.to_uppercase().as_str())?;
    let remainder = if prefix.is_empty() || remainder.is_empty() {
        remainder
    } else {
        remainder.strip_prefix(ENV_SEPARATOR)?
    };
    Some(
        remainder
            .replace(ENV_SEPARATOR, &PATH_SEPARATOR.to_string())
            .to_lowercase(),
    )
}

/// Split a `--<prefix><path>[=<value>]` argument into path and value.
///
/// Returns `None` when `arg` is not a flag carrying `prefix` as a whole
/// segment: `--browserify` does not carry the prefix `browser`.
pub fn parse_flag<'a>(arg: &'a str, prefix: &str) -> Option<(&'a str, Option<&'a str>)> {
    let body = arg.strip_prefix(FLAG_MARKER)?.strip_prefix(prefix)?;
    let body = if prefix.is_empty() || body.is_empty() || body.starts_with('=') {
        body
    } else {
        body.strip_prefix(PATH_SEPARATOR)?
    };
    let (path, value) = match body.split_once('=') {
        Some((path, value)) => (path, Some(value)),
        None => (body, None),
    };
    Some((path, value))
}

fn has_empty_segments(fqn: &str) -> bool {
    fqn.split(PATH_SEPARATOR).any(|segment| segment.trim().is_empty())
}
