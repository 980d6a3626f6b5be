//! Named configuration sources for [`Resolver::resolve`](super::Resolver::resolve).

use bohr_core::Mapping;
use camino::Utf8PathBuf;

/// One layer of configuration, applied in list order
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// In-memory mapping, deep-copied into the accumulator
    Seed(Mapping),
    /// JSON file that must exist and parse
    File(Utf8PathBuf),
    /// JSON file that is skipped when it does not exist
    OptionalFile(Utf8PathBuf),
    /// Environment variables filtered by `prefix`
    Environment {
        prefix: String,
        vars: Vec<(String, String)>,
    },
    /// `--<prefix><path>[=<value>]` arguments
    CommandLine { prefix: String, args: Vec<String> },
}

impl Source {
    /// Snapshot the current process environment
    pub fn process_environment(prefix: impl Into<String>) -> Self {
        Source::Environment {
            prefix: prefix.into(),
            vars: std::env::vars().collect(),
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Seed(_) => "seed",
            Source::File(_) => "file",
            Source::OptionalFile(_) => "optional file",
            Source::Environment { .. } => "environment",
            Source::CommandLine { .. } => "command line",
        }
    }
}
