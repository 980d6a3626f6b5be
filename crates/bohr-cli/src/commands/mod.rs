//! Command implementations and dispatch logic.
//!
//! Both commands resolve the same two configuration chains:
//! - server: built-in defaults < server file < overrides
//! - browser: prefixed environment < browser file < prefixed overrides

use bohr_config::{ResolvedConfig, Resolver, Source};
use bohr_core::error::{BohrError, BohrResult};
use bohr_server::ServerSettings;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

pub mod config;
pub mod serve;


use crate::output::OutputHandler;
use crate::{Commands, ConfigArgs, DEFAULT_BROWSER_CONFIG, DEFAULT_SERVER_CONFIG};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a context rooted at the current directory
    pub fn new() -> BohrResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| BohrError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| BohrError::ConfigValidation {
            field: "working directory".to_string(),
            reason: format!("{} is not valid UTF-8", e.as_path().display()),
        })?;

        let output = OutputHandler::new();

        Ok(Self { cwd, output })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> BohrResult<()> {
    match command {
        Commands::Serve(args) => {
            info!("Starting development server");
            serve::execute(args, ctx).await
        },
        Commands::Config { show, args } => {
            info!("Printing {:?} configuration", show);
            config::execute(show, args, ctx)
        },
    }
}

/// Resolve the server configuration chain
pub fn load_server_config(args: &ConfigArgs, ctx: &CommandContext) -> BohrResult<ResolvedConfig> {
    let sources = vec![
        Source::Seed(ServerSettings::defaults()),
        config_file(ctx, args.server_config.as_deref(), DEFAULT_SERVER_CONFIG),
        Source::CommandLine {
            prefix: String::new(),
            args: args.overrides.clone(),
        },
    ];
    debug!(sources = sources.len(), "resolving server configuration");
    Resolver::resolve(sources)
}

/// Resolve the browser configuration chain against `env`
pub fn load_browser_config<I>(
    args: &ConfigArgs,
    ctx: &CommandContext,
    env: I,
) -> BohrResult<ResolvedConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let sources = vec![
        Source::Environment {
            prefix: args.browser_prefix.clone(),
            vars: env.into_iter().collect(),
        },
        config_file(ctx, args.browser_config.as_deref(), DEFAULT_BROWSER_CONFIG),
        Source::CommandLine {
            prefix: args.browser_prefix.clone(),
            args: args.overrides.clone(),
        },
    ];
    debug!(prefix = %args.browser_prefix, "resolving browser configuration");
    Resolver::resolve(sources)
}

/// An explicitly given file must exist; the default location may be absent
fn config_file(ctx: &CommandContext, given: Option<&Utf8Path>, default: &str) -> Source {
    match given {
        Some(path) => Source::File(ctx.cwd.join(path)),
        None => Source::OptionalFile(ctx.cwd.join(default)),
    }
}
