//! # bohr-cli
//!
//! Development server for single-page applications.
//!
//! This is the entry point of the `bohr` binary. It parses the command line,
//! sets up logging and panic reporting, and dispatches to the command
//! handlers.

use bohr_core::error::{BohrError, BohrResult};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Default location of the server configuration file
pub const DEFAULT_SERVER_CONFIG: &str = "conf/server.json";

/// Default location of the browser configuration file
pub const DEFAULT_BROWSER_CONFIG: &str = "conf/browser.json";

/// Default prefix for browser environment variables and overrides
pub const DEFAULT_BROWSER_PREFIX: &str = "browser";

/// Development server that injects runtime configuration into your app
#[derive(Parser)]
#[command(
    name = "bohr",
    version,
    about = "Development server for single-page applications",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for `serve` when no command is given
    #[command(flatten)]
    pub serve: ConfigArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the static root with the browser configuration injected (default)
    Serve(ConfigArgs),
    /// Print a resolved configuration as JSON
    Config {
        /// Which configuration to print
        #[arg(long, value_enum, default_value_t = ConfigKind::Browser)]
        show: ConfigKind,

        #[command(flatten)]
        args: ConfigArgs,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigKind {
    Server,
    Browser,
}

/// Where configuration comes from
#[derive(Args, Clone, Debug, PartialEq)]
pub struct ConfigArgs {
    /// Server configuration file [default: conf/server.json, skipped if absent]
    #[arg(long, value_name = "PATH")]
    pub server_config: Option<Utf8PathBuf>,

    /// Browser configuration file [default: conf/browser.json, skipped if absent]
    #[arg(long, value_name = "PATH")]
    pub browser_config: Option<Utf8PathBuf>,

    /// Prefix selecting browser environment variables and overrides
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_BROWSER_PREFIX)]
    pub browser_prefix: String,

    /// Overrides such as --server.port=6060 or --browser.apiUrl=/api.
    ///
    /// Everything from the first override on is taken as an override, so
    /// options like -v must come before them.
    #[arg(value_name = "OVERRIDES", trailing_var_arg = true, allow_hyphen_values = true)]
    pub overrides: Vec<String>,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            server_config: None,
            browser_config: None,
            browser_prefix: DEFAULT_BROWSER_PREFIX.to_string(),
            overrides: Vec::new(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting Bohr v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_cli(cli) {
        eprintln!("{}", ErrorFormatter::new().format_error(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> BohrResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BohrError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new()?;
        let command = cli.command.unwrap_or(Commands::Serve(cli.serve));
        commands::dispatch_command(command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bohr={},bohr_config={},bohr_server={}",
            level, level, level
        ))
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Bohr encountered an unexpected error: {}", panic_info);
        eprintln!("Bohr crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
