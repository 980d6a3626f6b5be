//! `bohr config`: print a resolved configuration.

use bohr_config::ResolvedConfig;
use bohr_core::error::BohrResult;

use super::{load_browser_config, load_server_config, CommandContext};
use crate::{ConfigArgs, ConfigKind};

pub fn execute(show: ConfigKind, args: ConfigArgs, ctx: &CommandContext) -> BohrResult<()> {
    let config = resolve(show, &args, ctx, std::env::vars())?;
    ctx.output.print(&config.to_json_pretty()?);
    Ok(())
}

/// Resolve the configuration selected by `show`
pub fn resolve<I>(
    show: ConfigKind,
    args: &ConfigArgs,
    ctx: &CommandContext,
    env: I,
) -> BohrResult<ResolvedConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    match show {
        ConfigKind::Server => load_server_config(args, ctx),
        ConfigKind::Browser => load_browser_config(args, ctx, env),
    }
}
