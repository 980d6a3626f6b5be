//! `bohr serve`: resolve both configurations and run the server until Ctrl-C.

use bohr_core::error::BohrResult;
use bohr_server::{ApplicationServer, ServerSettings};
use tracing::info;

use super::{load_browser_config, load_server_config, CommandContext};
use crate::ConfigArgs;

pub async fn execute(args: ConfigArgs, ctx: &CommandContext) -> BohrResult<()> {
    let server_config = load_server_config(&args, ctx)?;
    let browser_config = load_browser_config(&args, ctx, std::env::vars())?;

    let mut settings = ServerSettings::from_config(&server_config)?;
    if settings.static_path.is_relative() {
        settings.static_path = ctx.cwd.join(&settings.static_path);
    }
    info!(static_path = %settings.static_path, port = settings.port, "server settings resolved");

    if !settings.index_path().is_file() {
        ctx.output.warn(&format!(
            "Index document {} not found; page requests will fail until it exists",
            settings.index_path()
        ));
    }

    let server = ApplicationServer::new(settings, &browser_config)?.bind().await?;
    ctx.output.success(&format!("Serving on http://{}", server.local_addr()));
    ctx.output.info("Press Ctrl-C to stop");

    server.serve_until(shutdown_signal(ctx)).await?;
    ctx.output.success("Server stopped");
    Ok(())
}

async fn shutdown_signal(ctx: &CommandContext) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        ctx.output.error(&format!("Failed to listen for Ctrl-C: {}", e));
        std::future::pending::<()>().await;
    }
}
