//! Parlance CLI and HTTP API entry point.
//!
//! Binary name: `parlance`
//!
//! Parses CLI arguments, loads the configuration file, then either prints it
//! or wires the chat service and starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use parlance_infra::config::{load_config, resolve_config_path};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parlance", &mut std::io::stdout());
        return Ok(());
    }

    parlance_observe::init_tracing(cli.log_filter(), cli.log_format.into(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(&cli).await;

    parlance_observe::shutdown_tracing();
    result
}

/// Load the configuration and dispatch the command.
///
/// Every error returns here instead of exiting, so `main` always reaches
/// `shutdown_tracing`.
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = load_config(&config_path).await;

    match &cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(host) = host {
                config.server.host = host.clone();
            }

            let state = AppState::init(config).inspect_err(|e| {
                tracing::error!(error = %e, "Startup failed");
            })?;
            cli::serve::serve(state, cli.quiet).await
        }

        Commands::Config => cli::config::show_config(&config, &config_path, cli.json),

        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
