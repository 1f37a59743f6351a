//! AutonomaX CLI and REST API entry point.
//!
//! Binary name: `axmx`
//!
//! Parses CLI arguments, loads settings, wires services, then dispatches to
//! the requested command.

use clap::Parser;

use autonomax_api::cli::{self, Cli, Commands};
use autonomax_api::state::AppState;
use autonomax_infra::config::{Credentials, load_settings};
use autonomax_observe::tracing_setup::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_filter(), cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = load_settings(cli.config.as_deref()).await;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                settings.api.port = port;
            }
            if let Some(host) = host {
                settings.api.host = host;
            }

            let (state, worker) = AppState::init(settings, Credentials::from_env())?;
            cli::serve::serve(state, worker, cli.quiet).await?;
        }

        Commands::Draft(args) => {
            let brief = cli::draft::read_brief(args).await?;
            let (state, _worker) = AppState::init(settings, Credentials::from_env())?;
            cli::draft::generate(&state.generator, brief, cli.json).await?;
        }
    }

    Ok(())
}
