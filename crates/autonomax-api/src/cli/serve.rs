//! REST API server command.

use anyhow::Result;
use console::style;
use tokio_util::sync::CancellationToken;

use crate::http::router::build_router;
use crate::state::{AppState, ConcretePublishWorker};

/// Serve the API until Ctrl+C or SIGTERM, running the publish worker alongside.
///
/// On shutdown the worker is cancelled; tasks still queued are dropped with
/// the process.
pub async fn serve(state: AppState, worker: ConcretePublishWorker, quiet: bool) -> Result<()> {
    let addr = format!("{}:{}", state.settings.api.host, state.settings.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let cancel = CancellationToken::new();
    let worker_handle = tokio::spawn(worker.run(cancel.clone()));

    tracing::info!(
        %addr,
        env = %state.settings.app_env,
        provider = %state.generator.provider_name(),
        "AutonomaX API listening"
    );
    if !quiet {
        println!(
            "  {} AutonomaX API listening on {}",
            style("⚡").bold(),
            style(format!("http://{addr}")).cyan()
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    if let Err(e) = worker_handle.await {
        tracing::warn!(error = %e, "publish worker ended abnormally");
    }

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
