//! AgentMint REST API entry point.
//!
//! Binary name: `agentmint`
//!
//! Parses CLI arguments, initializes tracing, storage and services, then
//! starts the REST API server or prints service status.

mod cli;
mod http;
mod state;

use agentmint_core::repository::agent::AgentRepository;
use agentmint_observe::tracing_setup::{init_tracing, shutdown_tracing};
use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.otel, cli.log_directive())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Serve { port, host } => serve(state.clone(), &host, port).await,
        Commands::Status => status(&state).await,
    };

    state.catalog.close().await?;
    shutdown_tracing();
    result
}

async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!();
    println!(
        "  {} AgentMint API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}/api/v1")).cyan()
    );
    println!(
        "  {} storage: {}, replies: {}",
        console::style("•").dim(),
        backend_label(&state),
        completion_label(&state)
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    tracing::info!(%addr, "server started");

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

async fn status(state: &AppState) -> anyhow::Result<()> {
    let agents = state.catalog.list(None).await?;
    let minted = agents.iter().filter(|a| a.nft.is_some()).count();
    let healthy = state.catalog.is_healthy().await;

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", console::style("✓").green())
        } else {
            format!("{}", console::style("✗").red())
        }
    };

    println!();
    println!(
        "  {} {}",
        console::style("AgentMint").bold(),
        console::style(env!("CARGO_PKG_VERSION")).dim()
    );
    println!();
    println!("  Data directory: {}", state.data_dir.display());
    println!("  {} Storage ({})", check_mark(healthy), backend_label(state));
    println!(
        "  {} Completion ({})",
        check_mark(state.has_completion_key()),
        completion_label(state)
    );
    println!("  Agents: {} ({} with NFT)", agents.len(), minted);
    println!();
    Ok(())
}

fn backend_label(state: &AppState) -> String {
    format!("{:?}", state.catalog.backend()).to_lowercase()
}

fn completion_label(state: &AppState) -> &'static str {
    if state.has_completion_key() {
        "completion service"
    } else {
        "fallback templates"
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
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

    tracing::info!("shutdown signal received");
}
