//! CLI definitions for the `agentmint` binary.

use clap::{Parser, Subcommand};

/// AI agent studio with simulated NFT sales.
#[derive(Parser)]
#[command(name = "agentmint", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true, env = "AGENTMINT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show data directory, storage backend and completion status.
    Status,
}

impl Cli {
    /// Default log filter for the chosen verbosity. `RUST_LOG` overrides it.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "info,sqlx=warn",
            1 => "debug,agentmint=debug",
            _ => "trace",
        }
    }
}
