//! # Ordo - Ordered Task List
//!
//! The main binary for Ordo.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based)
//! - CLI interface for item operations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/ordo (THE BINARY)            │
//! │                                              │
//! │   ┌─────────────┐        ┌─────────────┐     │
//! │   │    CLI      │        │   HTTP API  │     │
//! │   │  (clap)     │        │   (axum)    │     │
//! │   └──────┬──────┘        └──────┬──────┘     │
//! │          └───────────┬──────────┘            │
//! │                      ▼                       │
//! │              ┌───────────────┐               │
//! │              │   ordo-core   │               │
//! │              │  (THE LOGIC)  │               │
//! │              └───────────────┘               │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! ordo server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! ordo add Buy milk
//! ordo done 1
//! ordo move 2 0
//! ordo archive 1 --yes
//! ```

use clap::Parser;
use ordo::cli;
use ordo::config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Tracing is not up yet, so config errors go straight to stderr.
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format, cli.verbose);

    if cli.is_server() && !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(format: LogFormat, verbose: bool) {
    let default_filter = if verbose {
        "ordo=debug,ordo_core=debug,tower_http=debug"
    } else {
        "ordo=info,ordo_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the Ordo startup banner.
fn print_banner() {
    println!(
        r#"
   ___  ____  ____   ___
  / _ \|  _ \|  _ \ / _ \
 | | | | |_) | | | | | | |
 | |_| |  _ <| |_| | |_| |
  \___/|_| \_\____/ \___/

  Ordered Task List v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
