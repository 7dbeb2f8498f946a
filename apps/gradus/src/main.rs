//! # Gradus - Learner Progress Server
//!
//! The main binary for the Gradus progress/credentialing ledger.
//!
//! This application provides:
//! - HTTP REST admin API (axum-based)
//! - CLI interface for ledger operations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/gradus (THE BINARY)              │
//! │                                                      │
//! │      ┌─────────────┐        ┌─────────────┐          │
//! │      │   CLI       │        │  HTTP API   │          │
//! │      │  (clap)     │        │  (axum)     │          │
//! │      └──────┬──────┘        └──────┬──────┘          │
//! │             │                      │                 │
//! │             └──────────┬───────────┘                 │
//! │                        ▼                             │
//! │                ┌───────────────┐                     │
//! │                │  gradus-core  │                     │
//! │                │ (THE LEDGER)  │                     │
//! │                └───────────────┘                     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! gradus serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! gradus status --learner ada
//! gradus earn --learner ada --stage creation
//! gradus graduate --learner ada --review "great cohort"
//! ```

use clap::Parser;
use gradus::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — GRADUS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRADUS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gradus=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Gradus startup banner.
fn print_banner() {
    println!(
        r#"
   ██████╗ ██████╗  █████╗ ██████╗ ██╗   ██╗███████╗
  ██╔════╝ ██╔══██╗██╔══██╗██╔══██╗██║   ██║██╔════╝
  ██║  ███╗██████╔╝███████║██║  ██║██║   ██║███████╗
  ██║   ██║██╔══██╗██╔══██║██║  ██║██║   ██║╚════██║
  ╚██████╔╝██║  ██║██║  ██║██████╔╝╚██████╔╝███████║
   ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝  ╚═════╝ ╚══════╝

  Learner Progress Server v{}

  Six Stages • One Gate • 180 Days
"#,
        env!("CARGO_PKG_VERSION")
    );
}
