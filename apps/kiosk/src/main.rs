//! # `resto` Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments (clap)
//! 2. Initialize tracing (stderr)
//! 3. Load config, open database, seed on first run
//! 4. Run the command; failures are reported as miette diagnostics

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use resto_kiosk::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    resto_kiosk::init_tracing();

    cli::run(cli).await.into_diagnostic()
}
