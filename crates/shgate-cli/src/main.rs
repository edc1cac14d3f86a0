//! shgate entry point.
//!
//! ```bash
//! cargo run -p shgate-cli -- --allow relative scripts/*.sh
//! ```

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<ExitCode> {
    // Initialize tracing (respects RUST_LOG env var); stdout is reserved for output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = shgate_cli::parse_args();
    let status = shgate_cli::run(&cli)?;
    Ok(ExitCode::from(status))
}
