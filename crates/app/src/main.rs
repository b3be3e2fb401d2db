//! kvconform binary.

use std::process::ExitCode;

use clap::Parser;
use kvconform::cli::Cli;
use kvconform::{EXIT_STARTUP_ERROR, execute};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays parseable with --json.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!("kvconform v{}", env!("CARGO_PKG_VERSION"));

    match execute(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error:?}");
            ExitCode::from(EXIT_STARTUP_ERROR)
        }
    }
}
