//! # dynapse - Dynap-se configuration codec on the command line
//!
//! Results are printed to stdout, logs go to stderr.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dynapse_cli::DynapseCli;

fn main() {
    let cli = DynapseCli::parse();
    let config = cli.load_config();

    // RUST_LOG wins, then --verbose, then the configured level
    let default_level = match &config {
        _ if cli.verbose => "debug".to_string(),
        Ok(config) => config.log_level.clone(),
        Err(_) => "info".to_string(),
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = config.and_then(|config| cli.execute(config)) {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }
}
