//! Configuration initialization command

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::Context;
use crate::{
    config::CliConfig,
    error::{CliError, CliResult},
};

const HEADER: &str = "# dynapse CLI configuration
#
# log_level:      tracing filter used when RUST_LOG is unset
# output_format:  \"text\" or \"json\"
# codec.sram_words:           FPGA SRAM capacity in 16-bit words
# codec.poisson.clock_hz:     poisson generator clock
# codec.poisson.sources:      virtual sources sharing that clock
# codec.poisson.max_rate_hz:  highest rate offered by the rate table

";

/// Write a default configuration file
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Target path (default: --config, else the user config directory)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let path = match self.path.or_else(|| ctx.config_path.clone()) {
            Some(path) => path,
            None => CliConfig::default_config_path()?,
        };

        if path.exists() && !self.force {
            return Err(CliError::config(format!(
                "{} already exists, use --force to overwrite",
                path.display()
            )));
        }

        let body = toml::to_string_pretty(&CliConfig::default())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, format!("{}{}", HEADER, body))?;

        info!("Configuration written to {}", path.display());
        Ok(())
    }
}
