//! SRAM burst planning command

use clap::Args;
use serde::Serialize;
use tracing::info;

use dynapse_codec::{write_sram_burst, ConfigWrite};

use super::{hex, parse_u16, parse_u32, Context};
use crate::error::CliResult;

/// Plan a burst write into the FPGA SRAM
#[derive(Args, Debug)]
pub struct BurstCommand {
    /// Address of the first word
    #[arg(long, value_parser = parse_u32)]
    pub base: u32,

    /// SRAM capacity in words (default: from configuration)
    #[arg(long, value_parser = parse_u32)]
    pub capacity: Option<u32>,

    /// 16-bit words in transmission order
    #[arg(value_parser = parse_u16)]
    pub words: Vec<u16>,
}

#[derive(Serialize)]
struct Plan {
    base_address: u32,
    end_address: u32,
    writes: Vec<ConfigWrite>,
}

impl BurstCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let capacity = self.capacity.unwrap_or(ctx.config.codec.sram_words);
        let burst = write_sram_burst(self.base, &self.words, capacity)?;
        let writes = burst.to_config_writes();
        info!(
            "burst of {} words at {} -> {} register writes",
            burst.len(),
            hex(burst.base_address),
            writes.len()
        );

        let plan = Plan {
            base_address: burst.base_address,
            end_address: burst.end_address(),
            writes,
        };
        ctx.emit(&plan, || {
            plan.writes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
}
