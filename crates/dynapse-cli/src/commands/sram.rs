//! SRAM word command, linear or core-relative addressing

use clap::Args;
use serde::Serialize;

use dynapse_codec::{encode_sram, encode_sram_core_relative, DirectionX, DirectionY};

use super::{hex, parse_u8, Context};
use crate::error::{CliError, CliResult};

/// Encode an SRAM word
#[derive(Args, Debug)]
pub struct SramCommand {
    /// Source neuron, chip global [0, 1023]
    #[arg(long, conflicts_with_all = ["core", "core_neuron"], required_unless_present = "core")]
    pub neuron: Option<u16>,

    /// Source core, with --core-neuron
    #[arg(long, requires = "core_neuron")]
    pub core: Option<u8>,

    /// Source neuron within --core [0, 255]
    #[arg(long, requires = "core")]
    pub core_neuron: Option<u8>,

    /// SRAM cell of the source neuron [0, 3]
    #[arg(long, default_value_t = 0)]
    pub slot: u8,

    /// Core id the spikes carry on arrival [0, 3]
    #[arg(long, default_value_t = 0)]
    pub virtual_core: u8,

    /// Horizontal direction: east, west, 0 or 1
    #[arg(long, default_value = "east")]
    pub dir_x: DirectionX,

    /// Horizontal chip hops [0, 3]
    #[arg(long, default_value_t = 0)]
    pub delta_x: u8,

    /// Vertical direction: north, south, 0 or 1
    #[arg(long, default_value = "north")]
    pub dir_y: DirectionY,

    /// Vertical chip hops [0, 3]
    #[arg(long, default_value_t = 0)]
    pub delta_y: u8,

    /// Destination core mask, e.g. 15 or 0b0101
    #[arg(long, value_parser = parse_u8)]
    pub cores: u8,
}

#[derive(Serialize)]
struct Encoded {
    word: u32,
    hex: String,
}

impl SramCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let word = match (self.neuron, self.core, self.core_neuron) {
            (Some(neuron), _, _) => encode_sram(
                neuron,
                self.slot,
                self.virtual_core,
                self.dir_x,
                self.delta_x,
                self.dir_y,
                self.delta_y,
                self.cores,
            )?,
            (None, Some(core), Some(core_neuron)) => encode_sram_core_relative(
                core,
                core_neuron,
                self.slot,
                self.virtual_core,
                self.dir_x,
                self.delta_x,
                self.dir_y,
                self.delta_y,
                self.cores,
            )?,
            _ => {
                return Err(CliError::invalid_args(
                    "give either --neuron or both --core and --core-neuron",
                ))
            }
        };

        ctx.emit(&Encoded { word, hex: hex(word) }, || hex(word))
    }
}
