//! CAM word command

use clap::Args;
use serde::Serialize;

use dynapse_codec::{CamEntry, SynapseType};

use super::{hex, Context};
use crate::error::CliResult;

/// Encode a CAM word
#[derive(Args, Debug)]
pub struct CamCommand {
    /// Neuron whose spikes are admitted [0, 1023]
    #[arg(long)]
    pub input: u16,

    /// Neuron whose CAM is programmed [0, 1023]
    #[arg(long)]
    pub target: u16,

    /// CAM cell of the target neuron [0, 63]
    #[arg(long)]
    pub slot: u8,

    /// Synapse type: s_inh, f_inh, s_exc, f_exc or 0..3
    #[arg(long)]
    pub synapse: SynapseType,
}

#[derive(Serialize)]
struct Encoded {
    word: u32,
    hex: String,
    entry: CamEntry,
}

impl CamCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let entry = CamEntry::new(self.input, self.target, self.slot, self.synapse.code())?;
        let word = entry.encode();

        ctx.emit(
            &Encoded {
                word,
                hex: hex(word),
                entry,
            },
            || hex(word),
        )
    }
}
