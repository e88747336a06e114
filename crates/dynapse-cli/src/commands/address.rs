//! Neuron and pixel address commands

use clap::{Args, Subcommand};
use serde::Serialize;

use dynapse_codec::{
    core_addr_to_neuron_id, core_xy_to_neuron_id, spike_event_to_xy, xy_to_spike_event,
    NeuronId,
};

use super::Context;
use crate::error::{CliError, CliResult};

/// Neuron address commands
#[derive(Args, Debug)]
pub struct NeuronCommand {
    #[command(subcommand)]
    pub sub: NeuronSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NeuronSubcommand {
    /// Chip global address from core and column/row or core-relative address
    Compose(NeuronCompose),
    /// Split a chip global address into its parts
    Decompose(NeuronDecompose),
}

/// Compose a chip global neuron address
#[derive(Args, Debug)]
pub struct NeuronCompose {
    /// Core [0, 3]
    #[arg(long)]
    pub core: u8,

    /// Column within the core [0, 15]
    #[arg(long, requires = "row", conflicts_with = "core_neuron")]
    pub column: Option<u8>,

    /// Row within the core [0, 15]
    #[arg(long, requires = "column")]
    pub row: Option<u8>,

    /// Neuron within the core [0, 255]
    #[arg(long, required_unless_present = "column")]
    pub core_neuron: Option<u8>,
}

/// Decompose a chip global neuron address
#[derive(Args, Debug)]
pub struct NeuronDecompose {
    /// Chip global neuron address [0, 1023]
    pub neuron: u16,
}

#[derive(Serialize)]
struct NeuronParts {
    neuron: u16,
    core: u8,
    core_neuron: u8,
    column: u8,
    row: u8,
}

impl From<NeuronId> for NeuronParts {
    fn from(neuron: NeuronId) -> Self {
        Self {
            neuron: neuron.raw(),
            core: neuron.core().raw(),
            core_neuron: neuron.core_relative(),
            column: neuron.column(),
            row: neuron.row(),
        }
    }
}

impl NeuronCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let neuron = match self.sub {
            NeuronSubcommand::Compose(cmd) => match (cmd.column, cmd.row, cmd.core_neuron) {
                (Some(column), Some(row), _) => core_xy_to_neuron_id(cmd.core, column, row)?,
                (_, _, Some(core_neuron)) => core_addr_to_neuron_id(cmd.core, core_neuron)?,
                _ => {
                    return Err(CliError::invalid_args(
                        "give --column and --row, or --core-neuron",
                    ))
                }
            },
            NeuronSubcommand::Decompose(cmd) => NeuronId::new(cmd.neuron)?,
        };

        let parts = NeuronParts::from(neuron);
        ctx.emit(&parts, || {
            format!(
                "neuron {} = core {} neuron {} (column {}, row {})",
                parts.neuron, parts.core, parts.core_neuron, parts.column, parts.row
            )
        })
    }
}

/// Pixel mapping commands
#[derive(Args, Debug)]
pub struct PixelCommand {
    #[command(subcommand)]
    pub sub: PixelSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PixelSubcommand {
    /// Board pixel of a spike source
    ToXy(PixelToXy),
    /// Spike source under a board pixel
    FromXy(PixelFromXy),
}

/// Board pixel of a spike source
#[derive(Args, Debug)]
pub struct PixelToXy {
    /// Chip id: 0, 4, 8 or 12
    #[arg(long)]
    pub chip: u8,

    /// Core [0, 3]
    #[arg(long)]
    pub core: u8,

    /// Neuron within the core [0, 255]
    #[arg(long)]
    pub neuron: u16,
}

/// Spike source under a board pixel
#[derive(Args, Debug)]
pub struct PixelFromXy {
    /// Column [0, 63]
    #[arg(long)]
    pub x: u16,

    /// Row [0, 63]
    #[arg(long)]
    pub y: u16,
}

impl PixelCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        match self.sub {
            PixelSubcommand::ToXy(cmd) => {
                let xy = spike_event_to_xy(cmd.chip, cmd.core, cmd.neuron)?;
                ctx.emit(&xy, || format!("x {} y {}", xy.x, xy.y))
            }
            PixelSubcommand::FromXy(cmd) => {
                let source = xy_to_spike_event(cmd.x, cmd.y)?;
                ctx.emit(&source, || {
                    format!(
                        "chip {} core {} neuron {}",
                        source.chip.raw(),
                        source.core.raw(),
                        source.neuron
                    )
                })
            }
        }
    }
}
