//! Poisson rate quantization command

use clap::Args;
use serde::Serialize;
use tracing::debug;

use dynapse_codec::{write_rate, ConfigWrite, RateTable};

use super::Context;
use crate::error::CliResult;

/// Quantize requested rates to the generator's ladder
#[derive(Args, Debug)]
pub struct RateCommand {
    /// Requested rates in Hz
    #[arg(required = true, allow_negative_numbers = true)]
    pub hz: Vec<f32>,

    /// Also emit the register writes setting the rate for this source
    #[arg(long)]
    pub neuron: Option<u16>,
}

#[derive(Serialize)]
struct Quantized {
    requested_hz: f32,
    index: usize,
    achieved_hz: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    writes: Vec<ConfigWrite>,
}

impl RateCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let table = RateTable::from_config(&ctx.config.codec.poisson)?;
        debug!(
            "rate table: {} levels, {} Hz resolution",
            table.len(),
            ctx.config.codec.poisson.resolution_hz()
        );

        let mut results = Vec::with_capacity(self.hz.len());
        for &requested_hz in &self.hz {
            let code = table.quantize(requested_hz);
            let writes = match self.neuron {
                Some(neuron) => write_rate(neuron, code.index)?.to_vec(),
                None => Vec::new(),
            };
            results.push(Quantized {
                requested_hz,
                index: code.index,
                achieved_hz: code.achieved_hz,
                writes,
            });
        }

        ctx.emit(&results, || {
            let mut lines = Vec::new();
            for q in &results {
                lines.push(format!(
                    "{} Hz -> level {} ({} Hz)",
                    q.requested_hz, q.index, q.achieved_hz
                ));
                lines.extend(q.writes.iter().map(|w| format!("  {}", w)));
            }
            lines.join("\n")
        })
    }
}
