//! Bias word commands: generate, parse, list

use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};

use dynapse_codec::{bias, generate_bias, parse_bias, BiasConfig};

use super::{hex, parse_u32, Context};
use crate::error::{CliError, CliResult};

/// Bias word commands
#[derive(Args, Debug)]
pub struct BiasCommand {
    #[command(subcommand)]
    pub sub: BiasSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BiasSubcommand {
    /// Encode a bias into its device word
    Generate(BiasGenerate),
    /// Decode any 32-bit word as a bias
    Parse(BiasParse),
    /// List every named bias with its address
    List,
}

/// Encode a bias
#[derive(Args, Debug)]
pub struct BiasGenerate {
    /// Bias name, e.g. C0_IF_THR_N
    #[arg(long, conflicts_with = "address", required_unless_present = "address")]
    pub name: Option<String>,

    /// Raw bias address instead of a name
    #[arg(long)]
    pub address: Option<u8>,

    /// Coarse value [0, 7]
    #[arg(long)]
    pub coarse: u8,

    /// Fine value [0, 255]
    #[arg(long)]
    pub fine: u8,

    /// Disable the bias
    #[arg(long)]
    pub disabled: bool,

    /// P-type bias (default: from the name suffix, N for raw addresses)
    #[arg(long, conflicts_with = "n_type")]
    pub p_type: bool,

    /// N-type bias
    #[arg(long)]
    pub n_type: bool,

    /// Cascode instead of normal type
    #[arg(long)]
    pub cascode: bool,

    /// Low instead of high current level
    #[arg(long)]
    pub low: bool,
}

/// Decode a bias word
#[derive(Args, Debug)]
pub struct BiasParse {
    /// Word in decimal, 0x hex or 0b binary
    #[arg(value_parser = parse_u32)]
    pub word: u32,
}

#[derive(Serialize)]
struct Encoded<'a> {
    word: u32,
    hex: String,
    name: Option<String>,
    bias: &'a BiasConfig,
}

impl BiasCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        match self.sub {
            BiasSubcommand::Generate(cmd) => cmd.execute(ctx),
            BiasSubcommand::Parse(cmd) => cmd.execute(ctx),
            BiasSubcommand::List => list(ctx),
        }
    }
}

impl BiasGenerate {
    fn to_bias(&self) -> CliResult<BiasConfig> {
        let mut bias = match (&self.name, self.address) {
            (Some(name), _) => BiasConfig::named(name, self.coarse, self.fine)
                .ok_or_else(|| CliError::invalid_args(format!("unknown bias '{}'", name)))?,
            (None, Some(address)) => BiasConfig::new(address, self.coarse, self.fine),
            (None, None) => return Err(CliError::invalid_args("either --name or --address is required")),
        };

        bias.enabled = !self.disabled;
        bias.type_normal = !self.cascode;
        bias.bias_high = !self.low;
        if self.p_type {
            bias.sex_n = false;
        } else if self.n_type {
            bias.sex_n = true;
        }
        Ok(bias)
    }

    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let bias = self.to_bias()?;
        let word = generate_bias(&bias)?;
        debug!("generated bias {:?} -> {}", bias, hex(word));

        let name = bias.name();
        ctx.emit(
            &Encoded {
                word,
                hex: hex(word),
                name,
                bias: &bias,
            },
            || hex(word),
        )
    }
}

impl BiasParse {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let bias = parse_bias(self.word);
        let name = bias.name();
        if name.is_none() {
            warn!("address {} does not name a bias", bias.address);
        }

        ctx.emit(
            &Encoded {
                word: self.word,
                hex: hex(self.word),
                name: name.clone(),
                bias: &bias,
            },
            || {
                format!(
                    "address: {} ({})\ncoarse: {}\nfine: {}\nenabled: {}\nsex: {}\ntype: {}\nlevel: {}",
                    bias.address,
                    name.as_deref().unwrap_or("unnamed"),
                    bias.coarse,
                    bias.fine,
                    bias.enabled,
                    if bias.sex_n { "N" } else { "P" },
                    if bias.type_normal { "normal" } else { "cascode" },
                    if bias.bias_high { "high" } else { "low" },
                )
            },
        )
    }
}

#[derive(Serialize)]
struct NamedBias {
    name: String,
    address: u8,
}

fn list(ctx: &Context) -> CliResult<()> {
    let biases: Vec<NamedBias> = bias::all_biases()
        .into_iter()
        .map(|(name, address)| NamedBias { name, address })
        .collect();

    ctx.emit(&biases, || {
        biases
            .iter()
            .map(|b| format!("{:>3}  {}", b.address, b.name))
            .collect::<Vec<_>>()
            .join("\n")
    })
}
