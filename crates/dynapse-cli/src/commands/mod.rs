//! CLI command implementations for dynapse

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::{
    config::{CliConfig, OutputFormat},
    error::CliResult,
};

pub mod address;
pub mod bias;
pub mod burst;
pub mod cam;
pub mod compile;
pub mod init;
pub mod rate;
pub mod registers;
pub mod sram;

/// dynapse - configuration codec for Dynap-se neuromorphic chips
#[derive(Parser, Debug)]
#[command(
    name = "dynapse",
    version,
    about = "Configuration codec for Dynap-se neuromorphic chips",
    long_about = "Encode and decode the 32-bit bias, CAM and SRAM words of Dynap-se chips, \
                  map neuron and pixel addresses, quantize poisson rates, and compile whole \
                  chip programs into the ordered register writes that apply them."
)]
pub struct DynapseCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DYNAPSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode, decode and list coarse/fine biases
    Bias(bias::BiasCommand),

    /// Encode a CAM (synapse) word
    Cam(cam::CamCommand),

    /// Encode an SRAM (routing) word
    Sram(sram::SramCommand),

    /// Plan a burst write into the FPGA SRAM
    Burst(burst::BurstCommand),

    /// Compose or decompose chip neuron addresses
    Neuron(address::NeuronCommand),

    /// Map between spike sources and board pixels
    Pixel(address::PixelCommand),

    /// Quantize poisson rates
    Rate(rate::RateCommand),

    /// Compile a chip program into register writes
    Compile(compile::CompileCommand),

    /// List configuration modules and parameters
    Registers(registers::RegistersCommand),

    /// Write a default configuration file
    Init(init::InitCommand),
}

/// State shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: CliConfig,
    /// Effective output format
    pub format: OutputFormat,
    /// Configuration file given on the command line
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Print `value` as JSON, or `text()` in text mode
    pub fn emit<T, F>(&self, value: &T, text: F) -> CliResult<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => println!("{}", text()),
        }
        Ok(())
    }
}

impl DynapseCli {
    /// Configuration for this invocation; `init` always starts from defaults
    pub fn load_config(&self) -> CliResult<CliConfig> {
        match self.command {
            Commands::Init(_) => Ok(CliConfig::default()),
            _ => CliConfig::load(self.config.as_deref()),
        }
    }

    /// Execute the CLI command
    pub fn execute(self, config: CliConfig) -> CliResult<()> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            config.output_format
        };
        let ctx = Context {
            config,
            format,
            config_path: self.config,
        };

        match self.command {
            Commands::Bias(cmd) => cmd.execute(&ctx),
            Commands::Cam(cmd) => cmd.execute(&ctx),
            Commands::Sram(cmd) => cmd.execute(&ctx),
            Commands::Burst(cmd) => cmd.execute(&ctx),
            Commands::Neuron(cmd) => cmd.execute(&ctx),
            Commands::Pixel(cmd) => cmd.execute(&ctx),
            Commands::Rate(cmd) => cmd.execute(&ctx),
            Commands::Compile(cmd) => cmd.execute(&ctx),
            Commands::Registers(cmd) => cmd.execute(&ctx),
            Commands::Init(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Parse an unsigned integer given in decimal, `0x` hex or `0b` binary
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let s = s.trim().replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("'{}' is not a 32-bit unsigned integer: {}", s, e))
}

/// [`parse_u32`] narrowed to 16 bits
pub fn parse_u16(s: &str) -> Result<u16, String> {
    let value = parse_u32(s)?;
    u16::try_from(value).map_err(|_| format!("{} does not fit in 16 bits", value))
}

/// [`parse_u32`] narrowed to 8 bits
pub fn parse_u8(s: &str) -> Result<u8, String> {
    let value = parse_u32(s)?;
    u8::try_from(value).map_err(|_| format!("{} does not fit in 8 bits", value))
}

/// Word rendered the way every command prints it
pub fn hex(word: u32) -> String {
    format!("0x{:08X}", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_u32("42"), Ok(42));
        assert_eq!(parse_u32("0x4000_0000"), Ok(0x4000_0000));
        assert_eq!(parse_u32("0b1010"), Ok(10));
        assert!(parse_u32("0x1_0000_0000").is_err());
        assert!(parse_u32("twelve").is_err());

        assert_eq!(parse_u16("0xFFFF"), Ok(0xFFFF));
        assert!(parse_u16("65536").is_err());
        assert_eq!(parse_u8("0b1111"), Ok(15));
        assert!(parse_u8("256").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        DynapseCli::command().debug_assert();
    }
}
