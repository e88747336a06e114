//! Chip program compilation

use std::{fs, io::Write, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, ValueEnum};
use tracing::info;

use dynapse_codec::{apply, ChipProgram, ConfigWrite, RecordingTransport};

use super::Context;
use crate::error::CliResult;

/// Compile a chip program (TOML or JSON) into register writes
#[derive(Args, Debug)]
pub struct CompileCommand {
    /// Program file; `.json` is read as JSON, anything else as TOML
    pub program: PathBuf,

    /// Encoding of the compiled writes
    #[arg(long, default_value = "json")]
    pub format: WritesFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritesFormat {
    /// One `MODULE/PARAM = value` line per write
    Text,
    /// JSON array of `{module, param, value}`
    Json,
    /// bincode encoded `Vec<ConfigWrite>`
    Bincode,
}

/// Read a program, choosing the parser by file extension
pub fn load_program(path: &std::path::Path) -> CliResult<ChipProgram> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading program {}", path.display()))?;

    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}

/// Encode compiled writes in `format`
pub fn encode_writes(writes: &[ConfigWrite], format: WritesFormat) -> CliResult<Vec<u8>> {
    let bytes = match format {
        WritesFormat::Text => {
            let mut text = String::new();
            for write in writes {
                text.push_str(&write.to_string());
                text.push('\n');
            }
            text.into_bytes()
        }
        WritesFormat::Json => {
            let mut json = serde_json::to_vec_pretty(writes)?;
            json.push(b'\n');
            json
        }
        WritesFormat::Bincode => bincode::serialize(writes)?,
    };
    Ok(bytes)
}

impl CompileCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let program = load_program(&self.program)?;
        info!(
            "compiling {} for chip {} ({} entries)",
            self.program.display(),
            program.chip,
            program.len()
        );

        let writes = program.compile(&ctx.config.codec)?;

        // dry run to report what reaches the chip
        let mut transport = RecordingTransport::new();
        apply(&mut transport, &writes)?;
        info!(
            "{} register writes, {} chip words",
            transport.writes().len(),
            transport.chip_words().len()
        );

        let bytes = encode_writes(&writes, self.format)?;
        match &self.output {
            Some(path) => {
                fs::write(path, &bytes)?;
                info!("wrote {}", path.display());
            }
            None => std::io::stdout().write_all(&bytes)?,
        }
        Ok(())
    }
}
