//! Target board constants supplied by the caller

use crate::error::{CodecError, Result};

/// Configuration of the target board
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Capacity of the FPGA SRAM in 16-bit words
    pub sram_words: u32,
    /// Poisson spike generator parameters
    pub poisson: PoissonConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            sram_words: 1 << 20,
            poisson: PoissonConfig::default(),
        }
    }
}

impl CodecConfig {
    /// Reject configurations no board can have
    pub fn validate(&self) -> Result<()> {
        if self.sram_words == 0 {
            return Err(CodecError::config("sram_words must be positive"));
        }
        self.poisson.validate()
    }
}

/// Poisson spike generator parameters
///
/// The generator divides its clock among `sources` virtual neurons and
/// fires each with a 16-bit probability per slot, which fixes the rate
/// resolution at `clock_hz / sources / 65535`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoissonConfig {
    /// Generator clock in Hz
    pub clock_hz: f64,
    /// Number of virtual sources sharing the clock
    pub sources: u32,
    /// Highest rate the table offers, in Hz
    pub max_rate_hz: f32,
}

impl Default for PoissonConfig {
    fn default() -> Self {
        Self {
            clock_hz: 30e6,
            sources: 1024,
            max_rate_hz: 4300.0,
        }
    }
}

impl PoissonConfig {
    /// Rate step between two adjacent table levels, in Hz
    pub fn resolution_hz(&self) -> f64 {
        self.clock_hz / f64::from(self.sources) / f64::from(u16::MAX)
    }

    /// Index of the highest table level, `max_rate_hz / resolution_hz` rounded
    pub fn top_level(&self) -> f64 {
        (f64::from(self.max_rate_hz) / self.resolution_hz()).round()
    }

    /// Reject non-physical generator parameters
    ///
    /// The ladder must also fit the 16-bit rate register: at most 65536
    /// levels.
    pub fn validate(&self) -> Result<()> {
        if !(self.clock_hz.is_finite() && self.clock_hz > 0.0) {
            return Err(CodecError::config("poisson clock_hz must be positive"));
        }
        if self.sources == 0 {
            return Err(CodecError::config("poisson sources must be positive"));
        }
        if !(self.max_rate_hz.is_finite() && self.max_rate_hz >= 0.0) {
            return Err(CodecError::config("poisson max_rate_hz must be non-negative"));
        }
        let top = self.top_level();
        if !(top.is_finite() && top <= f64::from(u16::MAX)) {
            return Err(CodecError::config(format!(
                "poisson max_rate_hz {} at {} Hz resolution needs more levels than the 16-bit rate register holds",
                self.max_rate_hz,
                self.resolution_hz()
            )));
        }
        Ok(())
    }
}
