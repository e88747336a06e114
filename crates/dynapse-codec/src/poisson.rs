//! Poisson generator rate quantization
//!
//! The generator only offers a fixed ladder of rates. [`quantize`] picks the
//! ladder entry closest to a requested rate and [`write_rate`] produces the
//! two register writes that commit it for one source.

use crate::{
    config::PoissonConfig,
    error::{check_max, CodecError, Result},
    ids::NeuronId,
    registers::{poisson, ConfigWrite},
};

/// A quantized rate: position in the table and the rate it stands for
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateCode {
    /// Index into the rate table, written to the generator
    pub index: usize,
    /// Rate the generator will actually produce, in Hz
    pub achieved_hz: f32,
}

/// Pick the entry of `table` nearest to `rate_hz`
///
/// The request is clamped into `[0, max(table)]` first; NaN counts as 0.
/// Ties go to the lower index. Fails for an empty table or one holding a
/// non-finite entry.
pub fn quantize(rate_hz: f32, table: &[f32]) -> Result<RateCode> {
    if let Some(bad) = table.iter().find(|hz| !hz.is_finite()) {
        return Err(CodecError::config(format!("rate table entry {} is not finite", bad)));
    }
    let max = table
        .iter()
        .copied()
        .fold(None, |acc: Option<f32>, hz| Some(acc.map_or(hz, |m| m.max(hz))))
        .ok_or_else(|| CodecError::config("rate table is empty"))?;

    let target = if rate_hz.is_nan() {
        0.0
    } else {
        rate_hz.max(0.0).min(max)
    };

    let mut best = RateCode {
        index: 0,
        achieved_hz: table[0],
    };
    let mut best_distance = (table[0] - target).abs();
    for (index, &hz) in table.iter().enumerate().skip(1) {
        let distance = (hz - target).abs();
        if distance < best_distance {
            best = RateCode {
                index,
                achieved_hz: hz,
            };
            best_distance = distance;
        }
    }
    Ok(best)
}

/// Register writes committing rate `index` for poisson source `neuron`
///
/// Data comes first: the generator latches the rate when the address is
/// written.
pub fn write_rate(neuron: u16, index: usize) -> Result<[ConfigWrite; 2]> {
    let neuron = NeuronId::new(neuron)?;
    check_max("rate index", index as u64, u16::MAX)?;

    Ok([
        ConfigWrite::new(poisson::MODULE, poisson::WRITE_DATA, index as u32),
        ConfigWrite::new(poisson::MODULE, poisson::WRITE_ADDRESS, neuron.raw() as u32),
    ])
}

/// A validated, strictly ascending table of representable rates
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    levels: Vec<f32>,
}

impl RateTable {
    /// Wrap a caller supplied table
    ///
    /// The table must be non-empty, finite and strictly ascending.
    pub fn new(levels: Vec<f32>) -> Result<Self> {
        if levels.is_empty() {
            return Err(CodecError::config("rate table is empty"));
        }
        if let Some(bad) = levels.iter().find(|hz| !hz.is_finite()) {
            return Err(CodecError::config(format!("rate table entry {} is not finite", bad)));
        }
        if let Some(pos) = levels.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(CodecError::config(format!(
                "rate table is not strictly ascending at index {}",
                pos + 1
            )));
        }
        Ok(Self { levels })
    }

    /// Ladder of rates offered by a generator with `config`
    pub fn from_config(config: &PoissonConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            levels: ladder(config),
        })
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; empty tables are rejected on construction
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The levels in ascending order
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    /// Highest level
    pub fn max_hz(&self) -> f32 {
        self.levels[self.levels.len() - 1]
    }

    /// Rate of level `index`
    pub fn get(&self, index: usize) -> Option<f32> {
        self.levels.get(index).copied()
    }

    /// Nearest level to `rate_hz`, see [`quantize`]
    pub fn quantize(&self, rate_hz: f32) -> RateCode {
        let target = if rate_hz.is_nan() {
            0.0
        } else {
            rate_hz.max(0.0).min(self.max_hz())
        };

        // first level >= target; the nearest is it or its predecessor
        let upper = self.levels.partition_point(|&hz| hz < target);
        let index = match upper {
            0 => 0,
            n if n == self.levels.len() => n - 1,
            n => {
                let below = target - self.levels[n - 1];
                let above = self.levels[n] - target;
                if above < below {
                    n
                } else {
                    n - 1
                }
            }
        };

        RateCode {
            index,
            achieved_hz: self.levels[index],
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            levels: ladder(&PoissonConfig::default()),
        }
    }
}

/// `k * resolution` for every k up to the configured maximum
///
/// `config` must have passed [`PoissonConfig::validate`], which bounds the
/// level count.
fn ladder(config: &PoissonConfig) -> Vec<f32> {
    let resolution = config.resolution_hz();
    let steps = config.top_level() as usize;
    (0..=steps).map(|k| (k as f64 * resolution) as f32).collect()
}
