//! Whole-chip configuration programs
//!
//! A [`ChipProgram`] describes one chip's configuration in domain terms and
//! compiles to the ordered register writes that apply it:
//!
//! 1. select the chip;
//! 2. bias words, then CAM words, then SRAM words, through `CHIP/CONTENT`;
//! 3. if any rates are requested, the poisson target chip, then one
//!    data/address pair per source.

use log::debug;

use crate::{
    bias::BiasConfig,
    cam::CamEntry,
    config::CodecConfig,
    error::{CodecError, Result},
    ids::{ChipId, NeuronId},
    poisson::{write_rate, RateTable},
    registers::{poisson, ConfigWrite},
    sram::SramEntry,
};

/// A bias set by name
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiasSetting {
    /// Bias name, e.g. `C0_IF_THR_N`
    pub name: String,
    /// Coarse value, `[0, 7]`
    pub coarse: u8,
    /// Fine value, `[0, 255]`
    pub fine: u8,
    /// Defaults to enabled
    #[cfg_attr(feature = "serde", serde(default = "enabled"))]
    pub enabled: bool,
    /// Overrides the sex derived from the name suffix
    #[cfg_attr(feature = "serde", serde(default))]
    pub sex_n: Option<bool>,
    /// Defaults to normal
    #[cfg_attr(feature = "serde", serde(default = "enabled"))]
    pub type_normal: bool,
    /// Defaults to high
    #[cfg_attr(feature = "serde", serde(default = "enabled"))]
    pub bias_high: bool,
}

#[cfg(feature = "serde")]
fn enabled() -> bool {
    true
}

impl BiasSetting {
    /// Enabled, normal, high-current setting for the named bias
    pub fn new(name: impl Into<String>, coarse: u8, fine: u8) -> Self {
        Self {
            name: name.into(),
            coarse,
            fine,
            enabled: true,
            sex_n: None,
            type_normal: true,
            bias_high: true,
        }
    }

    /// Resolve the name and apply the flags
    pub fn to_bias(&self) -> Result<BiasConfig> {
        let named = BiasConfig::named(&self.name, self.coarse, self.fine)
            .ok_or_else(|| CodecError::config(format!("unknown bias '{}'", self.name)))?;
        Ok(BiasConfig {
            enabled: self.enabled,
            sex_n: self.sex_n.unwrap_or(named.sex_n),
            type_normal: self.type_normal,
            bias_high: self.bias_high,
            ..named
        })
    }
}

/// A poisson rate requested for one virtual source
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateRequest {
    /// Poisson source address
    pub neuron: NeuronId,
    /// Desired rate in Hz
    pub hz: f32,
}

/// Configuration of one chip in domain terms
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChipProgram {
    /// Chip the program targets
    pub chip: ChipId,
    /// Bias settings
    pub biases: Vec<BiasSetting>,
    /// CAM cells to program
    pub cams: Vec<CamEntry>,
    /// SRAM cells to program
    pub srams: Vec<SramEntry>,
    /// Poisson rates to set
    pub rates: Vec<RateRequest>,
}

impl ChipProgram {
    /// Empty program for `chip`
    pub fn new(chip: ChipId) -> Self {
        Self {
            chip,
            ..Self::default()
        }
    }

    /// Total number of chip words and rates in the program
    pub fn len(&self) -> usize {
        self.biases.len() + self.cams.len() + self.srams.len() + self.rates.len()
    }

    /// True if the program configures nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bias, CAM and SRAM words in transmission order
    pub fn chip_words(&self) -> Result<Vec<u32>> {
        let mut words = Vec::with_capacity(self.biases.len() + self.cams.len() + self.srams.len());
        for setting in &self.biases {
            words.push(setting.to_bias()?.to_word()?);
        }
        words.extend(self.cams.iter().map(CamEntry::encode));
        words.extend(self.srams.iter().map(SramEntry::encode));
        Ok(words)
    }

    /// Compile into the ordered register writes applying this program
    ///
    /// Fails atomically: either every entry encodes, or nothing is returned.
    pub fn compile(&self, config: &CodecConfig) -> Result<Vec<ConfigWrite>> {
        config.validate()?;

        let words = self.chip_words()?;
        let mut writes = Vec::with_capacity(words.len() + 2 * self.rates.len() + 2);
        writes.push(ConfigWrite::select_chip(self.chip));
        writes.extend(words.into_iter().map(ConfigWrite::chip_content));

        if !self.rates.is_empty() {
            let table = RateTable::from_config(&config.poisson)?;
            writes.push(ConfigWrite::new(
                poisson::MODULE,
                poisson::CHIP_ID,
                self.chip.raw() as u32,
            ));
            for request in &self.rates {
                let code = table.quantize(request.hz);
                debug!(
                    "{}: requested {} Hz, achieved {} Hz (level {})",
                    request.neuron, request.hz, code.achieved_hz, code.index
                );
                writes.extend(write_rate(request.neuron.raw(), code.index)?);
            }
        }

        debug!(
            "compiled program for chip {}: {} biases, {} cams, {} srams, {} rates -> {} writes",
            self.chip,
            self.biases.len(),
            self.cams.len(),
            self.srams.len(),
            self.rates.len(),
            writes.len()
        );
        Ok(writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        apply, encode_cam, generate_bias,
        registers::{chip_control, poisson},
        ConfigTransport, RecordingTransport,
    };

    #[cfg(feature = "serde")]
    const PROGRAM: &str = r#"
chip = 4

[[biases]]
name = "C0_IF_THR_N"
coarse = 3
fine = 80

[[biases]]
name = "C0_IF_DC_P"
coarse = 7
fine = 0
enabled = false

[[cams]]
input = 10
target = 20
slot = 0
synapse = "f_exc"

[[srams]]
neuron = 20
slot = 1
virtual_core = 0
dir_x = "west"
delta_x = 1
delta_y = 0
cores = 15

[[rates]]
neuron = 3
hz = 100.0
"#;

    #[test]
    #[cfg(feature = "serde")]
    fn test_parse_program() {
        let program: ChipProgram = toml::from_str(PROGRAM).unwrap();
        assert_eq!(program.chip, ChipId::U2);
        assert_eq!(program.biases.len(), 2);
        assert!(!program.biases[1].enabled);
        assert_eq!(program.cams[0], CamEntry::new(10, 20, 0, 3).unwrap());
        assert_eq!(program.srams[0].dir_x, crate::DirectionX::West);
        assert_eq!(program.len(), 5);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_compile_order() {
        let program: ChipProgram = toml::from_str(PROGRAM).unwrap();
        let writes = program.compile(&CodecConfig::default()).unwrap();

        assert_eq!(writes[0], ConfigWrite::select_chip(ChipId::U2));
        let threshold = BiasConfig::named("C0_IF_THR_N", 3, 80).unwrap();
        assert_eq!(writes[1], ConfigWrite::chip_content(generate_bias(&threshold).unwrap()));
        assert_eq!(writes[3], ConfigWrite::chip_content(encode_cam(10, 20, 0, 3).unwrap()));
        assert_eq!(writes[4], ConfigWrite::chip_content(program.srams[0].encode()));
        assert_eq!(writes[5], ConfigWrite::new(poisson::MODULE, poisson::CHIP_ID, 4));
        assert_eq!(writes[6].param, poisson::WRITE_DATA);
        assert_eq!(writes[7], ConfigWrite::new(poisson::MODULE, poisson::WRITE_ADDRESS, 3));
        assert_eq!(writes.len(), 8);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_disabled_bias_flags() {
        let program: ChipProgram = toml::from_str(PROGRAM).unwrap();
        let bias = program.biases[1].to_bias().unwrap();
        assert!(!bias.enabled);
        assert!(!bias.sex_n);
        assert!(bias.type_normal && bias.bias_high);
    }

    #[test]
    fn test_compile_is_atomic() {
        let mut program = ChipProgram::new(ChipId::U1);
        program.cams.push(CamEntry::new(1, 2, 3, 0).unwrap());
        program.biases.push(BiasSetting::new("C9_IF_THR_N", 0, 0));
        assert!(program
            .compile(&CodecConfig::default())
            .unwrap_err()
            .is_config_error());

        let mut program = ChipProgram::new(ChipId::U1);
        program.biases.push(BiasSetting::new("C0_IF_THR_N", 8, 0));
        assert!(program
            .compile(&CodecConfig::default())
            .unwrap_err()
            .is_range_error());
    }

    #[test]
    fn test_empty_program() {
        let program = ChipProgram::new(ChipId::U3);
        assert!(program.is_empty());
        let writes = program.compile(&CodecConfig::default()).unwrap();
        assert_eq!(writes, vec![ConfigWrite::select_chip(ChipId::U3)]);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_apply_compiled_program() {
        let program: ChipProgram = toml::from_str(PROGRAM).unwrap();
        let writes = program.compile(&CodecConfig::default()).unwrap();

        let mut transport = RecordingTransport::new();
        apply(&mut transport, &writes).unwrap();
        assert_eq!(transport.chip_words(), program.chip_words().unwrap());
        assert_eq!(transport.config_get(chip_control::MODULE, chip_control::ID).unwrap(), 4);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_rejects_invalid_ids() {
        let bad = "chip = 1\n";
        assert!(toml::from_str::<ChipProgram>(bad).is_err());
        let bad = "[[cams]]\ninput = 1024\ntarget = 0\nslot = 0\nsynapse = \"s_inh\"\n";
        assert!(toml::from_str::<ChipProgram>(bad).is_err());
    }
}
