//! Coarse/fine bias codec
//!
//! Bias words are sent to the chip through the `CHIP/CONTENT` register.
//! Layout (the kind tag in bits 30..=31 is zero for biases):
//!
//! ```text
//!  31 30 | 29 .. 23 | 22 ..... 16 | 15 | 14 .. 12 | 11 ..... 4 | 3  | 2  | 1   | 0
//!  kind  | reserved |   address   | -- |  coarse  |    fine    | en | sN | nrm | hi
//! ```
//!
//! [`parse`] ignores every bit outside these fields, so any readback decodes.

use crate::{
    error::{check_max, Result},
    word::{assert_disjoint, BitField, WordKind},
};

/// Largest bias address on a chip
pub const MAX_ADDRESS: u8 = 116;
/// Largest coarse value
pub const MAX_COARSE: u8 = 7;
/// Largest fine value
pub const MAX_FINE: u8 = u8::MAX;

const BIAS_HIGH: BitField = BitField::new(0, 1);
const TYPE_NORMAL: BitField = BitField::new(1, 1);
const SEX_N: BitField = BitField::new(2, 1);
const ENABLED: BitField = BitField::new(3, 1);
const FINE: BitField = BitField::new(4, 8);
const COARSE: BitField = BitField::new(12, 3);
const ADDRESS: BitField = BitField::new(16, 7);

const _: () = assert_disjoint(&[
    BIAS_HIGH,
    TYPE_NORMAL,
    SEX_N,
    ENABLED,
    FINE,
    COARSE,
    ADDRESS,
    crate::word::KIND,
]);

/// On-chip coarse/fine bias current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiasConfig {
    /// Address of the bias, see [`address_of`]
    pub address: u8,
    /// Coarse current, `[0, 7]`, big steps in output current
    pub coarse: u8,
    /// Fine current, `[0, 255]`, linear trim inside a coarse step
    pub fine: u8,
    /// Whether the bias is enabled
    pub enabled: bool,
    /// Bias sex: true for N type, false for P type
    pub sex_n: bool,
    /// Bias type: true for normal, false for cascode
    pub type_normal: bool,
    /// Current level: true for high, false for low
    pub bias_high: bool,
}

impl BiasConfig {
    /// Enabled, normal, high-current bias at `address`
    ///
    /// The sex defaults to N; use [`BiasConfig::named`] to derive it from
    /// the bias name.
    pub fn new(address: u8, coarse: u8, fine: u8) -> Self {
        Self {
            address,
            coarse,
            fine,
            enabled: true,
            sex_n: true,
            type_normal: true,
            bias_high: true,
        }
    }

    /// Bias looked up by name, sex taken from its `_N`/`_P` suffix
    pub fn named(name: &str, coarse: u8, fine: u8) -> Option<Self> {
        let address = address_of(name)?;
        Some(Self {
            sex_n: !(name.ends_with("_P") || name.ends_with("SSP")),
            ..Self::new(address, coarse, fine)
        })
    }

    /// Encode into a device word, see [`generate`]
    pub fn to_word(&self) -> Result<u32> {
        generate(self)
    }

    /// Name of the addressed bias, if the address is populated
    pub fn name(&self) -> Option<String> {
        name_of(self.address)
    }
}

/// Pack a bias into its device word
///
/// Fails when `address > 116` or `coarse > 7`; `fine` is bounded by its type.
pub fn generate(bias: &BiasConfig) -> Result<u32> {
    check_max("bias address", bias.address, MAX_ADDRESS)?;
    check_max("coarse", bias.coarse, MAX_COARSE)?;

    Ok(WordKind::Bias.tag()
        | BIAS_HIGH.place_flag(bias.bias_high)
        | TYPE_NORMAL.place_flag(bias.type_normal)
        | SEX_N.place_flag(bias.sex_n)
        | ENABLED.place_flag(bias.enabled)
        | FINE.place(bias.fine as u32)
        | COARSE.place(bias.coarse as u32)
        | ADDRESS.place(bias.address as u32))
}

/// Unpack any 32-bit word into a bias
///
/// Total: reserved bits are ignored, and the 7-bit address field may decode
/// to an address above [`MAX_ADDRESS`] if the word was not produced by
/// [`generate`].
pub fn parse(word: u32) -> BiasConfig {
    BiasConfig {
        address: ADDRESS.extract(word) as u8,
        coarse: COARSE.extract(word) as u8,
        fine: FINE.extract(word) as u8,
        enabled: ENABLED.flag(word),
        sex_n: SEX_N.flag(word),
        type_normal: TYPE_NORMAL.flag(word),
        bias_high: BIAS_HIGH.flag(word),
    }
}

/// Biases replicated in every core, in address order
pub const CORE_BIASES: [&str; 25] = [
    "PULSE_PWLK_P",
    "PS_WEIGHT_INH_S_N",
    "PS_WEIGHT_INH_F_N",
    "PS_WEIGHT_EXC_S_N",
    "PS_WEIGHT_EXC_F_N",
    "IF_RFR_N",
    "IF_TAU1_N",
    "IF_AHTAU_N",
    "IF_CASC_N",
    "IF_TAU2_N",
    "IF_BUF_P",
    "IF_AHTHR_N",
    "IF_THR_N",
    "NPDPIE_THR_S_P",
    "NPDPIE_THR_F_P",
    "NPDPII_THR_F_P",
    "NPDPII_THR_S_P",
    "IF_NMDA_N",
    "IF_DC_P",
    "IF_AHW_P",
    "NPDPII_TAU_S_P",
    "NPDPII_TAU_F_P",
    "NPDPIE_TAU_F_P",
    "NPDPIE_TAU_S_P",
    "R2R_P",
];

/// Address of the first bias of each core; per-core biases are two apart
const CORE_BASE: [u8; 4] = [0, 1, 64, 65];

/// Biases shared by the upper (U) and lower (D) core pairs
pub const SHARED_BIASES: [(&str, u8); 6] = [
    ("U_BUFFER", 50),
    ("U_SSP", 51),
    ("U_SSN", 52),
    ("D_BUFFER", 114),
    ("D_SSP", 115),
    ("D_SSN", 116),
];

/// Address of the bias called `name`, e.g. `C2_IF_THR_N` or `U_SSP`
pub fn address_of(name: &str) -> Option<u8> {
    if let Some(&(_, address)) = SHARED_BIASES.iter().find(|(shared, _)| *shared == name) {
        return Some(address);
    }

    let rest = name.strip_prefix('C')?;
    let (core, suffix) = rest.split_once('_')?;
    let core: usize = core.parse().ok()?;
    let base = *CORE_BASE.get(core)?;
    let index = CORE_BIASES.iter().position(|bias| *bias == suffix)?;
    Some(base + 2 * index as u8)
}

/// Name of the bias at `address`, `None` for unpopulated addresses
pub fn name_of(address: u8) -> Option<String> {
    if let Some(&(name, _)) = SHARED_BIASES.iter().find(|(_, shared)| *shared == address) {
        return Some(name.to_string());
    }

    let core = match (address >= 64, address & 0x01 != 0) {
        (false, false) => 0,
        (false, true) => 1,
        (true, false) => 2,
        (true, true) => 3,
    };
    let index = ((address - CORE_BASE[core]) / 2) as usize;
    CORE_BIASES
        .get(index)
        .map(|suffix| format!("C{}_{}", core, suffix))
}

/// Every named bias with its address, in ascending address order
pub fn all_biases() -> Vec<(String, u8)> {
    (0..=MAX_ADDRESS)
        .filter_map(|address| name_of(address).map(|name| (name, address)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BiasConfig {
        BiasConfig {
            address: 24,
            coarse: 5,
            fine: 200,
            enabled: true,
            sex_n: true,
            type_normal: false,
            bias_high: true,
        }
    }

    #[test]
    fn test_generate_layout() {
        let word = generate(&sample()).unwrap();
        assert_eq!(word, (24 << 16) | (5 << 12) | (200 << 4) | 0b1101);
        assert_eq!(WordKind::of(word), Some(WordKind::Bias));
    }

    #[test]
    fn test_parse_inverts_generate() {
        let bias = sample();
        assert_eq!(parse(generate(&bias).unwrap()), bias);

        let word = generate(&bias).unwrap();
        assert_eq!(generate(&parse(word)).unwrap(), word);
    }

    #[test]
    fn test_generate_bounds() {
        let mut bias = sample();
        bias.coarse = 7;
        assert!(generate(&bias).is_ok());
        bias.coarse = 8;
        assert!(generate(&bias).unwrap_err().is_range_error());

        let mut bias = sample();
        bias.address = 116;
        assert!(generate(&bias).is_ok());
        bias.address = 117;
        assert!(generate(&bias).unwrap_err().is_range_error());

        let mut bias = sample();
        bias.fine = 255;
        assert_eq!(parse(generate(&bias).unwrap()).fine, 255);
    }

    #[test]
    fn test_parse_is_total() {
        let bias = parse(u32::MAX);
        assert_eq!(bias.address, 127);
        assert_eq!(bias.coarse, 7);
        assert_eq!(bias.fine, 255);
        assert!(bias.enabled && bias.sex_n && bias.type_normal && bias.bias_high);

        // reserved bits do not leak into fields
        assert_eq!(parse(0xFF80_8000), parse(0));
    }

    #[test]
    fn test_bias_names() {
        assert_eq!(address_of("C0_PULSE_PWLK_P"), Some(0));
        assert_eq!(address_of("C1_PULSE_PWLK_P"), Some(1));
        assert_eq!(address_of("C0_IF_THR_N"), Some(24));
        assert_eq!(address_of("C1_R2R_P"), Some(49));
        assert_eq!(address_of("C2_PULSE_PWLK_P"), Some(64));
        assert_eq!(address_of("C3_R2R_P"), Some(113));
        assert_eq!(address_of("U_SSN"), Some(52));
        assert_eq!(address_of("D_SSN"), Some(116));
        assert_eq!(address_of("C4_IF_THR_N"), None);
        assert_eq!(address_of("C0_NOT_A_BIAS"), None);

        assert_eq!(name_of(90).as_deref(), Some("C2_NPDPIE_THR_S_P"));
        assert_eq!(name_of(115).as_deref(), Some("D_SSP"));
        assert_eq!(name_of(53), None);
        assert_eq!(name_of(63), None);
    }

    #[test]
    fn test_name_table_round_trip() {
        let biases = all_biases();
        assert_eq!(biases.len(), 4 * CORE_BIASES.len() + SHARED_BIASES.len());
        for (name, address) in biases {
            assert_eq!(address_of(&name), Some(address), "{}", name);
        }
    }

    #[test]
    fn test_named_bias_sex() {
        let bias = BiasConfig::named("C0_IF_DC_P", 7, 0).unwrap();
        assert_eq!(bias.address, 36);
        assert!(!bias.sex_n);

        let bias = BiasConfig::named("C0_IF_THR_N", 3, 80).unwrap();
        assert!(bias.sex_n);
        assert_eq!(bias.name().as_deref(), Some("C0_IF_THR_N"));

        assert!(!BiasConfig::named("U_SSP", 0, 0).unwrap().sex_n);
        assert!(BiasConfig::named("nope", 0, 0).is_none());
    }
}
