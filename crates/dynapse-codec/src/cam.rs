//! CAM (synapse table) word encoder
//!
//! Each neuron owns 64 CAM cells; a cell admits spikes from one input
//! neuron with one of four synaptic weight classes. The chip cannot read
//! CAM contents back, so there is no decoder.
//!
//! ```text
//!  31 30 | 29 28 | 27 26   | 25 ....... 16 | 15 ..... 10 | 9 ......... 0
//!  kind  |  --   | synapse |  input neuron |   cam slot  | target neuron
//! ```

use core::{fmt, str::FromStr};

use crate::{
    error::{CodecError, Result},
    ids::{CamSlot, NeuronId},
    word::{assert_disjoint, BitField, WordKind},
};

pub(crate) const TARGET: BitField = BitField::new(0, 10);
pub(crate) const SLOT: BitField = BitField::new(10, 6);
pub(crate) const INPUT: BitField = BitField::new(16, 10);
pub(crate) const SYNAPSE: BitField = BitField::new(26, 2);

const _: () = assert_disjoint(&[TARGET, SLOT, INPUT, SYNAPSE, crate::word::KIND]);

/// Synaptic weight class of a CAM cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SynapseType {
    /// Slow inhibitory synapse
    #[cfg_attr(feature = "serde", serde(rename = "s_inh"))]
    SlowInhibitory = 0,
    /// Fast inhibitory synapse
    #[cfg_attr(feature = "serde", serde(rename = "f_inh"))]
    FastInhibitory = 1,
    /// Slow excitatory synapse
    #[cfg_attr(feature = "serde", serde(rename = "s_exc"))]
    SlowExcitatory = 2,
    /// Fast excitatory synapse
    #[cfg_attr(feature = "serde", serde(rename = "f_exc"))]
    FastExcitatory = 3,
}

impl SynapseType {
    /// All four types in code order
    pub const ALL: [Self; 4] = [
        Self::SlowInhibitory,
        Self::FastInhibitory,
        Self::SlowExcitatory,
        Self::FastExcitatory,
    ];

    /// Wire code of this type
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Type for a wire code
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| CodecError::invalid_value("synapse type", code, "0, 1, 2 or 3"))
    }

    /// Short name as used in configuration files
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::SlowInhibitory => "s_inh",
            Self::FastInhibitory => "f_inh",
            Self::SlowExcitatory => "s_exc",
            Self::FastExcitatory => "f_exc",
        }
    }
}

impl fmt::Display for SynapseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for SynapseType {
    type Err = CodecError;

    /// Accepts the short name (`f_exc`, `f-exc`, any case) or the numeric code
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code);
        }
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.short_name() == normalized)
            .ok_or_else(|| {
                CodecError::unknown_name("synapse type", s, "s_inh, f_inh, s_exc or f_exc")
            })
    }
}

/// One CAM cell assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CamEntry {
    /// Neuron whose spikes are admitted
    pub input: NeuronId,
    /// Neuron whose CAM is programmed
    pub target: NeuronId,
    /// CAM cell of the target neuron
    pub slot: CamSlot,
    /// Weight class applied to admitted spikes
    pub synapse: SynapseType,
}

impl CamEntry {
    /// Create a checked entry from raw values
    pub fn new(input: u16, target: u16, slot: u8, synapse: u8) -> Result<Self> {
        Ok(Self {
            input: NeuronId::new(input)?,
            target: NeuronId::new(target)?,
            slot: CamSlot::new(slot)?,
            synapse: SynapseType::from_code(synapse)?,
        })
    }

    /// Device word for this entry
    pub fn encode(&self) -> u32 {
        WordKind::Cam.tag()
            | TARGET.place(self.target.raw() as u32)
            | SLOT.place(self.slot.raw() as u32)
            | INPUT.place(self.input.raw() as u32)
            | SYNAPSE.place(self.synapse.code() as u32)
    }
}

/// Encode a CAM write admitting `input` into `target`'s cell `slot`
pub fn encode_cam(input: u16, target: u16, slot: u8, synapse: u8) -> Result<u32> {
    Ok(CamEntry::new(input, target, slot, synapse)?.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(word: u32) -> (u16, u16, u8, u8) {
        (
            INPUT.extract(word) as u16,
            TARGET.extract(word) as u16,
            SLOT.extract(word) as u8,
            SYNAPSE.extract(word) as u8,
        )
    }

    #[test]
    fn test_encode_scenario() {
        let word = encode_cam(10, 20, 0, SynapseType::FastExcitatory.code()).unwrap();
        assert_eq!(decode(word), (10, 20, 0, 3));
        assert_eq!(WordKind::of(word), Some(WordKind::Cam));
    }

    #[test]
    fn test_encode_layout() {
        let word = encode_cam(1023, 1023, 63, 3).unwrap();
        assert_eq!(word, 0x4FFF_FFFF);
        let word = encode_cam(0, 0, 0, 0).unwrap();
        assert_eq!(word, 0x4000_0000);
    }

    #[test]
    fn test_bounds() {
        assert!(encode_cam(0, 0, 63, 0).is_ok());
        assert!(encode_cam(0, 0, 64, 0).unwrap_err().is_range_error());
        assert!(encode_cam(1023, 0, 0, 0).is_ok());
        assert!(encode_cam(1024, 0, 0, 0).unwrap_err().is_range_error());
        assert!(encode_cam(0, 1024, 0, 0).unwrap_err().is_range_error());
        assert!(encode_cam(0, 0, 0, 4).unwrap_err().is_range_error());
    }

    #[test]
    fn test_encode_is_idempotent() {
        let entry = CamEntry::new(700, 3, 17, 1).unwrap();
        assert_eq!(entry.encode(), entry.encode());
        assert_eq!(entry.encode(), encode_cam(700, 3, 17, 1).unwrap());
    }

    #[test]
    fn test_fields_do_not_interfere() {
        for synapse in SynapseType::ALL {
            let word = encode_cam(0x2AA, 0x155, 0x2A, synapse.code()).unwrap();
            assert_eq!(decode(word), (0x2AA, 0x155, 0x2A, synapse.code()));
        }
    }

    #[test]
    fn test_synapse_type_parsing() {
        assert_eq!("f_exc".parse::<SynapseType>().unwrap(), SynapseType::FastExcitatory);
        assert_eq!("S-INH".parse::<SynapseType>().unwrap(), SynapseType::SlowInhibitory);
        assert_eq!("2".parse::<SynapseType>().unwrap(), SynapseType::SlowExcitatory);
        assert!("7".parse::<SynapseType>().unwrap_err().is_range_error());
        assert!("medium".parse::<SynapseType>().unwrap_err().is_range_error());
        assert_eq!(format!("{}", SynapseType::FastInhibitory), "f_inh");
    }
}
