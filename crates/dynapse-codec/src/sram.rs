//! SRAM (spike destination) word encoder and burst writer
//!
//! Each neuron owns four SRAM cells. A cell routes the neuron's spikes a
//! number of chip hops along each board axis and delivers them, tagged with
//! a possibly spoofed virtual core, to every core in the destination mask.
//!
//! ```text
//!  31 30 | 29 .. 24 | 23 .. 20 | 19 18 | 17 | 16 15 | 14 | 13 12 | 11 10 | 9 ..... 0
//!  kind  | reserved |  cores   |  dy   | sy |  dx   | sx | vcore | slot  |  neuron
//! ```
//!
//! Like CAM, the chip's SRAM cannot be read back.
//!
//! The second half of this module plans bulk writes into the FPGA-side SRAM
//! (spike generator and kernel tables), which is a separate memory of 16-bit
//! words behind the `SRAM` configuration module.

use core::fmt;

use crate::{
    address::core_addr_to_neuron_id,
    error::{CodecError, Result},
    ids::{ChipHops, CoreId, CoreMask, NeuronId, SramSlot},
    registers::{self, ConfigWrite},
    word::{assert_disjoint, BitField, WordKind},
};

const NEURON: BitField = BitField::new(0, 10);
const SLOT: BitField = BitField::new(10, 2);
const VIRTUAL_CORE: BitField = BitField::new(12, 2);
const DIR_X: BitField = BitField::new(14, 1);
const DELTA_X: BitField = BitField::new(15, 2);
const DIR_Y: BitField = BitField::new(17, 1);
const DELTA_Y: BitField = BitField::new(18, 2);
const CORES: BitField = BitField::new(20, 4);

const _: () = assert_disjoint(&[
    NEURON,
    SLOT,
    VIRTUAL_CORE,
    DIR_X,
    DELTA_X,
    DIR_Y,
    DELTA_Y,
    CORES,
    crate::word::KIND,
]);

/// Horizontal routing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum DirectionX {
    /// Towards larger x
    #[default]
    East = 0,
    /// Towards smaller x
    West = 1,
}

/// Vertical routing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum DirectionY {
    /// Towards smaller y
    #[default]
    North = 0,
    /// Towards larger y
    South = 1,
}

macro_rules! direction_codes {
    ($name:ident, $zero:ident, $one:ident, $field:literal, $names:literal) => {
        impl $name {
            /// Wire code of this direction
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Direction for a wire code
            pub fn from_code(code: u8) -> Result<Self> {
                match code {
                    0 => Ok(Self::$zero),
                    1 => Ok(Self::$one),
                    _ => Err(CodecError::invalid_value($field, code, "0 or 1")),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    Self::$zero => f.write_str(stringify!($zero)),
                    Self::$one => f.write_str(stringify!($one)),
                }
            }
        }

        impl core::str::FromStr for $name {
            type Err = CodecError;

            fn from_str(s: &str) -> Result<Self> {
                if let Ok(code) = s.parse::<u8>() {
                    return Self::from_code(code);
                }
                if s.eq_ignore_ascii_case(stringify!($zero)) {
                    Ok(Self::$zero)
                } else if s.eq_ignore_ascii_case(stringify!($one)) {
                    Ok(Self::$one)
                } else {
                    Err(CodecError::unknown_name($field, s, $names))
                }
            }
        }
    };
}

direction_codes!(DirectionX, East, West, "x direction", "east or west");
direction_codes!(DirectionY, North, South, "y direction", "north or south");

/// One SRAM cell assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SramEntry {
    /// Neuron whose spikes are routed
    pub neuron: NeuronId,
    /// SRAM cell of the neuron
    pub slot: SramSlot,
    /// Core id the spikes carry on arrival
    pub virtual_core: CoreId,
    /// Horizontal direction
    #[cfg_attr(feature = "serde", serde(default))]
    pub dir_x: DirectionX,
    /// Horizontal chip hops
    pub delta_x: ChipHops,
    /// Vertical direction
    #[cfg_attr(feature = "serde", serde(default))]
    pub dir_y: DirectionY,
    /// Vertical chip hops
    pub delta_y: ChipHops,
    /// Destination cores on the target chip
    pub cores: CoreMask,
}

impl SramEntry {
    /// Device word for this entry
    pub fn encode(&self) -> u32 {
        WordKind::Sram.tag()
            | NEURON.place(self.neuron.raw() as u32)
            | SLOT.place(self.slot.raw() as u32)
            | VIRTUAL_CORE.place(self.virtual_core.raw() as u32)
            | DIR_X.place(self.dir_x.code() as u32)
            | DELTA_X.place(self.delta_x.raw() as u32)
            | DIR_Y.place(self.dir_y.code() as u32)
            | DELTA_Y.place(self.delta_y.raw() as u32)
            | CORES.place(self.cores.raw() as u32)
    }
}

/// Encode an SRAM write routing spikes of `neuron` through cell `sram_slot`
///
/// Fails when the neuron exceeds 1023, or any of `sram_slot`,
/// `virtual_core`, `delta_x`, `delta_y` exceeds 3, or `core_mask` exceeds 15.
#[allow(clippy::too_many_arguments)]
pub fn encode_sram(
    neuron: u16,
    sram_slot: u8,
    virtual_core: u8,
    dir_x: DirectionX,
    delta_x: u8,
    dir_y: DirectionY,
    delta_y: u8,
    core_mask: u8,
) -> Result<u32> {
    let entry = SramEntry {
        neuron: NeuronId::new(neuron)?,
        slot: SramSlot::new(sram_slot)?,
        virtual_core: CoreId::new(virtual_core)?,
        dir_x,
        delta_x: ChipHops::new(delta_x)?,
        dir_y,
        delta_y: ChipHops::new(delta_y)?,
        cores: CoreMask::new(core_mask)?,
    };
    Ok(entry.encode())
}

/// [`encode_sram`] addressed by core and core-relative neuron
#[allow(clippy::too_many_arguments)]
pub fn encode_sram_core_relative(
    core: u8,
    core_neuron: u8,
    sram_slot: u8,
    virtual_core: u8,
    dir_x: DirectionX,
    delta_x: u8,
    dir_y: DirectionY,
    delta_y: u8,
    core_mask: u8,
) -> Result<u32> {
    let neuron = core_addr_to_neuron_id(core, core_neuron)?;
    encode_sram(
        neuron.raw(),
        sram_slot,
        virtual_core,
        dir_x,
        delta_x,
        dir_y,
        delta_y,
        core_mask,
    )
}

/// An ordered bulk write into the FPGA SRAM
///
/// The address is set once; the controller auto-increments it for every
/// data word, so `words` must be sent in order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SramBurst {
    /// Address of the first word
    pub base_address: u32,
    /// Words in transmission order
    pub words: Vec<u16>,
}

/// Plan a burst of `words` starting at `base_address`
///
/// `capacity` is the size of the target SRAM in words. An empty burst is a
/// configuration error; one running past `capacity` is a range error.
pub fn write_sram_burst(base_address: u32, words: &[u16], capacity: u32) -> Result<SramBurst> {
    if words.is_empty() {
        return Err(CodecError::config("SRAM burst must contain at least one word"));
    }

    let end = u64::from(base_address) + words.len() as u64;
    if end > u64::from(capacity) {
        return Err(CodecError::out_of_range("SRAM burst end", end, capacity));
    }

    Ok(SramBurst {
        base_address,
        words: words.to_vec(),
    })
}

impl SramBurst {
    /// Number of words in the burst
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for bursts built by [`write_sram_burst`]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Address one past the last written word
    pub fn end_address(&self) -> u32 {
        self.base_address.saturating_add(self.words.len() as u32)
    }

    /// Register writes executing this burst
    ///
    /// Burst mode is entered before the base address is set, since outside
    /// burst mode an address write commits the pending data. Each burst-mode
    /// data write carries two words, least significant half first. An odd
    /// trailing word is written after leaving burst mode as a single write,
    /// committed by its address; a one-word burst is only that write.
    pub fn to_config_writes(&self) -> Vec<ConfigWrite> {
        use registers::sram::*;

        let pairs = self.words.chunks_exact(2);
        let trailing = pairs.remainder().first().copied();

        let mut writes = Vec::with_capacity(self.words.len() / 2 + 6);
        writes.push(ConfigWrite::new(MODULE, RW_COMMAND, WRITE));
        if self.words.len() >= 2 {
            writes.push(ConfigWrite::new(MODULE, BURST_MODE, 1));
            writes.push(ConfigWrite::new(MODULE, ADDRESS, self.base_address));
            for pair in pairs {
                let value = u32::from(pair[0]) | (u32::from(pair[1]) << 16);
                writes.push(ConfigWrite::new(MODULE, WRITE_DATA, value));
            }
            writes.push(ConfigWrite::new(MODULE, BURST_MODE, 0));
        }

        if let Some(word) = trailing {
            writes.push(ConfigWrite::new(MODULE, WRITE_DATA, u32::from(word)));
            writes.push(ConfigWrite::new(MODULE, ADDRESS, self.end_address() - 1));
        }
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::type_complexity)]
    fn decode(word: u32) -> (u32, u32, u32, u32, u32, u32, u32, u32) {
        (
            NEURON.extract(word),
            SLOT.extract(word),
            VIRTUAL_CORE.extract(word),
            DIR_X.extract(word),
            DELTA_X.extract(word),
            DIR_Y.extract(word),
            DELTA_Y.extract(word),
            CORES.extract(word),
        )
    }

    #[test]
    fn test_encode_fields() {
        let word = encode_sram(
            565,
            2,
            1,
            DirectionX::West,
            3,
            DirectionY::North,
            1,
            0b1010,
        )
        .unwrap();
        assert_eq!(decode(word), (565, 2, 1, 1, 3, 0, 1, 0b1010));
        assert_eq!(WordKind::of(word), Some(WordKind::Sram));
    }

    #[test]
    fn test_encode_layout() {
        let word = encode_sram(0, 0, 0, DirectionX::East, 0, DirectionY::North, 0, 0).unwrap();
        assert_eq!(word, 0x8000_0000);
        let word = encode_sram(1023, 3, 3, DirectionX::West, 3, DirectionY::South, 3, 15).unwrap();
        assert_eq!(word, 0x80FF_FFFF);
    }

    #[test]
    fn test_bounds() {
        let ok = |n, s, v, dx, dy, m| {
            encode_sram(n, s, v, DirectionX::East, dx, DirectionY::South, dy, m)
        };
        assert!(ok(1023, 3, 3, 3, 3, 15).is_ok());
        assert!(ok(1024, 0, 0, 0, 0, 0).unwrap_err().is_range_error());
        assert!(ok(0, 4, 0, 0, 0, 0).unwrap_err().is_range_error());
        assert!(ok(0, 0, 4, 0, 0, 0).unwrap_err().is_range_error());
        assert!(ok(0, 0, 0, 4, 0, 0).unwrap_err().is_range_error());
        assert!(ok(0, 0, 0, 0, 4, 0).unwrap_err().is_range_error());
        assert!(ok(0, 0, 0, 0, 0, 16).unwrap_err().is_range_error());
    }

    #[test]
    fn test_core_relative_adapter_matches_linear() {
        for (core, neuron) in [(0u8, 0u8), (2, 53), (3, 255), (1, 17)] {
            let linear = core as u16 * 256 + neuron as u16;
            assert_eq!(
                encode_sram_core_relative(
                    core,
                    neuron,
                    1,
                    2,
                    DirectionX::West,
                    1,
                    DirectionY::South,
                    2,
                    0b0110
                )
                .unwrap(),
                encode_sram(linear, 1, 2, DirectionX::West, 1, DirectionY::South, 2, 0b0110)
                    .unwrap()
            );
        }
        assert!(encode_sram_core_relative(
            4,
            0,
            0,
            0,
            DirectionX::East,
            0,
            DirectionY::North,
            0,
            0
        )
        .unwrap_err()
        .is_range_error());
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("west".parse::<DirectionX>().unwrap(), DirectionX::West);
        assert_eq!("0".parse::<DirectionX>().unwrap(), DirectionX::East);
        assert_eq!("SOUTH".parse::<DirectionY>().unwrap(), DirectionY::South);
        assert!("2".parse::<DirectionY>().unwrap_err().is_range_error());
        assert!("up".parse::<DirectionY>().unwrap_err().is_range_error());
        assert!("sideways".parse::<DirectionX>().unwrap_err().is_range_error());
        assert_eq!(format!("{}", DirectionY::North), "North");
    }

    #[test]
    fn test_burst_validation() {
        assert!(write_sram_burst(0, &[], 1024).unwrap_err().is_config_error());
        assert!(write_sram_burst(1020, &[1, 2, 3, 4], 1024).is_ok());
        assert!(write_sram_burst(1021, &[1, 2, 3, 4], 1024)
            .unwrap_err()
            .is_range_error());
        assert!(write_sram_burst(u32::MAX, &[1], u32::MAX)
            .unwrap_err()
            .is_range_error());
    }

    #[test]
    fn test_burst_writes_even() {
        use registers::sram::*;

        let burst = write_sram_burst(0x100, &[0x1111, 0x2222, 0x3333, 0x4444], 1 << 20).unwrap();
        assert_eq!(burst.len(), 4);
        assert_eq!(
            burst.to_config_writes(),
            vec![
                ConfigWrite::new(MODULE, RW_COMMAND, WRITE),
                ConfigWrite::new(MODULE, BURST_MODE, 1),
                ConfigWrite::new(MODULE, ADDRESS, 0x100),
                ConfigWrite::new(MODULE, WRITE_DATA, 0x2222_1111),
                ConfigWrite::new(MODULE, WRITE_DATA, 0x4444_3333),
                ConfigWrite::new(MODULE, BURST_MODE, 0),
            ]
        );
    }

    #[test]
    fn test_burst_writes_odd_tail() {
        use registers::sram::*;

        let burst = write_sram_burst(10, &[7, 8, 9], 1 << 20).unwrap();
        let writes = burst.to_config_writes();
        assert_eq!(writes.len(), 7);
        assert_eq!(writes[3], ConfigWrite::new(MODULE, WRITE_DATA, (8 << 16) | 7));
        assert_eq!(writes[4], ConfigWrite::new(MODULE, BURST_MODE, 0));
        assert_eq!(writes[5], ConfigWrite::new(MODULE, WRITE_DATA, 9));
        assert_eq!(writes[6], ConfigWrite::new(MODULE, ADDRESS, 12));

        assert_eq!(writes[1], ConfigWrite::new(MODULE, BURST_MODE, 1));
        assert_eq!(writes[2], ConfigWrite::new(MODULE, ADDRESS, 10));
    }

    #[test]
    fn test_burst_single_word_skips_burst_mode() {
        use registers::sram::*;

        let single = write_sram_burst(5, &[42], 1 << 20).unwrap().to_config_writes();
        assert_eq!(
            single,
            vec![
                ConfigWrite::new(MODULE, RW_COMMAND, WRITE),
                ConfigWrite::new(MODULE, WRITE_DATA, 42),
                ConfigWrite::new(MODULE, ADDRESS, 5),
            ]
        );
    }
}
