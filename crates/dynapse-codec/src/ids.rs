//! Range-checked identifier types
//!
//! Raw integers only enter the codec through the checked constructors here,
//! so the encoders downstream never see an out-of-domain field.

use core::fmt;

use crate::{
    chip,
    error::{check_max, CodecError, Result},
};

/// Chip-global neuron address in `[0, 1023]`
///
/// `raw = core * 256 + row * 16 + column`, so the core occupies bits 8..=9,
/// the row bits 4..=7 and the column bits 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronId(u16);

impl NeuronId {
    /// Largest valid neuron address
    pub const MAX: u16 = chip::NUM_NEURONS - 1;

    /// Create a new neuron ID
    pub fn new(id: u16) -> Result<Self> {
        check_max("neuron", id, Self::MAX)?;
        Ok(Self(id))
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Combine a core and an address inside it
    pub const fn from_parts(core: CoreId, core_relative: u8) -> Self {
        Self(((core.raw() as u16) << 8) | core_relative as u16)
    }

    /// Core hosting this neuron
    pub const fn core(&self) -> CoreId {
        CoreId((self.0 >> 8) as u8)
    }

    /// Address of the neuron inside its core, `[0, 255]`
    pub const fn core_relative(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Column inside the core, `[0, 15]`
    pub const fn column(&self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    /// Row inside the core, `[0, 15]`
    pub const fn row(&self) -> u8 {
        ((self.0 >> 4) & 0x0F) as u8
    }

    /// Iterate every neuron of a chip in address order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

macro_rules! bounded_id {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(u8);

        impl $name {
            /// Largest valid value
            pub const MAX: u8 = $max;

            /// Create a new checked value
            pub fn new(id: u8) -> Result<Self> {
                check_max($field, id, Self::MAX)?;
                Ok(Self(id))
            }

            /// Get the raw value
            pub const fn raw(&self) -> u8 {
                self.0
            }

            /// Keep only the bits that fit, for values read back out of a word
            #[allow(dead_code)]
            pub(crate) const fn from_bits_truncate(bits: u32) -> Self {
                Self(bits as u8 & Self::MAX)
            }

            /// Iterate every valid value in ascending order
            pub fn all() -> impl Iterator<Item = Self> {
                (0..=Self::MAX).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let id = <u8 as serde::Deserialize>::deserialize(deserializer)?;
                $name::new(id).map_err(serde::de::Error::custom)
            }
        }
    };
}

bounded_id!(
    /// Core of a chip, `[0, 3]`
    CoreId,
    "core",
    chip::NUM_CORES - 1,
    "C"
);

bounded_id!(
    /// CAM cell of a neuron, `[0, 63]`
    CamSlot,
    "cam slot",
    chip::CAMS_PER_NEURON - 1,
    "CAM"
);

bounded_id!(
    /// SRAM cell of a neuron, `[0, 3]`
    SramSlot,
    "sram slot",
    chip::SRAMS_PER_NEURON - 1,
    "SRAM"
);

bounded_id!(
    /// Number of chip-to-chip hops along one axis, `[0, 3]`
    ChipHops,
    "chip hops",
    3,
    "+"
);

/// One-hot destination core mask `[C3, C2, C1, C0]`, `[0, 15]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoreMask(u8);

impl CoreMask {
    /// Route to no core
    pub const NONE: Self = Self(0);
    /// Route to all four cores
    pub const ALL: Self = Self(0x0F);

    /// Create a new mask
    pub fn new(mask: u8) -> Result<Self> {
        check_max("destination core mask", mask, Self::ALL.0)?;
        Ok(Self(mask))
    }

    /// Build a mask selecting the given cores
    pub fn from_cores(cores: impl IntoIterator<Item = CoreId>) -> Self {
        Self(cores.into_iter().fold(0, |mask, core| mask | (1 << core.raw())))
    }

    /// Get the raw mask value
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// Whether `core` is selected
    pub const fn contains(&self, core: CoreId) -> bool {
        self.0 & (1 << core.raw()) != 0
    }

    /// Iterate the selected cores in ascending order
    pub fn cores(&self) -> impl Iterator<Item = CoreId> + '_ {
        CoreId::all().filter(move |core| self.contains(*core))
    }
}

impl fmt::Display for CoreMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}

/// Chip on the four-chip board
///
/// The IDs are not contiguous: U0 = 0 (top left), U1 = 8 (top right),
/// U2 = 4 (bottom left), U3 = 12 (bottom right). Bit 3 of the ID selects
/// the right half of the board and bit 2 the bottom half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChipId(u8);

impl ChipId {
    /// Chip U0
    pub const U0: Self = Self(0);
    /// Chip U1
    pub const U1: Self = Self(8);
    /// Chip U2
    pub const U2: Self = Self(4);
    /// Chip U3
    pub const U3: Self = Self(12);

    /// All four chips in U0..U3 order
    pub const ALL: [Self; 4] = [Self::U0, Self::U1, Self::U2, Self::U3];

    /// Create a new chip ID
    pub fn new(id: u8) -> Result<Self> {
        match id {
            0 | 4 | 8 | 12 => Ok(Self(id)),
            _ => Err(CodecError::invalid_value("chip", id, "0, 4, 8 or 12")),
        }
    }

    /// Build the ID of the chip at board position (`right`, `bottom`)
    pub const fn from_board_half(right: bool, bottom: bool) -> Self {
        Self(((right as u8) << 3) | ((bottom as u8) << 2))
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// Whether the chip sits in the right half of the board
    pub const fn is_right(&self) -> bool {
        self.0 & 0x08 != 0
    }

    /// Whether the chip sits in the bottom half of the board
    pub const fn is_bottom(&self) -> bool {
        self.0 & 0x04 != 0
    }

    /// Board label index, 0 for U0 through 3 for U3
    pub const fn label(&self) -> u8 {
        match self.0 {
            0 => 0,
            8 => 1,
            4 => 2,
            _ => 3,
        }
    }
}

impl Default for ChipId {
    fn default() -> Self {
        Self::U0
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.label())
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{de::Error as _, Deserialize, Serialize};

    impl Serialize for NeuronId {
        fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for NeuronId {
        fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u16::deserialize(deserializer)?;
            NeuronId::new(id).map_err(D::Error::custom)
        }
    }

    impl Serialize for CoreMask {
        fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for CoreMask {
        fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let mask = u8::deserialize(deserializer)?;
            CoreMask::new(mask).map_err(D::Error::custom)
        }
    }

    impl Serialize for ChipId {
        fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for ChipId {
        fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u8::deserialize(deserializer)?;
            ChipId::new(id).map_err(D::Error::custom)
        }
    }
}
