//! Bit field helpers shared by the word codecs
//!
//! Each configuration word is described by a handful of [`BitField`]s. The
//! two most significant bits of every word carry a [`WordKind`] tag so a raw
//! word seen in a log can be attributed to the codec that produced it.

/// A contiguous run of bits inside a 32-bit word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// Position of the least significant bit
    pub shift: u32,
    /// Number of bits, at most 31
    pub width: u32,
}

impl BitField {
    /// Create a new field
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Largest value the field can hold
    pub const fn max(self) -> u32 {
        (1 << self.width) - 1
    }

    /// Mask of the field's bits in place
    pub const fn mask(self) -> u32 {
        self.max() << self.shift
    }

    /// Move `value` into position, dropping bits wider than the field
    pub const fn place(self, value: u32) -> u32 {
        (value & self.max()) << self.shift
    }

    /// Read the field back out of `word`
    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.max()
    }

    /// Place a single-bit flag
    pub const fn place_flag(self, flag: bool) -> u32 {
        self.place(flag as u32)
    }

    /// Read a single-bit flag
    pub const fn flag(self, word: u32) -> bool {
        self.extract(word) != 0
    }
}

/// Kind tag stored in bits 30..=31
pub const KIND: BitField = BitField::new(30, 2);

/// Which codec produced a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WordKind {
    /// Coarse/fine bias word
    Bias = 0,
    /// CAM (synapse table) word
    Cam = 1,
    /// SRAM (routing table) word
    Sram = 2,
}

impl WordKind {
    /// Tag bits for this kind, already in position
    pub const fn tag(self) -> u32 {
        KIND.place(self as u32)
    }

    /// Classify a word by its tag; `None` for the reserved tag value
    pub const fn of(word: u32) -> Option<Self> {
        match KIND.extract(word) {
            0 => Some(Self::Bias),
            1 => Some(Self::Cam),
            2 => Some(Self::Sram),
            _ => None,
        }
    }
}

/// Panics at compile time if two fields overlap
pub(crate) const fn assert_disjoint(fields: &[BitField]) {
    let mut seen = 0u32;
    let mut i = 0;
    while i < fields.len() {
        let mask = fields[i].mask();
        assert!(seen & mask == 0, "overlapping bit fields");
        seen |= mask;
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_extract() {
        let field = BitField::new(4, 8);
        assert_eq!(field.max(), 0xFF);
        assert_eq!(field.mask(), 0x0FF0);
        assert_eq!(field.place(0xAB), 0x0AB0);
        assert_eq!(field.extract(0xFFFF_0AB5), 0xAB);
        // excess bits are dropped rather than bleeding into neighbours
        assert_eq!(field.place(0x1AB), 0x0AB0);
    }

    #[test]
    fn test_flags() {
        let flag = BitField::new(3, 1);
        assert_eq!(flag.place_flag(true), 0b1000);
        assert_eq!(flag.place_flag(false), 0);
        assert!(flag.flag(0b1000));
        assert!(!flag.flag(0b0111));
    }

    #[test]
    fn test_word_kind_tags() {
        assert_eq!(WordKind::Bias.tag(), 0);
        assert_eq!(WordKind::Cam.tag(), 0x4000_0000);
        assert_eq!(WordKind::Sram.tag(), 0x8000_0000);

        for kind in [WordKind::Bias, WordKind::Cam, WordKind::Sram] {
            assert_eq!(WordKind::of(kind.tag() | 0x1234), Some(kind));
        }
        assert_eq!(WordKind::of(0xC000_0000), None);
    }
}
