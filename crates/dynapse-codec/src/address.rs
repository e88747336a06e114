//! Neuron address mapping
//!
//! Two coordinate systems are bridged here:
//!
//! - chip-relative: `core * 256 + row * 16 + column`, the linear
//!   [`NeuronId`] used by every CAM/SRAM encoder;
//! - board pixels: a 64x64 grid built from 2x2 chips of 32x32 neurons, each
//!   chip made of 2x2 cores of 16x16 neurons, origin at the top left.
//!
//! ```text
//!        x: 0        16        32        48       63
//!   y: 0  +---------+---------+---------+---------+
//!         | U0 / C0 | U0 / C1 | U1 / C0 | U1 / C1 |
//!     16  +---------+---------+---------+---------+
//!         | U0 / C2 | U0 / C3 | U1 / C2 | U1 / C3 |
//!     32  +---------+---------+---------+---------+
//!         | U2 / C0 | U2 / C1 | U3 / C0 | U3 / C1 |
//!     48  +---------+---------+---------+---------+
//!         | U2 / C2 | U2 / C3 | U3 / C2 | U3 / C3 |
//!         +---------+---------+---------+---------+
//! ```

use core::fmt;

use crate::{
    chip,
    error::{check_max, Result},
    ids::{ChipId, CoreId, NeuronId},
};

/// Map core ID and column/row address to the chip global neuron address
pub fn core_xy_to_neuron_id(core: u8, column: u8, row: u8) -> Result<NeuronId> {
    let core = CoreId::new(core)?;
    check_max("column", column, chip::CORE_COLUMNS - 1)?;
    check_max("row", row, chip::CORE_ROWS - 1)?;

    let linear = core.raw() as u16 * chip::NEURONS_PER_CORE
        + row as u16 * chip::CORE_COLUMNS as u16
        + column as u16;
    NeuronId::new(linear)
}

/// Map core ID and per-core neuron address to the chip global neuron address
pub fn core_addr_to_neuron_id(core: u8, core_neuron: u8) -> Result<NeuronId> {
    Ok(NeuronId::from_parts(CoreId::new(core)?, core_neuron))
}

/// Origin of a spike: chip, core and neuron address inside the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpikeSource {
    /// Chip on the board
    pub chip: ChipId,
    /// Core on the chip
    pub core: CoreId,
    /// Neuron address within the core, `[0, 255]`
    pub neuron: u8,
}

impl SpikeSource {
    /// Create a checked spike source from raw values
    pub fn new(chip: u8, core: u8, neuron: u16) -> Result<Self> {
        check_max("core neuron", neuron, chip::NEURONS_PER_CORE - 1)?;
        Ok(Self {
            chip: ChipId::new(chip)?,
            core: CoreId::new(core)?,
            neuron: neuron as u8,
        })
    }

    /// Chip global neuron address of this source
    pub fn neuron_id(&self) -> NeuronId {
        NeuronId::from_parts(self.core, self.neuron)
    }
}

impl fmt::Display for SpikeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.chip, self.core, self.neuron)
    }
}

/// Board pixel coordinate, each axis in `[0, 63]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelCoordinate {
    /// Column, growing to the right
    pub x: u16,
    /// Row, growing downwards
    pub y: u16,
}

impl PixelCoordinate {
    /// Create a checked coordinate
    pub fn new(x: u16, y: u16) -> Result<Self> {
        check_max("x", x, chip::BOARD_COLUMNS - 1)?;
        check_max("y", y, chip::BOARD_ROWS - 1)?;
        Ok(Self { x, y })
    }
}

impl fmt::Display for PixelCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board pixel position of a spike from `chip`/`core`/`neuron`
pub fn spike_event_to_xy(chip: u8, core: u8, neuron: u16) -> Result<PixelCoordinate> {
    Ok(SpikeSource::new(chip, core, neuron)?.to_xy())
}

/// Recover chip, core and neuron from a board pixel position
pub fn xy_to_spike_event(x: u16, y: u16) -> Result<SpikeSource> {
    Ok(PixelCoordinate::new(x, y)?.to_spike_source())
}

impl SpikeSource {
    /// Board pixel position of this source
    pub fn to_xy(&self) -> PixelCoordinate {
        let core_columns = chip::CORE_COLUMNS as u16;
        let core_rows = chip::CORE_ROWS as u16;

        let mut x = self.neuron as u16 % core_columns;
        let mut y = self.neuron as u16 / core_columns;
        if self.core.raw() & 0x01 != 0 {
            x += core_columns;
        }
        if self.core.raw() & 0x02 != 0 {
            y += core_rows;
        }
        if self.chip.is_right() {
            x += chip::CHIP_COLUMNS;
        }
        if self.chip.is_bottom() {
            y += chip::CHIP_ROWS;
        }

        PixelCoordinate { x, y }
    }
}

impl PixelCoordinate {
    /// Chip, core and neuron under this pixel
    pub fn to_spike_source(&self) -> SpikeSource {
        let core_columns = chip::CORE_COLUMNS as u16;
        let core_rows = chip::CORE_ROWS as u16;

        let board_chip =
            ChipId::from_board_half(self.x >= chip::CHIP_COLUMNS, self.y >= chip::CHIP_ROWS);
        let (chip_x, chip_y) = (self.x % chip::CHIP_COLUMNS, self.y % chip::CHIP_ROWS);

        let core = ((chip_x >= core_columns) as u8) | (((chip_y >= core_rows) as u8) << 1);
        let neuron = (chip_y % core_rows) * core_columns + chip_x % core_columns;

        SpikeSource {
            chip: board_chip,
            core: CoreId::from_bits_truncate(core as u32),
            neuron: neuron as u8,
        }
    }
}
