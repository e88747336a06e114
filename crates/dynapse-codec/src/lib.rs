//! Configuration codec for Dynap-se neuromorphic chips
//!
//! This crate turns chip configuration expressed in domain terms (neuron
//! addresses, synapse types, coarse/fine bias currents, spike rates) into the
//! 32-bit words the device-configuration path ships to the board, and maps
//! between the chip's flat neuron addressing and board pixel coordinates.
//!
//! Every codec function is pure: no I/O, no shared state. Transmission is the
//! job of a [`ConfigTransport`] implementation supplied by the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod error;
pub mod ids;
pub mod word;

// Codecs
pub mod address;
pub mod bias;
pub mod cam;
pub mod poisson;
pub mod sram;

// Device vocabulary and plumbing
pub mod config;
pub mod program;
pub mod registers;
pub mod transport;

// Re-export essential types
pub use error::{CodecError, Result};
pub use ids::{CamSlot, ChipHops, ChipId, CoreId, CoreMask, NeuronId, SramSlot};
pub use word::WordKind;

pub use address::{
    core_addr_to_neuron_id, core_xy_to_neuron_id, spike_event_to_xy, xy_to_spike_event,
    PixelCoordinate, SpikeSource,
};
pub use bias::{generate as generate_bias, parse as parse_bias, BiasConfig};
pub use cam::{encode_cam, CamEntry, SynapseType};
pub use config::{CodecConfig, PoissonConfig};
pub use poisson::{quantize, write_rate, RateCode, RateTable};
pub use program::{BiasSetting, ChipProgram, RateRequest};
pub use registers::ConfigWrite;
pub use sram::{
    encode_sram, encode_sram_core_relative, write_sram_burst, DirectionX, DirectionY, SramBurst,
    SramEntry,
};
pub use transport::{apply, ConfigTransport, RecordingTransport};

/// Fixed geometry of a Dynap-se chip and of the four-chip board
pub mod chip {
    /// Logic chip identifier reported by SYSINFO for a Dynap-se
    pub const CHIP_IDENTIFIER: u16 = 64;
    /// Number of cores per chip
    pub const NUM_CORES: u8 = 4;
    /// Number of neurons in a single chip
    pub const NUM_NEURONS: u16 = 1024;
    /// Number of neurons per core
    pub const NEURONS_PER_CORE: u16 = 256;
    /// Number of neuron columns in a core
    pub const CORE_COLUMNS: u8 = 16;
    /// Number of neuron rows in a core
    pub const CORE_ROWS: u8 = 16;
    /// Number of neuron columns in a chip
    pub const CHIP_COLUMNS: u16 = 32;
    /// Number of neuron rows in a chip
    pub const CHIP_ROWS: u16 = 32;
    /// Number of neuron columns on the four-chip board
    pub const BOARD_COLUMNS: u16 = 64;
    /// Number of neuron rows on the four-chip board
    pub const BOARD_ROWS: u16 = 64;
    /// Number of CAM cells per neuron
    pub const CAMS_PER_NEURON: u8 = 64;
    /// Number of SRAM cells per neuron
    pub const SRAMS_PER_NEURON: u8 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_is_consistent() {
        assert_eq!(
            chip::NUM_NEURONS,
            chip::NUM_CORES as u16 * chip::NEURONS_PER_CORE
        );
        assert_eq!(
            chip::NEURONS_PER_CORE,
            chip::CORE_COLUMNS as u16 * chip::CORE_ROWS as u16
        );
        assert_eq!(chip::CHIP_COLUMNS, 2 * chip::CORE_COLUMNS as u16);
        assert_eq!(chip::BOARD_COLUMNS, 2 * chip::CHIP_COLUMNS);
        assert_eq!(chip::BOARD_ROWS, 2 * chip::CHIP_ROWS);
    }
}
