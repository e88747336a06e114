//! Seam to the device configuration path
//!
//! The codec never talks to hardware. Callers hand the ordered writes it
//! produces to a [`ConfigTransport`], which owns the USB (or other) link.

use std::collections::HashMap;

use core::fmt;
use log::{debug, trace};

use crate::{
    error::CodecError,
    registers::{chip_control, ConfigWrite},
};

/// Interface to a board's configuration registers
pub trait ConfigTransport {
    /// Error type for transport operations
    type Error: From<CodecError> + fmt::Debug + fmt::Display;

    /// Write `value` to parameter `param` of module `module`
    fn config_set(&mut self, module: u8, param: u8, value: u32) -> Result<(), Self::Error>;

    /// Read parameter `param` of module `module`
    fn config_get(&mut self, module: u8, param: u8) -> Result<u32, Self::Error>;

    /// Ship bias, CAM or SRAM words to the currently selected chip, in order
    ///
    /// The default sends one `CHIP/CONTENT` write per word; transports with a
    /// bulk path should override it.
    fn send_words(&mut self, words: &[u32]) -> Result<(), Self::Error> {
        for &word in words {
            self.config_set(chip_control::MODULE, chip_control::CONTENT, word)?;
        }
        Ok(())
    }
}

/// Replay `writes` on `transport` in order, stopping at the first failure
pub fn apply<T: ConfigTransport>(transport: &mut T, writes: &[ConfigWrite]) -> Result<(), T::Error> {
    debug!("applying {} configuration writes", writes.len());
    for (index, write) in writes.iter().enumerate() {
        trace!("write {}: {}", index, write);
        transport.config_set(write.module, write.param, write.value)?;
    }
    Ok(())
}

/// In-memory transport that records every write
///
/// Used for dry runs and tests: keeps the full write log and the last value
/// seen by each register.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    log: Vec<ConfigWrite>,
    registers: HashMap<(u8, u8), u32>,
}

impl RecordingTransport {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write in the order it arrived
    pub fn writes(&self) -> &[ConfigWrite] {
        &self.log
    }

    /// Last value written to a register, if any
    pub fn register(&self, module: u8, param: u8) -> Option<u32> {
        self.registers.get(&(module, param)).copied()
    }

    /// Words sent to the chip through `CHIP/CONTENT`
    pub fn chip_words(&self) -> Vec<u32> {
        self.log
            .iter()
            .filter(|w| w.module == chip_control::MODULE && w.param == chip_control::CONTENT)
            .map(|w| w.value)
            .collect()
    }

    /// Drop the log and all register values
    pub fn clear(&mut self) {
        self.log.clear();
        self.registers.clear();
    }
}

impl ConfigTransport for RecordingTransport {
    type Error = CodecError;

    fn config_set(&mut self, module: u8, param: u8, value: u32) -> Result<(), Self::Error> {
        self.log.push(ConfigWrite::new(module, param, value));
        self.registers.insert((module, param), value);
        Ok(())
    }

    fn config_get(&mut self, module: u8, param: u8) -> Result<u32, Self::Error> {
        Ok(self.register(module, param).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_cam, poisson::write_rate, registers::poisson, ChipId};

    #[test]
    fn test_apply_preserves_order() {
        let mut transport = RecordingTransport::new();
        let writes = write_rate(7, 99).unwrap();
        apply(&mut transport, &writes).unwrap();

        assert_eq!(transport.writes(), &writes[..]);
        assert_eq!(transport.register(poisson::MODULE, poisson::WRITE_DATA), Some(99));
        assert_eq!(transport.register(poisson::MODULE, poisson::WRITE_ADDRESS), Some(7));
    }

    #[test]
    fn test_send_words_default() {
        let mut transport = RecordingTransport::new();
        let cam = encode_cam(1, 2, 3, 0).unwrap();
        apply(&mut transport, &[ConfigWrite::select_chip(ChipId::U2)]).unwrap();
        transport.send_words(&[cam, cam + 1]).unwrap();

        assert_eq!(transport.chip_words(), vec![cam, cam + 1]);
        assert_eq!(transport.register(chip_control::MODULE, chip_control::ID), Some(4));
        assert_eq!(transport.writes().len(), 3);
    }

    #[test]
    fn test_config_get_and_clear() {
        let mut transport = RecordingTransport::new();
        assert_eq!(transport.config_get(14, 5).unwrap(), 0);
        transport.config_set(14, 5, 1).unwrap();
        transport.config_set(14, 5, 0).unwrap();
        assert_eq!(transport.config_get(14, 5).unwrap(), 0);
        assert_eq!(transport.writes().len(), 2);

        transport.clear();
        assert!(transport.writes().is_empty());
        assert_eq!(transport.register(14, 5), None);
    }
}
