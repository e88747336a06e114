//! Device configuration register vocabulary
//!
//! Every configuration operation on the board is a write of one 32-bit value
//! to a (module, parameter) address pair. The addresses below are the
//! interoperability surface with the device logic and must not change.
//!
//! [`MODULES`] gathers them into one immutable table for lookup by name.

use core::fmt;

/// Multiplexer: mixes, timestamps and outputs event streams
pub mod mux {
    /// Module address
    pub const MODULE: u8 = 0;
    /// Run the multiplexer state machine
    pub const RUN: u8 = 0;
    /// Run the timestamp generator
    pub const TIMESTAMP_RUN: u8 = 1;
    /// Reset the timestamp generator to zero
    pub const TIMESTAMP_RESET: u8 = 2;
    /// Keep the chip bias generator powered at all times
    pub const FORCE_CHIP_BIAS_ENABLE: u8 = 3;
    /// Drop AER events while the USB output is stalled
    pub const DROP_AER_ON_TRANSFER_STALL: u8 = 4;
}

/// AER handshake with the chip's output bus
pub mod aer {
    /// Module address
    pub const MODULE: u8 = 1;
    /// Run the AER state machine
    pub const RUN: u8 = 3;
    /// Delay before acknowledging, in logic clock cycles
    pub const ACK_DELAY: u8 = 4;
    /// Acknowledge extension, in logic clock cycles
    pub const ACK_EXTENSION: u8 = 6;
    /// Stall the handshake while the output FIFO is full
    pub const WAIT_ON_TRANSFER_STALL: u8 = 8;
    /// Hand the AER bus to an external system
    pub const EXTERNAL_AER_CONTROL: u8 = 10;
}

/// Chip control: ships bias, CAM and SRAM words to the selected chip
pub mod chip_control {
    /// Module address
    pub const MODULE: u8 = 5;
    /// Run the configuration state machine
    pub const RUN: u8 = 0;
    /// Chip that receives subsequent content writes
    pub const ID: u8 = 1;
    /// Configuration word; every change is sent to the selected chip
    pub const CONTENT: u8 = 2;
    /// Request delay, in logic clock cycles
    pub const REQ_DELAY: u8 = 3;
    /// Request extension, in logic clock cycles
    pub const REQ_EXTENSION: u8 = 4;
}

/// Read-only system information
pub mod sysinfo {
    /// Module address
    pub const MODULE: u8 = 6;
    /// Logic revision
    pub const LOGIC_VERSION: u8 = 0;
    /// Chip type identifier
    pub const CHIP_IDENTIFIER: u8 = 1;
    /// Whether the device is timestamp master
    pub const DEVICE_IS_MASTER: u8 = 2;
    /// Logic clock in MHz
    pub const LOGIC_CLOCK: u8 = 3;
}

/// USB output FIFO
pub mod usb {
    /// Module address
    pub const MODULE: u8 = 9;
    /// Enable the USB FIFO
    pub const RUN: u8 = 0;
    /// Short packet commit delay, in 125 µs slices
    pub const EARLY_PACKET_DELAY: u8 = 1;
}

/// Macro commands that take their argument in the parameter address
pub mod command {
    /// Clear CAM content on all cores of the selected chip
    pub const CLEAR_CAM: u8 = 10;
    /// Clear SRAM, routing every neuron to USB through cell 0
    pub const DEFAULT_SRAM: u8 = 11;
    /// Route a neuron's analog state to the monitor connectors
    pub const MONITOR_NEU: u8 = 12;
    /// Clear SRAM, routing nothing outside
    pub const DEFAULT_SRAM_EMPTY: u8 = 13;
}

/// FPGA SRAM controller
pub mod sram {
    /// Module address
    pub const MODULE: u8 = 14;
    /// Address of the next access; writing it triggers the command
    pub const ADDRESS: u8 = 1;
    /// Most recently read word
    pub const READ_DATA: u8 = 2;
    /// Word for the next write
    pub const WRITE_DATA: u8 = 3;
    /// Command executed on address change
    pub const RW_COMMAND: u8 = 4;
    /// Burst mode: write on data change and auto-increment the address
    pub const BURST_MODE: u8 = 5;

    /// RW_COMMAND value for reads
    pub const READ: u32 = 0;
    /// RW_COMMAND value for writes
    pub const WRITE: u32 = 1;
}

/// Synapse reconfiguration (DVS kernel mapping)
pub mod synapse_reconfig {
    /// Module address
    pub const MODULE: u8 = 15;
    /// Run control
    pub const RUN: u8 = 0;
    /// Global kernel table entry
    pub const GLOBAL_KERNEL: u8 = 1;
    /// Use per-neuron kernels from SRAM
    pub const USE_SRAM_KERNELS: u8 = 2;
    /// Output chip selection
    pub const CHIP_SELECT: u8 = 3;
    /// SRAM kernel table base, in 32 Kib increments
    pub const SRAM_BASE_ADDR: u8 = 4;
}

/// Spike train generator
pub mod spikegen {
    /// Module address
    pub const MODULE: u8 = 16;
    /// Start applying the configured spike train
    pub const RUN: u8 = 0;
    /// Variable inter-spike interval mode
    pub const VAR_MODE: u8 = 1;
    /// Start address of the spike train in memory
    pub const BASE_ADDR: u8 = 2;
    /// Number of events per application
    pub const STIM_COUNT: u8 = 3;
    /// Fixed inter-spike interval
    pub const ISI: u8 = 4;
    /// Inter-spike interval time base, in clock cycles
    pub const ISI_BASE: u8 = 5;
    /// Repeat mode
    pub const REPEAT: u8 = 6;
}

/// Poisson spike generator, one rate per virtual source
pub mod poisson {
    /// Module address
    pub const MODULE: u8 = 18;
    /// Enable generation
    pub const RUN: u8 = 0;
    /// Source address; writing it commits the pending WRITE_DATA rate
    pub const WRITE_ADDRESS: u8 = 1;
    /// Rate code for the next address write
    pub const WRITE_DATA: u8 = 2;
    /// Chip receiving the generated events
    pub const CHIP_ID: u8 = 3;
}

/// One configuration write, the unit handed to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigWrite {
    /// Module address
    pub module: u8,
    /// Parameter address within the module
    pub param: u8,
    /// Value to write
    pub value: u32,
}

impl ConfigWrite {
    /// Create a new write
    pub const fn new(module: u8, param: u8, value: u32) -> Self {
        Self { module, param, value }
    }

    /// Select the chip that receives subsequent content writes
    pub const fn select_chip(chip: crate::ChipId) -> Self {
        Self::new(chip_control::MODULE, chip_control::ID, chip.raw() as u32)
    }

    /// Send one bias, CAM or SRAM word to the selected chip
    pub const fn chip_content(word: u32) -> Self {
        Self::new(chip_control::MODULE, chip_control::CONTENT, word)
    }

    /// Symbolic `MODULE/PARAM` name, if both are in [`MODULES`]
    pub fn name(&self) -> Option<String> {
        let module = module_by_address(self.module)?;
        let param = module.param_name(self.param)?;
        Some(format!("{}/{}", module.name, param))
    }
}

impl fmt::Display for ConfigWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} = 0x{:08X}", name, self.value),
            None => write!(f, "{}/{} = 0x{:08X}", self.module, self.param, self.value),
        }
    }
}

/// A module and its parameter table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Symbolic module name
    pub name: &'static str,
    /// Module address
    pub address: u8,
    /// Parameter names and addresses
    pub params: &'static [(&'static str, u8)],
}

impl ModuleInfo {
    /// Address of the parameter called `name`
    pub fn param_address(&self, name: &str) -> Option<u8> {
        self.params
            .iter()
            .find(|(param, _)| param.eq_ignore_ascii_case(name))
            .map(|&(_, address)| address)
    }

    /// Name of the parameter at `address`
    pub fn param_name(&self, address: u8) -> Option<&'static str> {
        self.params
            .iter()
            .find(|(_, param)| *param == address)
            .map(|&(name, _)| name)
    }
}

/// Every configurable module of the board
pub static MODULES: &[ModuleInfo] = &[
    ModuleInfo {
        name: "MUX",
        address: mux::MODULE,
        params: &[
            ("RUN", mux::RUN),
            ("TIMESTAMP_RUN", mux::TIMESTAMP_RUN),
            ("TIMESTAMP_RESET", mux::TIMESTAMP_RESET),
            ("FORCE_CHIP_BIAS_ENABLE", mux::FORCE_CHIP_BIAS_ENABLE),
            ("DROP_AER_ON_TRANSFER_STALL", mux::DROP_AER_ON_TRANSFER_STALL),
        ],
    },
    ModuleInfo {
        name: "AER",
        address: aer::MODULE,
        params: &[
            ("RUN", aer::RUN),
            ("ACK_DELAY", aer::ACK_DELAY),
            ("ACK_EXTENSION", aer::ACK_EXTENSION),
            ("WAIT_ON_TRANSFER_STALL", aer::WAIT_ON_TRANSFER_STALL),
            ("EXTERNAL_AER_CONTROL", aer::EXTERNAL_AER_CONTROL),
        ],
    },
    ModuleInfo {
        name: "CHIP",
        address: chip_control::MODULE,
        params: &[
            ("RUN", chip_control::RUN),
            ("ID", chip_control::ID),
            ("CONTENT", chip_control::CONTENT),
            ("REQ_DELAY", chip_control::REQ_DELAY),
            ("REQ_EXTENSION", chip_control::REQ_EXTENSION),
        ],
    },
    ModuleInfo {
        name: "SYSINFO",
        address: sysinfo::MODULE,
        params: &[
            ("LOGIC_VERSION", sysinfo::LOGIC_VERSION),
            ("CHIP_IDENTIFIER", sysinfo::CHIP_IDENTIFIER),
            ("DEVICE_IS_MASTER", sysinfo::DEVICE_IS_MASTER),
            ("LOGIC_CLOCK", sysinfo::LOGIC_CLOCK),
        ],
    },
    ModuleInfo {
        name: "USB",
        address: usb::MODULE,
        params: &[
            ("RUN", usb::RUN),
            ("EARLY_PACKET_DELAY", usb::EARLY_PACKET_DELAY),
        ],
    },
    ModuleInfo {
        name: "CLEAR_CAM",
        address: command::CLEAR_CAM,
        params: &[],
    },
    ModuleInfo {
        name: "DEFAULT_SRAM",
        address: command::DEFAULT_SRAM,
        params: &[],
    },
    ModuleInfo {
        name: "MONITOR_NEU",
        address: command::MONITOR_NEU,
        params: &[],
    },
    ModuleInfo {
        name: "DEFAULT_SRAM_EMPTY",
        address: command::DEFAULT_SRAM_EMPTY,
        params: &[],
    },
    ModuleInfo {
        name: "SRAM",
        address: sram::MODULE,
        params: &[
            ("ADDRESS", sram::ADDRESS),
            ("READ_DATA", sram::READ_DATA),
            ("WRITE_DATA", sram::WRITE_DATA),
            ("RW_COMMAND", sram::RW_COMMAND),
            ("BURST_MODE", sram::BURST_MODE),
        ],
    },
    ModuleInfo {
        name: "SYNAPSE_RECONFIG",
        address: synapse_reconfig::MODULE,
        params: &[
            ("RUN", synapse_reconfig::RUN),
            ("GLOBAL_KERNEL", synapse_reconfig::GLOBAL_KERNEL),
            ("USE_SRAM_KERNELS", synapse_reconfig::USE_SRAM_KERNELS),
            ("CHIP_SELECT", synapse_reconfig::CHIP_SELECT),
            ("SRAM_BASE_ADDR", synapse_reconfig::SRAM_BASE_ADDR),
        ],
    },
    ModuleInfo {
        name: "SPIKEGEN",
        address: spikegen::MODULE,
        params: &[
            ("RUN", spikegen::RUN),
            ("VAR_MODE", spikegen::VAR_MODE),
            ("BASE_ADDR", spikegen::BASE_ADDR),
            ("STIM_COUNT", spikegen::STIM_COUNT),
            ("ISI", spikegen::ISI),
            ("ISI_BASE", spikegen::ISI_BASE),
            ("REPEAT", spikegen::REPEAT),
        ],
    },
    ModuleInfo {
        name: "POISSON_SPIKEGEN",
        address: poisson::MODULE,
        params: &[
            ("RUN", poisson::RUN),
            ("WRITE_ADDRESS", poisson::WRITE_ADDRESS),
            ("WRITE_DATA", poisson::WRITE_DATA),
            ("CHIP_ID", poisson::CHIP_ID),
        ],
    },
];

/// Look a module up by its symbolic name, ignoring case
pub fn module_by_name(name: &str) -> Option<&'static ModuleInfo> {
    MODULES.iter().find(|module| module.name.eq_ignore_ascii_case(name))
}

/// Look a module up by its address
pub fn module_by_address(address: u8) -> Option<&'static ModuleInfo> {
    MODULES.iter().find(|module| module.address == address)
}

/// Resolve `MODULE/PARAM` (e.g. `SRAM/BURST_MODE`) to its address pair
pub fn resolve(path: &str) -> Option<(u8, u8)> {
    let (module, param) = path.split_once('/')?;
    let module = module_by_name(module)?;
    Some((module.address, module.param_address(param)?))
}
