//! dynapse CLI crate
//!
//! Command-line access to the Dynap-se configuration codec: encode and
//! decode bias words, encode CAM and SRAM words, plan SRAM bursts, map neuron
//! and pixel addresses, quantize poisson rates, and compile whole chip
//! programs into ordered register writes.
//!
//! The binary (src/main.rs) wires up logging and argument parsing and calls
//! [`DynapseCli::execute`]. Command modules are public so integration tests
//! and scripts can drive them without spawning a process.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::DynapseCli;
