//! CPU emulation for the TD4 computer.
//!
//! This module implements the complete TD4 architecture:
//! - 16 bytes of program memory
//! - 2 four-bit registers (A, B), carry flag, 4-bit program counter
//! - 12-instruction set with 4-bit immediates
//! - latched 4-bit input/output port lines

pub mod decode;
pub mod execute;
pub mod machine;

pub use decode::{command_info, decode, encode, CommandInfo, Opcode, COMMANDS};
pub use execute::Emulator;
pub use machine::{Machine, MEMORY_SIZE, NIBBLE_MASK};
