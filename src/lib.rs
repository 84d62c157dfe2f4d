//! # TD4 Emulator
//!
//! An emulator of the TD4, the 4-bit CPU from Iku Watanabe's
//! "How to Build a CPU" that hobbyists wire up from discrete logic chips.
//! 16 bytes of program memory, two 4-bit registers, a carry flag and
//! one 4-bit input and output port each - the whole machine fits in a
//! handful of bytes, which makes it a nice target for bit-exact emulation.

pub mod cpu;
pub mod render;
pub mod rom;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types
pub use cpu::{decode, encode, Emulator, Machine, Opcode, MEMORY_SIZE};
pub use render::{memory_dump, mnemonic, parse_input_value, status_line, DisplayMode};
pub use rom::{load_rom, save_rom, RomError};

#[cfg(feature = "tui")]
pub use tui::run_monitor;
