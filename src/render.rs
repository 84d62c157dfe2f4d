//! Text rendering of processor state.
//!
//! Everything here is a pure function from machine state to strings; the
//! execution engine never depends on presentation. The display mode only
//! changes how 4-bit fields are written, never the underlying values.

use crate::cpu::decode::command_info;
use crate::cpu::execute::Emulator;
use crate::cpu::machine::{Machine, MEMORY_SIZE};
use serde::{Deserialize, Serialize};

/// Presentation of 4-bit register/port values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Decimal 0-15.
    #[default]
    Decimal,
    /// Four-character binary groups, e.g. `1011`.
    Binary,
}

impl DisplayMode {
    /// Flip between decimal and binary.
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Decimal => DisplayMode::Binary,
            DisplayMode::Binary => DisplayMode::Decimal,
        }
    }
}

/// Format a 4-bit value in the given mode.
pub fn format_nibble(value: u8, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Decimal => format!("{}", value & 0x0F),
        DisplayMode::Binary => format!("{:04b}", value & 0x0F),
    }
}

/// Disassemble a single instruction byte.
///
/// Table lookup by high nibble; the immediate is appended (per the display
/// mode) when the command carries one. Unassigned nibbles render as
/// `UNKNOWN <hex>` - display only, they still execute as no-ops.
pub fn mnemonic(byte: u8, mode: DisplayMode) -> String {
    match command_info(byte) {
        Some(info) if info.has_immediate => {
            format!("{} {}", info.mnemonic, format_nibble(byte & 0x0F, mode))
        }
        Some(info) => info.mnemonic.to_string(),
        None => format!("UNKNOWN {:02X}", byte),
    }
}

/// One-line processor status: cycle, PC, the raw byte about to execute,
/// its disassembly, then A, B, OUT, IN and the carry flag.
pub fn status_line(emu: &Emulator, mode: DisplayMode) -> String {
    let m = &emu.machine;
    let instruction = m.fetch();
    format!(
        "Cycle: {:3} | PC: {:X} | Instr: {:02X} ({}) | A: {} | B: {} | OUT: {} | IN: {} | C: {}",
        emu.cycles,
        m.pc,
        instruction,
        mnemonic(instruction, mode),
        format_nibble(m.a, mode),
        format_nibble(m.b, mode),
        format_nibble(m.out_line, mode),
        format_nibble(m.in_line, mode),
        m.carry,
    )
}

/// Multi-line dump of all 16 memory cells, 8 per row, with the current PC
/// cell bracketed. Cells are full bytes, always shown in hex.
pub fn memory_dump(machine: &Machine) -> String {
    let mut out = String::from("Memory:\n");
    for row in 0..MEMORY_SIZE / 8 {
        out.push_str(&format!("{:02X}:", row * 8));
        for col in 0..8 {
            let addr = row * 8 + col;
            let byte = machine.read(addr);
            if addr == machine.pc as usize {
                out.push_str(&format!("[{:02X}]", byte));
            } else {
                out.push_str(&format!(" {:02X} ", byte));
            }
        }
        out.push('\n');
    }
    out
}

/// Disassembly listing of a full 16-byte image.
pub fn listing(image: &[u8; MEMORY_SIZE], mode: DisplayMode) -> String {
    let mut out = String::new();
    for (addr, &byte) in image.iter().enumerate() {
        out.push_str(&format!("{:X}: {:02X}  {}\n", addr, byte, mnemonic(byte, mode)));
    }
    out
}

/// Parse an input-port value typed by the operator.
///
/// Exactly four characters of '0'/'1' parse as binary; anything else must
/// be a decimal number in 0-15. A 4-character string with non-binary
/// characters is rejected outright, not retried as decimal.
pub fn parse_input_value(text: &str) -> Option<u8> {
    let text = text.trim();
    if text.len() == 4 {
        if !text.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }
        return u8::from_str_radix(text, 2).ok();
    }
    match text.parse::<u8>() {
        Ok(v) if v <= 15 => Some(v),
        _ => None,
    }
}
