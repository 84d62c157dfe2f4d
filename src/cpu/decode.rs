//! Instruction decoder for the TD4.
//!
//! A TD4 instruction is one byte: the high nibble selects the operation,
//! the low nibble is a literal operand or jump target. Four high nibbles
//! (0x8, 0xA, 0xC, 0xD) are unassigned on the real chip; they decode to an
//! explicit [`Opcode::Unknown`] variant instead of an error, because the
//! hardware executes any byte (unassigned ones just advance the PC).

use crate::cpu::machine::NIBBLE_MASK;
use serde::{Deserialize, Serialize};

/// Decoded TD4 instruction.
///
/// Immediates are stored pre-masked to the low nibble. `Unknown` carries
/// the full original byte for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    /// ADD A, im: A := (A + im) & 0xF, carry out into C
    AddA(u8),
    /// MOV A, B: A := B
    MovAB,
    /// IN A: A := input line
    InA,
    /// MOV A, im: A := im
    MovA(u8),
    /// MOV B, A: B := A
    MovBA,
    /// ADD B, im: B := (B + im) & 0xF, carry out into C
    AddB(u8),
    /// IN B: B := input line
    InB,
    /// MOV B, im: B := im
    MovB(u8),
    /// OUT B: output line := B
    OutB,
    /// OUT im: output line := im
    Out(u8),
    /// JNC im: if C = 0 then PC := im
    Jnc(u8),
    /// JMP im: PC := im
    Jmp(u8),
    /// Unassigned high nibble (0x8, 0xA, 0xC, 0xD); executes as a no-op.
    Unknown(u8),
}

/// Decode an instruction byte. Total: every byte value decodes.
pub fn decode(byte: u8) -> Opcode {
    let im = byte & NIBBLE_MASK;
    match byte & 0xF0 {
        0x00 => Opcode::AddA(im),
        0x10 => Opcode::MovAB,
        0x20 => Opcode::InA,
        0x30 => Opcode::MovA(im),
        0x40 => Opcode::MovBA,
        0x50 => Opcode::AddB(im),
        0x60 => Opcode::InB,
        0x70 => Opcode::MovB(im),
        0x90 => Opcode::OutB,
        0xB0 => Opcode::Out(im),
        0xE0 => Opcode::Jnc(im),
        0xF0 => Opcode::Jmp(im),
        _ => Opcode::Unknown(byte),
    }
}

/// Encode an instruction back to the canonical byte.
///
/// Opcodes without an immediate encode with a zero low nibble, so bytes
/// whose low nibble the hardware ignores (e.g. 0x11) come back as their
/// canonical form (0x10). `Unknown` returns its original byte unchanged.
pub fn encode(op: &Opcode) -> u8 {
    match *op {
        Opcode::AddA(im) => im & NIBBLE_MASK,
        Opcode::MovAB => 0x10,
        Opcode::InA => 0x20,
        Opcode::MovA(im) => 0x30 | (im & NIBBLE_MASK),
        Opcode::MovBA => 0x40,
        Opcode::AddB(im) => 0x50 | (im & NIBBLE_MASK),
        Opcode::InB => 0x60,
        Opcode::MovB(im) => 0x70 | (im & NIBBLE_MASK),
        Opcode::OutB => 0x90,
        Opcode::Out(im) => 0xB0 | (im & NIBBLE_MASK),
        Opcode::Jnc(im) => 0xE0 | (im & NIBBLE_MASK),
        Opcode::Jmp(im) => 0xF0 | (im & NIBBLE_MASK),
        Opcode::Unknown(byte) => byte,
    }
}

/// Static descriptor of one defined opcode, for disassembly.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    /// Assembly mnemonic (without the immediate).
    pub mnemonic: &'static str,
    /// High-nibble opcode value (low nibble zero).
    pub opcode: u8,
    /// Whether the low nibble is a meaningful operand.
    pub has_immediate: bool,
}

/// The 12 defined TD4 opcodes. Read-only; used only for disassembly,
/// never consulted during execution.
pub const COMMANDS: [CommandInfo; 12] = [
    CommandInfo { mnemonic: "ADD A", opcode: 0x00, has_immediate: true },
    CommandInfo { mnemonic: "MOV A, B", opcode: 0x10, has_immediate: false },
    CommandInfo { mnemonic: "IN A", opcode: 0x20, has_immediate: false },
    CommandInfo { mnemonic: "MOV A", opcode: 0x30, has_immediate: true },
    CommandInfo { mnemonic: "MOV B, A", opcode: 0x40, has_immediate: false },
    CommandInfo { mnemonic: "ADD B", opcode: 0x50, has_immediate: true },
    CommandInfo { mnemonic: "IN B", opcode: 0x60, has_immediate: false },
    CommandInfo { mnemonic: "MOV B", opcode: 0x70, has_immediate: true },
    CommandInfo { mnemonic: "OUT B", opcode: 0x90, has_immediate: false },
    CommandInfo { mnemonic: "OUT", opcode: 0xB0, has_immediate: true },
    CommandInfo { mnemonic: "JNC", opcode: 0xE0, has_immediate: true },
    CommandInfo { mnemonic: "JMP", opcode: 0xF0, has_immediate: true },
];

/// Look up the command descriptor for an instruction byte by its high
/// nibble. `None` for the unassigned nibbles.
pub fn command_info(byte: u8) -> Option<&'static CommandInfo> {
    let opcode = byte & 0xF0;
    COMMANDS.iter().find(|c| c.opcode == opcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_defined_opcodes() {
        assert_eq!(decode(0x00), Opcode::AddA(0));
        assert_eq!(decode(0x07), Opcode::AddA(7));
        assert_eq!(decode(0x1F), Opcode::MovAB);
        assert_eq!(decode(0x20), Opcode::InA);
        assert_eq!(decode(0x31), Opcode::MovA(1));
        assert_eq!(decode(0x40), Opcode::MovBA);
        assert_eq!(decode(0x5A), Opcode::AddB(10));
        assert_eq!(decode(0x60), Opcode::InB);
        assert_eq!(decode(0x7F), Opcode::MovB(15));
        assert_eq!(decode(0x90), Opcode::OutB);
        assert_eq!(decode(0xB5), Opcode::Out(5));
        assert_eq!(decode(0xE3), Opcode::Jnc(3));
        assert_eq!(decode(0xF0), Opcode::Jmp(0));
    }

    #[test]
    fn test_decode_unassigned_nibbles() {
        for high in [0x80u8, 0xA0, 0xC0, 0xD0] {
            for im in 0..16u8 {
                let byte = high | im;
                assert_eq!(decode(byte), Opcode::Unknown(byte));
            }
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        // No-immediate opcodes drop the ignored low nibble on decode, so
        // encode produces the canonical byte; everything else is exact.
        for byte in 0..=255u8 {
            let op = decode(byte);
            let canonical = match command_info(byte) {
                Some(info) if !info.has_immediate => byte & 0xF0,
                _ => byte,
            };
            assert_eq!(encode(&op), canonical);
            assert_eq!(decode(encode(&op)), op);
        }
    }

    #[test]
    fn test_command_info_lookup() {
        let info = command_info(0x31).unwrap();
        assert_eq!(info.mnemonic, "MOV A");
        assert!(info.has_immediate);

        let info = command_info(0x42).unwrap();
        assert_eq!(info.mnemonic, "MOV B, A");
        assert!(!info.has_immediate);

        assert!(command_info(0x80).is_none());
        assert!(command_info(0xD7).is_none());
    }
}
