//! CPU execution engine for the TD4.
//!
//! Implements the fetch-decode-execute cycle for all 16 high nibbles.
//! Execution is total: there is no error path, because the hardware has
//! none. Unassigned opcodes burn a cycle and advance the PC, nothing else.

use crate::cpu::decode::{self, Opcode};
use crate::cpu::machine::{Machine, NIBBLE_MASK};
use serde::{Deserialize, Serialize};

/// The TD4 CPU: machine state plus a cycle counter.
#[derive(Clone, Serialize, Deserialize)]
pub struct Emulator {
    /// Machine state (registers, flag, PC, memory, port lines).
    pub machine: Machine,
    /// Executed instruction count.
    pub cycles: u64,
}

impl Emulator {
    /// Create a new emulator with zeroed state.
    pub fn new() -> Self {
        Self {
            machine: Machine::new(),
            cycles: 0,
        }
    }

    /// Create an emulator with a program image already loaded.
    pub fn with_image(image: &[u8]) -> Self {
        let mut emu = Self::new();
        emu.machine.load_image(image);
        emu
    }

    /// Reset to power-on state: zeroed machine, cycle counter back to 0.
    ///
    /// Does not reload a program; the caller decides what image to load
    /// into the cleared memory.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.cycles = 0;
    }

    /// Execute a single instruction.
    ///
    /// Fetches `memory[PC]` before any mutation, decodes, executes and
    /// bumps the cycle counter. Returns the executed opcode. Total over
    /// all 256 byte values; never fails.
    pub fn step(&mut self) -> Opcode {
        let op = decode::decode(self.machine.fetch());
        self.execute(op);
        self.cycles += 1;
        op
    }

    /// Run for `max_cycles` instructions.
    ///
    /// The TD4 has no halt instruction, so the cap is the only terminator.
    pub fn run(&mut self, max_cycles: u64) {
        for _ in 0..max_cycles {
            self.step();
        }
    }

    /// Apply a decoded instruction to the machine state.
    ///
    /// Every defined non-jump opcode writes the carry flag: only the adder
    /// can set it, everything else latches 0. That is how the real chip's
    /// flag register behaves, so IN and MOV clear C too.
    fn execute(&mut self, op: Opcode) {
        let m = &mut self.machine;
        match op {
            Opcode::AddA(im) => {
                let result = m.a as u16 + im as u16;
                m.a = (result as u8) & NIBBLE_MASK;
                m.carry = u8::from(result > 0x0F);
                m.advance_pc();
            }
            Opcode::MovAB => {
                m.a = m.b;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::InA => {
                m.a = m.in_line;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::MovA(im) => {
                m.a = im;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::MovBA => {
                m.b = m.a;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::AddB(im) => {
                let result = m.b as u16 + im as u16;
                m.b = (result as u8) & NIBBLE_MASK;
                m.carry = u8::from(result > 0x0F);
                m.advance_pc();
            }
            Opcode::InB => {
                m.b = m.in_line;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::MovB(im) => {
                m.b = im;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::OutB => {
                m.out_line = m.b;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::Out(im) => {
                m.out_line = im;
                m.carry = 0;
                m.advance_pc();
            }
            Opcode::Jnc(im) => {
                if m.carry == 0 {
                    m.jump(im);
                } else {
                    m.advance_pc();
                }
            }
            Opcode::Jmp(im) => {
                m.jump(im);
            }
            Opcode::Unknown(_) => {
                m.advance_pc();
            }
        }
    }

}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulator")
            .field("cycles", &self.cycles)
            .field("machine", &self.machine)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::encode;
    use proptest::prelude::*;

    fn make_program(ops: &[Opcode]) -> Vec<u8> {
        ops.iter().map(encode).collect()
    }

    fn state_in_range(m: &Machine) -> bool {
        m.pc < 16 && m.a < 16 && m.b < 16 && m.in_line < 16 && m.out_line < 16 && m.carry < 2
    }

    #[test]
    fn test_mov_and_out() {
        let mut emu = Emulator::with_image(&make_program(&[
            Opcode::MovA(7),
            Opcode::MovBA,
            Opcode::OutB,
        ]));
        emu.run(3);
        assert_eq!(emu.machine.a, 7);
        assert_eq!(emu.machine.b, 7);
        assert_eq!(emu.machine.out_line, 7);
        assert_eq!(emu.machine.pc, 3);
        assert_eq!(emu.cycles, 3);
    }

    #[test]
    fn test_add_sets_carry_on_overflow() {
        let mut emu = Emulator::with_image(&make_program(&[
            Opcode::MovA(9),
            Opcode::AddA(8),
        ]));
        emu.run(2);
        assert_eq!(emu.machine.a, 1); // 17 mod 16
        assert_eq!(emu.machine.carry, 1);
    }

    #[test]
    fn test_mov_clears_carry() {
        // Hardware-faithful: the flag latch is written by every defined
        // non-jump instruction, MOV included.
        let mut emu = Emulator::with_image(&make_program(&[
            Opcode::MovA(15),
            Opcode::AddA(1),  // sets C
            Opcode::MovB(0),  // clears C
        ]));
        emu.run(2);
        assert_eq!(emu.machine.carry, 1);
        emu.step();
        assert_eq!(emu.machine.carry, 0);
    }

    #[test]
    fn test_jnc_preserves_carry() {
        let mut emu = Emulator::with_image(&make_program(&[
            Opcode::MovA(15),
            Opcode::AddA(1),  // C = 1
            Opcode::Jnc(0),   // not taken
        ]));
        emu.run(3);
        assert_eq!(emu.machine.carry, 1);
        assert_eq!(emu.machine.pc, 3);
    }

    #[test]
    fn test_jnc_taken_when_carry_clear() {
        let mut emu = Emulator::with_image(&make_program(&[Opcode::Jnc(9)]));
        emu.step();
        assert_eq!(emu.machine.pc, 9);
        assert_eq!(emu.machine.carry, 0);
    }

    #[test]
    fn test_jmp() {
        let mut emu = Emulator::with_image(&make_program(&[Opcode::Jmp(12)]));
        emu.step();
        assert_eq!(emu.machine.pc, 12);
    }

    #[test]
    fn test_pc_wraps_at_end_of_memory() {
        let mut emu = Emulator::new();
        emu.machine.pc = 15;
        emu.machine.write(15, 0x30); // MOV A, 0
        emu.step();
        assert_eq!(emu.machine.pc, 0);
    }

    #[test]
    fn test_unknown_opcode_is_noop_advance() {
        let mut emu = Emulator::new();
        emu.machine.a = 3;
        emu.machine.b = 5;
        emu.machine.carry = 1;
        emu.machine.in_line = 2;
        emu.machine.out_line = 7;
        emu.machine.write(0, 0x80);
        let op = emu.step();
        assert_eq!(op, Opcode::Unknown(0x80));
        assert_eq!(emu.machine.a, 3);
        assert_eq!(emu.machine.b, 5);
        assert_eq!(emu.machine.carry, 1);
        assert_eq!(emu.machine.in_line, 2);
        assert_eq!(emu.machine.out_line, 7);
        assert_eq!(emu.machine.pc, 1);
    }

    #[test]
    fn test_in_reads_latched_input() {
        let mut emu = Emulator::with_image(&make_program(&[Opcode::InA, Opcode::InB]));
        emu.machine.set_input(11);
        emu.run(2);
        assert_eq!(emu.machine.a, 11);
        assert_eq!(emu.machine.b, 11);
    }

    #[test]
    fn test_reset_then_reload_matches_fresh_start() {
        let image = [0x31u8, 0xB5, 0xF0];
        let mut emu = Emulator::with_image(&image);
        emu.run(7);
        emu.reset();
        emu.machine.load_image(&image);
        assert_eq!(emu.machine, Emulator::with_image(&image).machine);
        assert_eq!(emu.cycles, 0);
    }

    #[test]
    fn test_end_to_end_out_loop() {
        // MOV A, 1; OUT 5; JMP 0
        let mut emu = Emulator::with_image(&[0x31, 0xB5, 0xF0]);

        emu.step();
        assert_eq!(emu.machine.a, 1);
        assert_eq!(emu.machine.pc, 1);

        emu.step();
        assert_eq!(emu.machine.out_line, 5);
        assert_eq!(emu.machine.pc, 2);

        emu.step();
        assert_eq!(emu.machine.pc, 0);
        assert_eq!(emu.machine.a, 1);
        assert_eq!(emu.machine.out_line, 5);
    }

    proptest! {
        #[test]
        fn prop_step_total_and_in_range(byte in any::<u8>(), pc in 0u8..16, a in 0u8..16,
                                        b in 0u8..16, carry in 0u8..2, input in 0u8..16) {
            let mut emu = Emulator::new();
            emu.machine.pc = pc;
            emu.machine.a = a;
            emu.machine.b = b;
            emu.machine.carry = carry;
            emu.machine.set_input(input);
            emu.machine.write(pc as usize, byte);
            emu.step();
            prop_assert!(state_in_range(&emu.machine));
        }

        #[test]
        fn prop_add_flag_law(a in 0u8..16, im in 0u8..16) {
            let mut emu = Emulator::new();
            emu.machine.a = a;
            emu.machine.write(0, encode(&Opcode::AddA(im)));
            emu.step();
            prop_assert_eq!(emu.machine.a, (a + im) % 16);
            prop_assert_eq!(emu.machine.carry, u8::from(a as u16 + im as u16 > 15));
        }

        #[test]
        fn prop_jnc_law(pc in 0u8..16, im in 0u8..16, carry in 0u8..2) {
            let mut emu = Emulator::new();
            emu.machine.pc = pc;
            emu.machine.carry = carry;
            emu.machine.write(pc as usize, encode(&Opcode::Jnc(im)));
            emu.step();
            if carry == 0 {
                prop_assert_eq!(emu.machine.pc, im);
            } else {
                prop_assert_eq!(emu.machine.pc, (pc + 1) % 16);
            }
            prop_assert_eq!(emu.machine.carry, carry);
        }
    }
}
