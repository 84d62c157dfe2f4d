//! TD4 machine state.
//!
//! The TD4 is about as small as a stored-program computer gets:
//! - 16 bytes of program memory (only the low nibble of each byte is
//!   architecturally meaningful, but the full byte is stored as loaded)
//! - A, B: 4-bit general registers
//! - C: 1-bit carry flag
//! - PC: 4-bit program counter
//! - IN, OUT: 4-bit latched input/output port lines

use serde::{Deserialize, Serialize};

/// The number of memory cells (= addressable program words) in the TD4.
pub const MEMORY_SIZE: usize = 16;

/// Mask for the 4-bit address/register space.
pub const NIBBLE_MASK: u8 = 0x0F;

/// The complete TD4 machine state.
///
/// All registers live in `u8` containers; correct execution never produces
/// values above 15 in them. The control loop owns the single instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    memory: [u8; MEMORY_SIZE],

    /// A register (4-bit).
    pub a: u8,

    /// B register (4-bit).
    pub b: u8,

    /// Carry flag, 0 or 1. Driven by the adder; every non-jump
    /// instruction writes it.
    pub carry: u8,

    /// Program counter, always in 0..=15.
    pub pc: u8,

    /// Latched input port value (4-bit).
    pub in_line: u8,

    /// Latched output port value (4-bit).
    pub out_line: u8,
}

impl Machine {
    /// Create a zero-initialized machine.
    pub const fn new() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            a: 0,
            b: 0,
            carry: 0,
            pc: 0,
            in_line: 0,
            out_line: 0,
        }
    }

    /// Reset everything (registers, flag, PC, port lines, memory) to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Copy a program image into memory starting at address 0.
    ///
    /// At most [`MEMORY_SIZE`] bytes are taken; anything beyond is ignored.
    /// A shorter image leaves the tail of memory untouched, so callers
    /// wanting a cold start reset first.
    pub fn load_image(&mut self, image: &[u8]) {
        let len = image.len().min(MEMORY_SIZE);
        self.memory[..len].copy_from_slice(&image[..len]);
    }

    /// Fetch the instruction byte at the current PC.
    #[inline]
    pub fn fetch(&self) -> u8 {
        self.memory[self.pc as usize & (MEMORY_SIZE - 1)]
    }

    /// Read a memory cell by address (0-15).
    ///
    /// # Panics
    /// Panics if the address is out of range.
    #[inline]
    pub fn read(&self, addr: usize) -> u8 {
        assert!(
            addr < MEMORY_SIZE,
            "Memory address {} out of range (0-{})",
            addr,
            MEMORY_SIZE - 1
        );
        self.memory[addr]
    }

    /// Write a memory cell by address (0-15).
    ///
    /// # Panics
    /// Panics if the address is out of range.
    #[inline]
    pub fn write(&mut self, addr: usize, value: u8) {
        assert!(
            addr < MEMORY_SIZE,
            "Memory address {} out of range (0-{})",
            addr,
            MEMORY_SIZE - 1
        );
        self.memory[addr] = value;
    }

    /// Latch a value onto the input port line (low nibble only).
    pub fn set_input(&mut self, value: u8) {
        self.in_line = value & NIBBLE_MASK;
    }

    /// Advance the program counter by one with 4-bit wraparound.
    #[inline]
    pub fn advance_pc(&mut self) {
        self.pc = (self.pc + 1) & NIBBLE_MASK;
    }

    /// Load a jump target into the program counter.
    ///
    /// Targets are 4-bit immediates, inherently in range.
    #[inline]
    pub fn jump(&mut self, target: u8) {
        self.pc = target & NIBBLE_MASK;
    }

    /// View of the full 16-byte memory image.
    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.memory
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("pc", &self.pc)
            .field("a", &self.a)
            .field("b", &self.b)
            .field("carry", &self.carry)
            .field("in_line", &self.in_line)
            .field("out_line", &self.out_line)
            .finish()
    }
}
