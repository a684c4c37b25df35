//! Bank-select decoding.
//!
//! The low 3 bits of RAM cell $01 select one of eight memory configurations.
//! Each configuration is a priority chain: an ordered list of regions tried
//! for a read, where the first region whose window contains the address wins
//! and RAM catches everything else.
//!
//! | bank | chain (highest priority first)      |
//! |------|-------------------------------------|
//! | 0    | RAM                                 |
//! | 1    | CHAR ROM, RAM                       |
//! | 2    | KERNAL, CHAR ROM, RAM               |
//! | 3    | BASIC, KERNAL, CHAR ROM, RAM        |
//! | 4    | RAM                                 |
//! | 5    | I/O, RAM                            |
//! | 6    | KERNAL, I/O, RAM                    |
//! | 7    | BASIC, KERNAL, I/O, RAM             |
//!
//! This approximates the PLA with a handful of ordered range checks instead
//! of a full truth table. Guest software only drives a few of these
//! configurations, which the chains reproduce exactly.

use std::ops::RangeInclusive;

/// BASIC ROM window.
pub const BASIC_WINDOW: RangeInclusive<u16> = 0xA000..=0xBFFF;
/// Character ROM / register window.
pub const IO_WINDOW: RangeInclusive<u16> = 0xD000..=0xDFFF;
/// KERNAL ROM window.
pub const KERNAL_WINDOW: RangeInclusive<u16> = 0xE000..=0xFFFF;

/// A region that can answer a bus read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// System RAM (always the final fallback).
    Ram,
    /// BASIC ROM at $A000-$BFFF.
    BasicRom,
    /// KERNAL ROM at $E000-$FFFF.
    KernalRom,
    /// Character ROM at $D000-$DFFF.
    CharRom,
    /// Register blocks and color RAM at $D000-$DFFF.
    Registers,
}

impl Source {
    /// Whether this region answers reads at `addr`.
    #[inline]
    pub fn contains(self, addr: u16) -> bool {
        match self {
            Source::Ram => true,
            Source::BasicRom => BASIC_WINDOW.contains(&addr),
            Source::KernalRom => KERNAL_WINDOW.contains(&addr),
            Source::CharRom | Source::Registers => IO_WINDOW.contains(&addr),
        }
    }
}

use Source::{BasicRom, CharRom, KernalRom, Ram, Registers};

/// Priority chain for every bank-select value, highest priority first.
pub const PRIORITY_CHAINS: [&[Source]; 8] = [
    &[Ram],
    &[CharRom, Ram],
    &[KernalRom, CharRom, Ram],
    &[BasicRom, KernalRom, CharRom, Ram],
    &[Ram],
    &[Registers, Ram],
    &[KernalRom, Registers, Ram],
    &[BasicRom, KernalRom, Registers, Ram],
];

/// The current memory configuration, decoded from RAM cell $01.
///
/// There is no separate latch: the value is taken fresh from RAM on every
/// bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankSelect(u8);

impl BankSelect {
    /// Decode a raw RAM[1] value (only bits 0-2 matter).
    #[inline]
    pub fn from_port(value: u8) -> Self {
        Self(value & 0x07)
    }

    /// Bank number 0-7.
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// The priority chain for this bank.
    #[inline]
    pub fn chain(self) -> &'static [Source] {
        PRIORITY_CHAINS[self.0 as usize]
    }

    /// The region that answers a read at `addr`.
    #[inline]
    pub fn resolve(self, addr: u16) -> Source {
        self.chain()
            .iter()
            .copied()
            .find(|source| source.contains(addr))
            .unwrap_or(Source::Ram)
    }

    /// Whether writes into $D000-$DFFF reach the register blocks.
    ///
    /// Writes use a simpler rule than reads: only the low 2 bits are checked,
    /// and when both are clear every write lands in RAM.
    #[inline]
    pub fn writes_reach_registers(self) -> bool {
        self.0 & 0x03 != 0
    }
}
