//! C64 register blocks and memory-mapped helpers.
//!
//! Each block covers one region of the $D000-$DFFF window:
//!
//! - [`VicII`]: video controller registers ($D000-$D3FF, 64-byte mirror)
//! - [`Sid6581`]: sound controller registers ($D400-$D7FF, 32-byte mirror)
//! - [`Cia6526`]: I/O-timer registers ($DC00-$DCFF and $DD00-$DDFF, 16-byte mirror)
//! - [`ColorRam`]: 1KB of 4-bit color memory ($D800-$DBFF, not mirrored)
//!
//! The register blocks only model what BASIC needs. Reads report whether the
//! value came from live state, a fixed stub, a register with no handler, or
//! an address no block covers, so callers can tell "returns 0" apart from
//! "not implemented".

pub mod bank_select;
pub mod cia;
mod color_ram;
pub mod sid;
pub mod vic_ii;

pub use bank_select::{BankSelect, Source, PRIORITY_CHAINS};
pub use cia::{Cia6526, CiaPort, CiaType};
pub use color_ram::{ColorRam, COLOR_RAM_SIZE};
pub use sid::Sid6581;
pub use vic_ii::VicII;

/// Outcome of reading one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRead {
    /// Value backed by state the block keeps.
    Live(u8),
    /// Fixed value of a register whose behavior is not modeled.
    Stub(u8),
    /// No handler exists for this register; the bus sees 0.
    Unimplemented,
    /// No register block covers the address; carries the RAM byte underneath.
    Unhandled(u8),
}

impl RegisterRead {
    /// The byte the CPU observes.
    #[inline]
    pub fn value(self) -> u8 {
        match self {
            RegisterRead::Live(v) | RegisterRead::Stub(v) | RegisterRead::Unhandled(v) => v,
            RegisterRead::Unimplemented => 0,
        }
    }

    /// Whether the register is backed by live state.
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, RegisterRead::Live(_))
    }
}

/// Outcome of writing one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWrite {
    /// The block stored the value.
    Stored,
    /// Accepted with no effect beyond the shadow capture.
    Ignored,
    /// Background color 0 changed; carries the 4-bit color index.
    Backdrop(u8),
}

/// A memory-mapped group of hardware registers.
///
/// Like a bus device, a block is addressed by offset rather than absolute
/// address. The bus folds the address with [`RegisterBlock::mirror_mask`]
/// before calling `read`/`write`, so offsets are always in range.
pub trait RegisterBlock {
    /// Short block name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Mask applied to the address to produce the register offset.
    fn mirror_mask(&self) -> u16;

    /// Read the register at `offset`.
    fn read(&self, offset: u16) -> RegisterRead;

    /// Write the register at `offset`.
    fn write(&mut self, offset: u16, value: u8) -> RegisterWrite;
}
