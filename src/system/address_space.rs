//! Machine memory: system RAM, color RAM, shadow I/O capture and ROMs.
//!
//! Memory Map:
//! - $0000-$0001: bank-select cell at $01 (plain RAM, no port latch)
//! - $0002-$9FFF: RAM (always)
//! - $A000-$BFFF: BASIC ROM or RAM
//! - $C000-$CFFF: RAM (always)
//! - $D000-$DFFF: registers, Character ROM, or RAM
//! - $E000-$FFFF: KERNAL ROM or RAM

use crate::config::{guest, RomSet};
use crate::devices::{BankSelect, ColorRam};

/// Start of the register window.
pub const IO_START: u16 = 0xD000;
/// Size of the register window (and of the shadow capture buffer).
pub const IO_SIZE: usize = 0x1000;

const BASIC_START: u16 = 0xA000;
const KERNAL_START: u16 = 0xE000;

/// Storage shared by the bus decoder and the rest of the machine.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    /// 64KB main RAM.
    ram: Box<[u8; 65536]>,
    /// Color RAM at $D800-$DBFF.
    color_ram: ColorRam,
    /// Every byte written into the register window, by offset from $D000.
    shadow_io: Box<[u8; IO_SIZE]>,
    roms: RomSet,
}

impl AddressSpace {
    /// Zeroed RAM with `initial_bank` in the bank-select cell.
    pub fn new(roms: RomSet, initial_bank: u8) -> Self {
        let mut ram = Box::new([0u8; 65536]);
        ram[guest::BANK_SELECT as usize] = initial_bank;

        Self {
            ram,
            color_ram: ColorRam::new(),
            shadow_io: Box::new([0; IO_SIZE]),
            roms,
        }
    }

    /// Current memory configuration, decoded from RAM[1].
    #[inline]
    pub fn bank_select(&self) -> BankSelect {
        BankSelect::from_port(self.ram[guest::BANK_SELECT as usize])
    }

    /// Read RAM directly, bypassing bank switching.
    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    /// Write RAM directly, bypassing bank switching.
    #[inline]
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
    }

    /// The whole of RAM.
    pub fn ram(&self) -> &[u8] {
        &*self.ram
    }

    /// `len` bytes of RAM starting at `start`, clamped to the top of memory.
    pub fn ram_range(&self, start: u16, len: usize) -> &[u8] {
        let start = start as usize;
        let end = (start + len).min(self.ram.len());
        &self.ram[start..end]
    }

    /// BASIC ROM byte for an address in $A000-$BFFF.
    #[inline]
    pub fn basic_rom(&self, addr: u16) -> u8 {
        self.roms.basic[(addr - BASIC_START) as usize]
    }

    /// KERNAL ROM byte for an address in $E000-$FFFF.
    #[inline]
    pub fn kernal_rom(&self, addr: u16) -> u8 {
        self.roms.kernal[(addr - KERNAL_START) as usize]
    }

    /// Character ROM byte for an address in $D000-$DFFF.
    #[inline]
    pub fn char_rom(&self, addr: u16) -> u8 {
        self.roms.characters[(addr - IO_START) as usize]
    }

    /// The glyph table used by the compositor.
    pub fn glyphs(&self) -> &[u8] {
        self.roms.characters()
    }

    /// Color RAM.
    pub fn color_ram(&self) -> &ColorRam {
        &self.color_ram
    }

    /// Color RAM (mutable).
    pub fn color_ram_mut(&mut self) -> &mut ColorRam {
        &mut self.color_ram
    }

    /// Record a register-window write. `addr` must be in $D000-$DFFF.
    #[inline]
    pub fn capture_io(&mut self, addr: u16, value: u8) {
        if let Some(cell) = self
            .shadow_io
            .get_mut(addr.wrapping_sub(IO_START) as usize)
        {
            *cell = value;
        }
    }

    /// Every byte written into the register window, indexed by `addr - $D000`.
    pub fn shadow_io(&self) -> &[u8] {
        &*self.shadow_io
    }
}
