//! Bus decoder.
//!
//! Reads follow the priority chain selected by RAM[1] (see
//! [`crate::devices::bank_select`]). When the chain lands on the register
//! window, the address is sub-decoded:
//!
//! | range         | target       | mirror   |
//! |---------------|--------------|----------|
//! | $D000-$D3FF   | VIC-II       | 64 bytes |
//! | $D400-$D7FF   | SID          | 32 bytes |
//! | $D800-$DBFF   | Color RAM    | none     |
//! | $DC00-$DCFF   | CIA1         | 16 bytes |
//! | $DD00-$DDFF   | CIA2         | 16 bytes |
//! | $DE00-$DFFF   | unmapped     |          |
//!
//! Writes use a simpler rule. If the low 2 bits of the bank select are
//! clear, or the address is outside $D000-$DFFF, the byte goes to RAM.
//! Otherwise it is recorded in the shadow I/O buffer and then handed to the
//! register block for its range.

use super::address_space::{AddressSpace, IO_START};
use super::palette;
use crate::config::{MachineConfig, RomSet};
use crate::devices::bank_select::IO_WINDOW;
use crate::devices::{
    Cia6526, ColorRam, RegisterBlock, RegisterRead, RegisterWrite, Sid6581, Source, VicII,
};

/// Backdrop gradient top color before the guest sets a background.
pub const BACKDROP_TOP: u32 = 0xFFCC_DD22;
/// Backdrop gradient bottom color before the guest sets a background.
pub const BACKDROP_BOTTOM: u32 = 0xFFC0_D020;

/// The layer drawn underneath the text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    /// Vertical gradient from `top` to `bottom`.
    Gradient { top: u32, bottom: u32 },
    /// A single ARGB color.
    Solid(u32),
}

impl Default for Backdrop {
    fn default() -> Self {
        Backdrop::Gradient {
            top: BACKDROP_TOP,
            bottom: BACKDROP_BOTTOM,
        }
    }
}

/// Sub-range of the register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoRegion {
    Vic,
    Sid,
    ColorRam,
    Cia1,
    Cia2,
    /// $DE00-$DFFF: no handler.
    Unmapped,
}

impl IoRegion {
    /// Sub-decode an address; `None` outside $D000-$DFFF.
    pub fn decode(addr: u16) -> Option<Self> {
        match addr {
            0xD000..=0xD3FF => Some(IoRegion::Vic),
            0xD400..=0xD7FF => Some(IoRegion::Sid),
            0xD800..=0xDBFF => Some(IoRegion::ColorRam),
            0xDC00..=0xDCFF => Some(IoRegion::Cia1),
            0xDD00..=0xDDFF => Some(IoRegion::Cia2),
            0xDE00..=0xDFFF => Some(IoRegion::Unmapped),
            _ => None,
        }
    }
}

fn read_block(block: &dyn RegisterBlock, addr: u16) -> RegisterRead {
    block.read(addr & block.mirror_mask())
}

fn write_block(block: &mut dyn RegisterBlock, addr: u16, value: u8) -> RegisterWrite {
    block.write(addr & block.mirror_mask(), value)
}

/// The machine's memory bus.
#[derive(Debug, Clone)]
pub struct C64Bus {
    space: AddressSpace,
    vic: VicII,
    sid: Sid6581,
    cia1: Cia6526,
    cia2: Cia6526,
    backdrop: Backdrop,
}

impl C64Bus {
    /// Power-on bus: cleared RAM, bank select from `config.initial_bank`.
    pub fn new(roms: RomSet, config: &MachineConfig) -> Self {
        Self {
            space: AddressSpace::new(roms, config.initial_bank),
            vic: VicII::new(),
            sid: Sid6581::new(),
            cia1: Cia6526::new_cia1(),
            cia2: Cia6526::new_cia2(),
            backdrop: Backdrop::default(),
        }
    }

    /// Read a byte as the CPU sees it.
    pub fn read(&self, addr: u16) -> u8 {
        match self.space.bank_select().resolve(addr) {
            Source::Ram => self.space.peek(addr),
            Source::BasicRom => self.space.basic_rom(addr),
            Source::KernalRom => self.space.kernal_rom(addr),
            Source::CharRom => self.space.char_rom(addr),
            Source::Registers => self.read_register(addr).value(),
        }
    }

    /// Read from the register window, reporting how the value was produced.
    ///
    /// Unlike [`C64Bus::read`] this ignores the bank select.
    pub fn read_register(&self, addr: u16) -> RegisterRead {
        match IoRegion::decode(addr) {
            Some(IoRegion::Vic) => read_block(&self.vic, addr),
            Some(IoRegion::Sid) => read_block(&self.sid, addr),
            Some(IoRegion::ColorRam) => read_block(self.space.color_ram(), addr),
            Some(IoRegion::Cia1) => read_block(&self.cia1, addr),
            Some(IoRegion::Cia2) => read_block(&self.cia2, addr),
            Some(IoRegion::Unmapped) | None => {
                log::warn!("Unhandled hardware read at ${:04X}", addr);
                RegisterRead::Unhandled(self.space.peek(addr))
            }
        }
    }

    /// Write a byte as the CPU does.
    pub fn write(&mut self, addr: u16, value: u8) {
        if !self.space.bank_select().writes_reach_registers() || !IO_WINDOW.contains(&addr) {
            self.space.poke(addr, value);
            return;
        }

        self.space.capture_io(addr, value);

        let effect = match IoRegion::decode(addr) {
            Some(IoRegion::Vic) => write_block(&mut self.vic, addr, value),
            Some(IoRegion::Sid) => write_block(&mut self.sid, addr, value),
            Some(IoRegion::ColorRam) => write_block(self.space.color_ram_mut(), addr, value),
            Some(IoRegion::Cia1) => write_block(&mut self.cia1, addr, value),
            Some(IoRegion::Cia2) => write_block(&mut self.cia2, addr, value),
            Some(IoRegion::Unmapped) => {
                log::warn!(
                    "Unhandled hardware write ${:02X} to ${:04X}",
                    value,
                    addr
                );
                RegisterWrite::Ignored
            }
            None => unreachable!("register write outside $D000-$DFFF: ${:04X}", addr),
        };

        if let RegisterWrite::Backdrop(code) = effect {
            self.backdrop = Backdrop::Solid(palette::color(code));
            log::debug!("Background color 0 set to {}", code);
        }
    }

    /// The current display backdrop.
    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    /// Read RAM directly, bypassing bank switching.
    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        self.space.peek(addr)
    }

    /// Write RAM directly, bypassing bank switching.
    #[inline]
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.space.poke(addr, value);
    }

    /// Machine memory.
    pub fn address_space(&self) -> &AddressSpace {
        &self.space
    }

    /// Color RAM.
    pub fn color_ram(&self) -> &ColorRam {
        self.space.color_ram()
    }

    /// Every byte written into the register window, indexed by `addr - $D000`.
    pub fn shadow_io(&self) -> &[u8] {
        self.space.shadow_io()
    }

    /// Shadow capture for one register address.
    pub fn shadow_byte(&self, addr: u16) -> Option<u8> {
        self.space
            .shadow_io()
            .get(addr.wrapping_sub(IO_START) as usize)
            .copied()
    }

    /// CIA1 register block.
    pub fn cia1(&self) -> &Cia6526 {
        &self.cia1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::palette::PALETTE;

    fn bus() -> C64Bus {
        let basic = vec![0xBB; 8192];
        let kernal = vec![0xEE; 8192];
        let chars = vec![0xCC; 4096];
        let roms = RomSet::new(&basic, &kernal, &chars).unwrap();
        C64Bus::new(roms, &MachineConfig::default())
    }

    #[test]
    fn test_default_bank_reads() {
        let mut bus = bus();
        bus.poke(0xA000, 0x11);
        bus.poke(0x0400, 0x22);

        assert_eq!(bus.read(0xA000), 0xBB);
        assert_eq!(bus.read(0xE000), 0xEE);
        assert_eq!(bus.read(0x0400), 0x22);
        // $DC0D reads the interrupt stub
        assert_eq!(bus.read(0xDC0D), 1);
    }

    #[test]
    fn test_rom_shadowed_ram_is_writable() {
        let mut bus = bus();
        bus.write(0xA000, 0x42);
        assert_eq!(bus.read(0xA000), 0xBB);
        assert_eq!(bus.peek(0xA000), 0x42);

        // Switching BASIC out exposes the RAM underneath
        bus.write(0x0001, 0x06);
        assert_eq!(bus.read(0xA000), 0x42);
    }

    #[test]
    fn test_char_rom_visible_in_bank_1() {
        let mut bus = bus();
        bus.write(0x0001, 0x01);
        assert_eq!(bus.read(0xD000), 0xCC);
        assert_eq!(bus.read(0xDFFF), 0xCC);
    }

    #[test]
    fn test_color_ram_write() {
        let mut bus = bus();
        bus.write(0xD800, 0xF3);
        assert_eq!(bus.color_ram().get(0), 0x03);
        assert_eq!(bus.read(0xD800), 0x03);
        assert_eq!(bus.peek(0xD800), 0);
        assert_eq!(bus.shadow_byte(0xD800), Some(0xF3));
    }

    #[test]
    fn test_register_writes_disabled() {
        let mut bus = bus();
        bus.write(0x0001, 0x04);
        bus.write(0xD021, 0x02);
        bus.write(0xD800, 0xAB);

        assert_eq!(bus.peek(0xD021), 0x02);
        assert_eq!(bus.peek(0xD800), 0xAB);
        assert_eq!(bus.backdrop(), Backdrop::default());
        assert_eq!(bus.color_ram().get(0), 0);
        assert_eq!(bus.shadow_byte(0xD021), Some(0));
    }

    #[test]
    fn test_background_write_sets_backdrop() {
        let mut bus = bus();
        bus.write(0xD021, 0x16);
        assert_eq!(bus.backdrop(), Backdrop::Solid(PALETTE[6]));

        // Mirrored every 64 bytes
        bus.write(0xD061, 0x02);
        assert_eq!(bus.backdrop(), Backdrop::Solid(PALETTE[2]));
    }

    #[test]
    fn test_cia_ports_mirrored() {
        let mut bus = bus();
        bus.write(0xDC00, 0x7F);
        assert_eq!(bus.read(0xDC10), 0x7F);
        assert_eq!(bus.read_register(0xDCF0), RegisterRead::Live(0x7F));
        assert_eq!(bus.cia1().port_a.data, 0x7F);

        // Writes fold through the same mirror
        bus.write(0xDC12, 0xFF);
        assert_eq!(bus.cia1().port_a.ddr, 0xFF);

        // CIA2 keeps nothing
        bus.write(0xDD00, 0x03);
        assert_eq!(bus.read(0xDD00), 0);
        assert_eq!(bus.shadow_byte(0xDD00), Some(0x03));
    }

    #[test]
    fn test_read_kinds() {
        let bus = bus();
        assert_eq!(bus.read_register(0xD418), RegisterRead::Unimplemented);
        assert_eq!(bus.read_register(0xD030), RegisterRead::Stub(0xFF));
        assert_eq!(bus.read_register(0xD012), RegisterRead::Stub(0));
    }

    #[test]
    fn test_unmapped_reads_fall_back_to_ram() {
        let mut bus = bus();
        bus.poke(0xDE00, 0x5A);
        assert_eq!(bus.read(0xDE00), 0x5A);
        assert_eq!(bus.read_register(0xDE00), RegisterRead::Unhandled(0x5A));
        assert!(!bus.read_register(0xDE00).is_live());

        // Writes are captured but change nothing else
        bus.write(0xDF00, 0x99);
        assert_eq!(bus.peek(0xDF00), 0);
        assert_eq!(bus.shadow_byte(0xDF00), Some(0x99));
    }

    #[test]
    fn test_io_region_decode() {
        assert_eq!(IoRegion::decode(0xCFFF), None);
        assert_eq!(IoRegion::decode(0xD000), Some(IoRegion::Vic));
        assert_eq!(IoRegion::decode(0xD7FF), Some(IoRegion::Sid));
        assert_eq!(IoRegion::decode(0xDBFF), Some(IoRegion::ColorRam));
        assert_eq!(IoRegion::decode(0xDCFF), Some(IoRegion::Cia1));
        assert_eq!(IoRegion::decode(0xDD80), Some(IoRegion::Cia2));
        assert_eq!(IoRegion::decode(0xDE00), Some(IoRegion::Unmapped));
        assert_eq!(IoRegion::decode(0xE000), None);
    }
}
