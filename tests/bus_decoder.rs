//! Integration test: bank-switched address decoding on the C64 bus.
//!
//! Each ROM image is filled with its own marker byte so a read shows which
//! source answered it.

use c64_basic::system::PALETTE;
use c64_basic::{guest, Backdrop, C64Bus, MachineConfig, RegisterRead, RomSet};

const BASIC_MARK: u8 = 0xBA;
const KERNAL_MARK: u8 = 0xEE;
const CHAR_MARK: u8 = 0xCC;
const RAM_MARK: u8 = 0x5A;

/// Addresses probed in every bank: one per window plus plain RAM.
const PROBES: [u16; 5] = [0x8000, 0xA000, 0xD020, 0xD800, 0xE000];

fn marked_bus() -> C64Bus {
    let roms = RomSet::new(
        &[BASIC_MARK; 8192],
        &[KERNAL_MARK; 8192],
        &[CHAR_MARK; 4096],
    )
    .unwrap();
    let mut bus = C64Bus::new(roms, &MachineConfig::default());
    for addr in PROBES {
        bus.poke(addr, RAM_MARK);
    }
    bus
}

fn select_bank(bus: &mut C64Bus, bank: u8) {
    bus.poke(guest::BANK_SELECT, bank);
}

#[test]
fn test_every_bank_resolves_by_priority() {
    // Expected bytes for PROBES in banks 0-7. The register window reads the
    // VIC stub (0) at $D020 and color RAM (0 at power-on) at $D800.
    let expected: [[u8; 5]; 8] = [
        [RAM_MARK, RAM_MARK, RAM_MARK, RAM_MARK, RAM_MARK],
        [RAM_MARK, RAM_MARK, CHAR_MARK, CHAR_MARK, RAM_MARK],
        [RAM_MARK, RAM_MARK, CHAR_MARK, CHAR_MARK, KERNAL_MARK],
        [RAM_MARK, BASIC_MARK, CHAR_MARK, CHAR_MARK, KERNAL_MARK],
        [RAM_MARK, RAM_MARK, RAM_MARK, RAM_MARK, RAM_MARK],
        [RAM_MARK, RAM_MARK, 0x00, 0x00, RAM_MARK],
        [RAM_MARK, RAM_MARK, 0x00, 0x00, KERNAL_MARK],
        [RAM_MARK, BASIC_MARK, 0x00, 0x00, KERNAL_MARK],
    ];

    let mut bus = marked_bus();
    for (bank, row) in expected.iter().enumerate() {
        select_bank(&mut bus, bank as u8);
        for (addr, &want) in PROBES.iter().zip(row) {
            assert_eq!(
                bus.read(*addr),
                want,
                "bank {} address ${:04X}",
                bank,
                addr
            );
        }
    }
}

#[test]
fn test_upper_bank_bits_ignored() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 0xF8 | 3);
    assert_eq!(bus.read(0xA000), BASIC_MARK);
    assert_eq!(bus.read(0xD020), CHAR_MARK);
}

#[test]
fn test_window_edges() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);
    bus.poke(0x9FFF, 0x11);
    bus.poke(0xC000, 0x22);
    bus.poke(0xCFFF, 0x33);

    assert_eq!(bus.read(0x9FFF), 0x11);
    assert_eq!(bus.read(0xBFFF), BASIC_MARK);
    assert_eq!(bus.read(0xC000), 0x22);
    assert_eq!(bus.read(0xCFFF), 0x33);
    assert_eq!(bus.read(0xFFFF), KERNAL_MARK);
}

#[test]
fn test_color_ram_keeps_low_nibble() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);

    bus.write(0xD800, 0xAB);
    assert_eq!(bus.read(0xD800), 0x0B);
    assert_eq!(bus.read_register(0xD800), RegisterRead::Live(0x0B));

    bus.write(0xDBE7, 0x1F);
    assert_eq!(bus.read(0xDBE7), 0x0F);

    // RAM underneath is untouched
    assert_eq!(bus.peek(0xD800), RAM_MARK);
}

#[test]
fn test_writes_land_in_ram_when_registers_disabled() {
    for bank in [0u8, 4] {
        let mut bus = marked_bus();
        select_bank(&mut bus, bank);

        bus.write(0xD021, 0x02);
        bus.write(0xD800, 0x07);

        assert_eq!(bus.peek(0xD021), 0x02, "bank {}", bank);
        assert_eq!(bus.peek(0xD800), 0x07, "bank {}", bank);
        assert_eq!(bus.backdrop(), Backdrop::default(), "bank {}", bank);
        assert_eq!(bus.color_ram().get(0), 0, "bank {}", bank);
    }
}

#[test]
fn test_writes_reach_registers_when_reads_see_char_rom() {
    // Bank 3 reads the character ROM, but writes still hit the registers
    let mut bus = marked_bus();
    select_bank(&mut bus, 3);

    bus.write(0xD021, 0x04);
    assert_eq!(bus.backdrop(), Backdrop::Solid(PALETTE[4]));
    assert_eq!(bus.read(0xD021), CHAR_MARK);
    assert_eq!(bus.peek(0xD021), 0);
}

#[test]
fn test_rom_windows_write_through_to_ram() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);

    bus.write(0xA000, 0x42);
    bus.write(0xE000, 0x43);
    assert_eq!(bus.read(0xA000), BASIC_MARK);
    assert_eq!(bus.read(0xE000), KERNAL_MARK);

    select_bank(&mut bus, 0);
    assert_eq!(bus.read(0xA000), 0x42);
    assert_eq!(bus.read(0xE000), 0x43);
}

#[test]
fn test_background_register_every_value() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);

    for value in 0..=255u8 {
        bus.write(0xD021, value);
        assert_eq!(
            bus.backdrop(),
            Backdrop::Solid(PALETTE[(value & 0x0F) as usize]),
            "value ${:02X}",
            value
        );
    }
}

#[test]
fn test_background_register_mirrors() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);

    // $D061 mirrors $D021 within the 64-byte VIC window
    bus.write(0xD061, 0x03);
    assert_eq!(bus.backdrop(), Backdrop::Solid(PALETTE[3]));

    // Border color is not the background
    bus.write(0xD020, 0x05);
    assert_eq!(bus.backdrop(), Backdrop::Solid(PALETTE[3]));
}

#[test]
fn test_register_reads_report_their_kind() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);

    assert_eq!(bus.read_register(0xD011), RegisterRead::Stub(0x00));
    assert_eq!(bus.read_register(0xD03F), RegisterRead::Stub(0xFF));
    assert_eq!(bus.read_register(0xD418), RegisterRead::Unimplemented);
    assert_eq!(bus.read_register(0xDC0D), RegisterRead::Stub(0x01));
    assert_eq!(bus.read_register(0xDD00), RegisterRead::Stub(0x00));

    // Modeled state is the only live kind
    bus.write(0xDC00, 0x00);
    assert!(bus.read_register(0xDC00).is_live());

    // Unmapped expansion area falls back to RAM, flagged as unhandled
    bus.poke(0xDE00, 0x77);
    let unmapped = bus.read_register(0xDE00);
    assert_eq!(unmapped, RegisterRead::Unhandled(0x77));
    assert_eq!(unmapped.value(), 0x77);
    assert!(!unmapped.is_live());
}

#[test]
fn test_register_writes_are_captured() {
    let mut bus = marked_bus();
    select_bank(&mut bus, 7);

    bus.write(0xD418, 0x0F);
    bus.write(0xDE10, 0x99);
    assert_eq!(bus.shadow_byte(0xD418), Some(0x0F));
    assert_eq!(bus.shadow_byte(0xDE10), Some(0x99));
    assert_eq!(bus.shadow_byte(0x0400), None);

    // Shadowed writes never reach RAM
    assert_eq!(bus.peek(0xD418), 0);
    assert_eq!(bus.peek(0xDE10), 0);
}
