//! VIC-II (MOS 6569) video register block.
//!
//! Only the register surface is modeled. The 47 registers at $D000-$D02E
//! read back as 0 and the unused slots $D02F-$D03F read as $FF; the block
//! repeats every 64 bytes up to $D3FF.
//!
//! The one register with an observable effect is background color 0
//! ($D021): writing it recolors the display backdrop.

use super::{RegisterBlock, RegisterRead, RegisterWrite};

/// VIC-II register count (47 registers at $D000-$D02E).
pub const VIC_REGISTER_COUNT: usize = 47;

/// Background color 0 register offset.
pub const BACKGROUND_COLOR_0: u16 = 0x21;

/// Register names, indexed by offset.
const REGISTER_NAMES: [&str; VIC_REGISTER_COUNT] = [
    "X-coord sprite 0",
    "Y-coord sprite 0",
    "X-coord sprite 1",
    "Y-coord sprite 1",
    "X-coord sprite 2",
    "Y-coord sprite 2",
    "X-coord sprite 3",
    "Y-coord sprite 3",
    "X-coord sprite 4",
    "Y-coord sprite 4",
    "X-coord sprite 5",
    "Y-coord sprite 5",
    "X-coord sprite 6",
    "Y-coord sprite 6",
    "X-coord sprite 7",
    "Y-coord sprite 7",
    "MSBs of X-coords",
    "Control register 1",
    "Raster row counter",
    "Light pen X",
    "Light pen Y",
    "Sprite enabled",
    "Control register 2",
    "Sprite Y expansion",
    "Memory pointers",
    "Interrupt register",
    "Interrupt enabled",
    "Sprite data priority",
    "Sprite multicolor",
    "Sprite X expansion",
    "Sprite-sprite collision",
    "Sprite-data collision",
    "Border color",
    "Background color 0",
    "Background color 1",
    "Background color 2",
    "Background color 3",
    "Sprite multicolor 0",
    "Sprite multicolor 1",
    "Sprite 0 color",
    "Sprite 1 color",
    "Sprite 2 color",
    "Sprite 3 color",
    "Sprite 4 color",
    "Sprite 5 color",
    "Sprite 6 color",
    "Sprite 7 color",
];

/// Name of the register at `offset` (already folded into 0-63).
pub fn register_name(offset: u16) -> &'static str {
    REGISTER_NAMES
        .get(offset as usize)
        .copied()
        .unwrap_or("Unused")
}

/// MOS 6569 video register block.
///
/// Holds no state: the background color lives in the bus backdrop.
#[derive(Debug, Clone, Copy, Default)]
pub struct VicII;

impl VicII {
    pub fn new() -> Self {
        VicII
    }
}

impl RegisterBlock for VicII {
    fn name(&self) -> &'static str {
        "VIC-II"
    }

    fn mirror_mask(&self) -> u16 {
        0x3F
    }

    fn read(&self, offset: u16) -> RegisterRead {
        log::trace!("VIC-II read ${:02X} {}", offset, register_name(offset));
        if offset as usize >= VIC_REGISTER_COUNT {
            RegisterRead::Stub(0xFF)
        } else {
            RegisterRead::Stub(0)
        }
    }

    fn write(&mut self, offset: u16, value: u8) -> RegisterWrite {
        log::trace!(
            "VIC-II write ${:02X} to ${:02X} {}",
            value,
            offset,
            register_name(offset)
        );
        if offset == BACKGROUND_COLOR_0 {
            RegisterWrite::Backdrop(value & 0x0F)
        } else {
            RegisterWrite::Ignored
        }
    }
}
