//! C64 Color RAM.
//!
//! The Color RAM is a 1KB area of 4-bit memory at $D800-$DBFF holding the
//! foreground color of each text cell. Only the lower 4 bits of a written
//! byte are stored. Unlike the other register blocks it is not mirrored, and
//! writes never touch the system RAM underneath it.

use super::{RegisterBlock, RegisterRead, RegisterWrite};

/// Size of color RAM in bytes.
pub const COLOR_RAM_SIZE: usize = 1024;

/// C64 Color RAM.
#[derive(Debug, Clone)]
pub struct ColorRam {
    /// Color data (only the lower nibble is ever set).
    data: Box<[u8; COLOR_RAM_SIZE]>,
}

impl ColorRam {
    /// Create color RAM with every cell set to color 0.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; COLOR_RAM_SIZE]),
        }
    }

    /// Get the color value at an offset (0-1023).
    #[inline]
    pub fn get(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    /// Set the color value at an offset.
    #[inline]
    pub fn set(&mut self, offset: usize, color: u8) {
        if let Some(cell) = self.data.get_mut(offset) {
            *cell = color & 0x0F;
        }
    }

    /// The whole table, one color per text cell.
    pub fn as_slice(&self) -> &[u8] {
        &*self.data
    }

    /// Fill every cell with one color.
    pub fn clear(&mut self, color: u8) {
        self.data.fill(color & 0x0F);
    }
}

impl Default for ColorRam {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBlock for ColorRam {
    fn name(&self) -> &'static str {
        "Color RAM"
    }

    fn mirror_mask(&self) -> u16 {
        (COLOR_RAM_SIZE - 1) as u16
    }

    fn read(&self, offset: u16) -> RegisterRead {
        RegisterRead::Live(self.get(offset as usize))
    }

    fn write(&mut self, offset: u16, value: u8) -> RegisterWrite {
        self.set(offset as usize, value);
        RegisterWrite::Stored
    }
}
