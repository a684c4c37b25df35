//! Machine configuration, guest memory cells and ROM images.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// BASIC ROM size (8KB at $A000-$BFFF).
pub const BASIC_ROM_SIZE: usize = 8192;
/// KERNAL ROM size (8KB at $E000-$FFFF).
pub const KERNAL_ROM_SIZE: usize = 8192;
/// Character ROM size (4KB at $D000-$DFFF when mapped).
pub const CHAR_ROM_SIZE: usize = 4096;

/// Conventional file names of the three ROM dumps.
pub const BASIC_ROM_FILE: &str = "basic.901226-01.bin";
pub const KERNAL_ROM_FILE: &str = "kernal.901227-03.bin";
pub const CHAR_ROM_FILE: &str = "characters.901225-01.bin";

/// Fixed guest memory cells the machine reads or writes outside the CPU.
pub mod guest {
    /// Bank-select cell; its low 3 bits pick the priority chain.
    pub const BANK_SELECT: u16 = 0x0001;
    /// KERNAL keyboard buffer.
    pub const KEYBOARD_BUFFER: u16 = 0x0277;
    /// Keyboard buffer capacity (size of the KERNAL buffer).
    pub const KEYBOARD_CAPACITY: u8 = 10;
    /// KERNAL's own keyboard buffer limit (10 after KERNAL init).
    pub const KEYBOARD_LIMIT: u16 = 0x0289;
    /// Number of keys waiting in the keyboard buffer.
    pub const KEYBOARD_COUNT: u16 = 0x00C6;
    /// Cursor column on the current line.
    pub const CURSOR_COLUMN: u16 = 0x00D3;
    /// Cursor row.
    pub const CURSOR_ROW: u16 = 0x00D6;
    /// Current text color.
    pub const TEXT_COLOR: u16 = 0x0286;
}

/// Tunables for one machine instance.
///
/// The defaults reproduce a stock C64 running BASIC V2 at roughly the
/// original speed in a 320x200 window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    /// CPU instructions executed per host frame while running.
    pub instructions_per_frame: u32,
    /// Host frame interval in milliseconds.
    pub frame_interval_ms: u64,
    /// Entry of the KERNAL "wait for key" loop.
    pub wait_sentinel: u16,
    /// BASIC routine entered when the break key is pressed.
    pub break_vector: u16,
    /// Start of the text-cell buffer in guest RAM.
    pub video_base: u16,
    /// Text grid rows.
    pub text_rows: usize,
    /// Text grid columns.
    pub text_columns: usize,
    /// Added to every character code before the glyph lookup.
    pub code_page_offset: u16,
    /// Value forced into the bank-select cell at power-on.
    pub initial_bank: u8,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            instructions_per_frame: 6 * 1024,
            frame_interval_ms: 33,
            wait_sentinel: 0xE5CD,
            break_vector: 0xA832,
            video_base: 0x0400,
            text_rows: 25,
            text_columns: 40,
            code_page_offset: 0,
            initial_bank: 7,
        }
    }
}

impl MachineConfig {
    /// Number of text cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.text_rows * self.text_columns
    }

    /// Window width in pixels (8 pixels per column).
    pub fn screen_width(&self) -> usize {
        self.text_columns * 8
    }

    /// Window height in pixels (8 pixels per row).
    pub fn screen_height(&self) -> usize {
        self.text_rows * 8
    }
}

/// The three read-only ROM images a machine is built from.
#[derive(Debug, Clone)]
pub struct RomSet {
    pub(crate) basic: Box<[u8; BASIC_ROM_SIZE]>,
    pub(crate) kernal: Box<[u8; KERNAL_ROM_SIZE]>,
    pub(crate) characters: Box<[u8; CHAR_ROM_SIZE]>,
}

impl RomSet {
    /// Build a ROM set, checking every image size.
    pub fn new(basic: &[u8], kernal: &[u8], characters: &[u8]) -> Result<Self> {
        Ok(Self {
            basic: sized("BASIC", basic)?,
            kernal: sized("KERNAL", kernal)?,
            characters: sized("Character", characters)?,
        })
    }

    /// Load the three images from a directory using the conventional names.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let basic = read_rom(&dir.join(BASIC_ROM_FILE))?;
        let kernal = read_rom(&dir.join(KERNAL_ROM_FILE))?;
        let characters = read_rom(&dir.join(CHAR_ROM_FILE))?;
        log::info!("Loaded ROMs from {}", dir.display());
        Self::new(&basic, &kernal, &characters)
    }

    /// BASIC ROM image.
    pub fn basic(&self) -> &[u8] {
        &*self.basic
    }

    /// KERNAL ROM image.
    pub fn kernal(&self) -> &[u8] {
        &*self.kernal
    }

    /// Character (glyph) ROM image.
    pub fn characters(&self) -> &[u8] {
        &*self.characters
    }
}

fn read_rom(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn sized<const N: usize>(rom: &'static str, data: &[u8]) -> Result<Box<[u8; N]>> {
    if data.len() != N {
        return Err(Error::RomSize {
            rom,
            expected: N,
            actual: data.len(),
        });
    }
    let mut image = Box::new([0u8; N]);
    image.copy_from_slice(data);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MachineConfig::default();
        assert_eq!(config.instructions_per_frame, 6144);
        assert_eq!(config.wait_sentinel, 0xE5CD);
        assert_eq!(config.cell_count(), 1000);
        assert_eq!(config.screen_width(), 320);
        assert_eq!(config.screen_height(), 200);
    }

    #[test]
    fn test_rom_validation() {
        assert!(RomSet::new(&[0; 8192], &[0; 8192], &[0; 4096]).is_ok());

        // Wrong BASIC size
        let err = RomSet::new(&[0; 100], &[0; 8192], &[0; 4096]).unwrap_err();
        assert!(matches!(
            err,
            Error::RomSize {
                rom: "BASIC",
                expected: 8192,
                actual: 100
            }
        ));

        // Wrong KERNAL size
        assert!(RomSet::new(&[0; 8192], &[0; 100], &[0; 4096]).is_err());

        // Wrong character ROM size
        assert!(RomSet::new(&[0; 8192], &[0; 8192], &[0; 100]).is_err());
    }

    #[test]
    fn test_rom_error_message() {
        let err = RomSet::new(&[0; 8192], &[0; 8192], &[0; 10]).unwrap_err();
        assert_eq!(err.to_string(), "Character ROM must be 4096 bytes, got 10");
    }

    #[test]
    fn test_missing_rom_dir() {
        let err = RomSet::from_dir(Path::new("/nonexistent/rom/dir")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
