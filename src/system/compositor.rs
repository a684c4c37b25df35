//! Character-cell display compositor.
//!
//! Rasterizes a text-mode screen: each cell holds a character code, which
//! (plus a code-page offset) selects 8 glyph bytes from the character ROM.
//! Bit 7 of each glyph byte is the leftmost pixel. Set bits are drawn in the
//! cell's foreground color. Clear bits are drawn in the cell's background
//! color when a background table is supplied and are otherwise left
//! untouched, so whatever was drawn underneath shows through.

use super::framebuffer::Framebuffer;
use crate::config::MachineConfig;

/// Glyph width and height in pixels.
pub const GLYPH_SIZE: usize = 8;

/// Foreground used when no foreground color table is supplied.
pub const DEFAULT_TILE_COLOR: u32 = 0xFF11_4433;

/// Everything a text layer is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct TextSources<'a> {
    /// One character code per cell, row-major.
    pub cells: &'a [u8],
    /// Per-cell foreground color codes (low 4 bits used).
    pub foreground: Option<&'a [u8]>,
    /// Per-cell background color codes, or `None` for a transparent background.
    pub background: Option<&'a [u8]>,
    /// Glyph ROM, 8 bytes per character.
    pub glyphs: &'a [u8],
    /// Color code to ARGB lookup.
    pub palette: &'a [u32; 16],
}

/// A fixed grid of 8x8 text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compositor {
    rows: usize,
    columns: usize,
    code_page_offset: u16,
}

impl Compositor {
    /// A grid sized and offset from the machine configuration.
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            rows: config.text_rows,
            columns: config.text_columns,
            code_page_offset: config.code_page_offset,
        }
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Draw every cell into `dest` with the grid's top-left at (origin_x, origin_y).
    pub fn render(
        &self,
        dest: &mut Framebuffer,
        sources: &TextSources<'_>,
        origin_x: usize,
        origin_y: usize,
    ) {
        let total = self.cell_count();

        for row in 0..self.rows {
            for col in 0..self.columns {
                let idx = row * self.columns + col;
                if idx >= total {
                    continue;
                }
                let Some(&code) = sources.cells.get(idx) else {
                    continue;
                };

                let glyph_base = (usize::from(code) + usize::from(self.code_page_offset)) * GLYPH_SIZE;

                let fg = match sources.foreground {
                    Some(table) => table
                        .get(idx)
                        .map_or(DEFAULT_TILE_COLOR, |&c| sources.palette[(c & 0x0F) as usize]),
                    None => DEFAULT_TILE_COLOR,
                };
                let bg = sources
                    .background
                    .and_then(|table| table.get(idx))
                    .map(|&c| sources.palette[(c & 0x0F) as usize]);

                let x0 = origin_x + col * GLYPH_SIZE;
                let y0 = origin_y + row * GLYPH_SIZE;

                for yy in 0..GLYPH_SIZE {
                    let bits = sources.glyphs.get(glyph_base + yy).copied().unwrap_or(0);
                    for xx in 0..GLYPH_SIZE {
                        if bits & (0x80 >> xx) != 0 {
                            dest.blend_pixel(x0 + xx, y0 + yy, fg);
                        } else if let Some(bg) = bg {
                            dest.blend_pixel(x0 + xx, y0 + yy, bg);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::palette::PALETTE;

    const WHITE: u32 = 0xFFFF_FFFF;
    const UNDER: u32 = 0xFF55_5555;

    fn small_grid() -> Compositor {
        let config = MachineConfig {
            text_rows: 1,
            text_columns: 2,
            ..MachineConfig::default()
        };
        Compositor::new(&config)
    }

    fn glyphs() -> Vec<u8> {
        // Glyph 0 blank, glyph 1 a single leftmost column, glyph 2 solid
        let mut rom = vec![0u8; 4096];
        rom[8..16].fill(0x80);
        rom[16..24].fill(0xFF);
        rom
    }

    #[test]
    fn test_leftmost_bit_is_bit_seven() {
        let grid = small_grid();
        let rom = glyphs();
        let mut fb = Framebuffer::new(16, 8);
        fb.fill(UNDER);

        let sources = TextSources {
            cells: &[1, 0],
            foreground: Some(&[1, 1]),
            background: None,
            glyphs: &rom,
            palette: &PALETTE,
        };
        grid.render(&mut fb, &sources, 0, 0);

        for y in 0..8 {
            assert_eq!(fb.pixel(0, y), Some(WHITE));
            assert_eq!(fb.pixel(1, y), Some(UNDER));
        }
    }

    #[test]
    fn test_blank_glyph_is_transparent() {
        let grid = small_grid();
        let rom = glyphs();
        let mut fb = Framebuffer::new(16, 8);
        fb.fill(UNDER);
        let before = fb.clone();

        let sources = TextSources {
            cells: &[0, 0],
            foreground: Some(&[1, 1]),
            background: None,
            glyphs: &rom,
            palette: &PALETTE,
        };
        grid.render(&mut fb, &sources, 0, 0);

        assert_eq!(fb, before);
    }

    #[test]
    fn test_background_table_paints_clear_bits() {
        let grid = small_grid();
        let rom = glyphs();
        let mut fb = Framebuffer::new(16, 8);

        let sources = TextSources {
            cells: &[1, 0],
            foreground: Some(&[1, 1]),
            background: Some(&[2, 0x16]),
            glyphs: &rom,
            palette: &PALETTE,
        };
        grid.render(&mut fb, &sources, 0, 0);

        assert_eq!(fb.pixel(0, 0), Some(WHITE));
        assert_eq!(fb.pixel(1, 0), Some(PALETTE[2]));
        // Only the low nibble of the color code is used
        assert_eq!(fb.pixel(8, 0), Some(PALETTE[6]));
    }

    #[test]
    fn test_default_tile_color() {
        let grid = small_grid();
        let rom = glyphs();
        let mut fb = Framebuffer::new(16, 8);

        let sources = TextSources {
            cells: &[2, 2],
            foreground: None,
            background: None,
            glyphs: &rom,
            palette: &PALETTE,
        };
        grid.render(&mut fb, &sources, 0, 0);

        assert_eq!(fb.pixel(15, 7), Some(DEFAULT_TILE_COLOR));
    }

    #[test]
    fn test_code_page_offset() {
        let config = MachineConfig {
            text_rows: 1,
            text_columns: 1,
            code_page_offset: 1,
            ..MachineConfig::default()
        };
        let grid = Compositor::new(&config);
        let rom = glyphs();
        let mut fb = Framebuffer::new(8, 8);
        fb.fill(UNDER);

        // Code 0 plus offset 1 draws glyph 1
        let sources = TextSources {
            cells: &[0],
            foreground: Some(&[1]),
            background: None,
            glyphs: &rom,
            palette: &PALETTE,
        };
        grid.render(&mut fb, &sources, 0, 0);

        assert_eq!(fb.pixel(0, 0), Some(WHITE));
        assert_eq!(fb.pixel(1, 0), Some(UNDER));
    }

    #[test]
    fn test_origin_and_clipping() {
        let grid = small_grid();
        let rom = glyphs();
        let mut fb = Framebuffer::new(12, 8);

        let sources = TextSources {
            cells: &[2, 2],
            foreground: Some(&[1, 1]),
            background: None,
            glyphs: &rom,
            palette: &PALETTE,
        };
        // Second cell hangs off the right edge
        grid.render(&mut fb, &sources, 2, 0);

        assert_eq!(fb.pixel(1, 0), Some(0xFF00_0000));
        assert_eq!(fb.pixel(2, 0), Some(WHITE));
        assert_eq!(fb.pixel(11, 7), Some(WHITE));
    }

    #[test]
    fn test_short_cell_buffer() {
        let grid = small_grid();
        let rom = glyphs();
        let mut fb = Framebuffer::new(16, 8);

        let sources = TextSources {
            cells: &[2],
            foreground: Some(&[1]),
            background: None,
            glyphs: &rom,
            palette: &PALETTE,
        };
        grid.render(&mut fb, &sources, 0, 0);

        assert_eq!(fb.pixel(0, 0), Some(WHITE));
        assert_eq!(fb.pixel(8, 0), Some(0xFF00_0000));
    }
}
