//! C64 color palette.
//!
//! 16 colors as ARGB32, indexed by the 4-bit color codes the guest stores in
//! color RAM and the video registers.

/// C64 palette: 16 colors indexed 0-15 in ARGB32 format.
pub const PALETTE: [u32; 16] = [
    0xFF00_0000, // 0: Black
    0xFFFF_FFFF, // 1: White
    0xFF68_372B, // 2: Red
    0xFF70_A4B2, // 3: Cyan
    0xFF6F_3D86, // 4: Purple
    0xFF58_8D43, // 5: Green
    0xFF35_2879, // 6: Blue
    0xFFB8_C76F, // 7: Yellow
    0xFF6F_4F25, // 8: Orange
    0xFF43_3900, // 9: Brown
    0xFF9A_6759, // 10: Light Red
    0xFF44_4444, // 11: Dark Grey
    0xFF6C_6C6C, // 12: Medium Grey
    0xFF9A_D284, // 13: Light Green
    0xFF6C_5EB5, // 14: Light Blue
    0xFF95_9595, // 15: Light Grey
];

/// Palette entry for a color code; only the low 4 bits are used.
#[inline]
pub fn color(code: u8) -> u32 {
    PALETTE[(code & 0x0F) as usize]
}
