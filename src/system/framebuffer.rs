//! ARGB32 pixel surface the machine draws into each frame.

/// A width x height grid of ARGB32 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    /// Opaque black surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Pixel at (x, y), or `None` outside the surface.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Composite `color` over one pixel using its alpha channel.
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(self.pixels[i], color);
        }
    }

    /// Fill the whole surface.
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: u32) {
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        for row in y..y_end {
            let start = row * self.width;
            if x < x_end {
                self.pixels[start + x..start + x_end].fill(color);
            }
        }
    }

    /// Fill with a vertical gradient from `top` (first row) to `bottom` (last row).
    pub fn vertical_gradient(&mut self, top: u32, bottom: u32) {
        let span = self.height.saturating_sub(1).max(1) as u32;
        for row in 0..self.height {
            let color = lerp(top, bottom, row as u32, span);
            let start = row * self.width;
            self.pixels[start..start + self.width].fill(color);
        }
    }

    /// Copy `src` onto this surface with its top-left corner at (x, y).
    pub fn blit(&mut self, src: &Framebuffer, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let columns = src.width.min(self.width - x);
        let rows = src.height.min(self.height - y);
        for row in 0..rows {
            let from = row * src.width;
            let to = (y + row) * self.width + x;
            self.pixels[to..to + columns].copy_from_slice(&src.pixels[from..from + columns]);
        }
    }
}

/// Source-over blend of ARGB32 `src` onto `dst`.
pub fn blend(dst: u32, src: u32) -> u32 {
    let alpha = src >> 24;
    match alpha {
        0xFF => src,
        0 => dst,
        _ => {
            let mix = |shift: u32| {
                let s = (src >> shift) & 0xFF;
                let d = (dst >> shift) & 0xFF;
                ((s * alpha + d * (255 - alpha)) / 255) << shift
            };
            let out_alpha = alpha + ((dst >> 24) * (255 - alpha)) / 255;
            (out_alpha << 24) | mix(16) | mix(8) | mix(0)
        }
    }
}

/// Per-channel interpolation `a + (b - a) * num / den`.
fn lerp(a: u32, b: u32, num: u32, den: u32) -> u32 {
    [24u32, 16, 8, 0].iter().fold(0, |acc, &shift| {
        let ca = ((a >> shift) & 0xFF) as i32;
        let cb = ((b >> shift) & 0xFF) as i32;
        let c = ca + (cb - ca) * num as i32 / den as i32;
        acc | ((c as u32 & 0xFF) << shift)
    })
}
