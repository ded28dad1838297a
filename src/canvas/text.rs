//! Bitmap text rendering with the Spleen fonts.
//!
//! Text is first rasterized to a boolean mask, then composited onto the
//! canvas. Bold is a one-pixel horizontal smear; outlines dilate the mask.

use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use super::{Canvas, Rgba};

/// Available bitmap font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// 6x12
    Small,
    /// 8x16
    Medium,
    /// 12x24
    Large,
}

impl FontSize {
    pub fn char_width(self) -> usize {
        match self {
            FontSize::Small => 6,
            FontSize::Medium => 8,
            FontSize::Large => 12,
        }
    }

    pub fn char_height(self) -> usize {
        match self {
            FontSize::Small => 12,
            FontSize::Medium => 16,
            FontSize::Large => 24,
        }
    }

    fn font_data(self) -> &'static [u8] {
        match self {
            FontSize::Small => FONT_6X12,
            FontSize::Medium => FONT_8X16,
            FontSize::Large => FONT_12X24,
        }
    }
}

/// Rasterized text.
#[derive(Debug, Clone)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    bits: Vec<bool>,
}

impl TextMask {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    /// Grow the mask by `radius` pixels in every direction.
    fn dilate(&self, radius: usize) -> TextMask {
        let width = self.width + 2 * radius;
        let height = self.height + 2 * radius;
        let r = radius as i64;
        let mut bits = vec![false; width * height];
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                for dy in -r..=r {
                    for dx in -r..=r {
                        let nx = (x as i64 + r + dx) as usize;
                        let ny = (y as i64 + r + dy) as usize;
                        bits[ny * width + nx] = true;
                    }
                }
            }
        }
        TextMask { width, height, bits }
    }
}

/// Width in pixels of `text` at the given size.
pub fn text_width(text: &str, size: FontSize, bold: bool) -> usize {
    let chars = text.chars().count();
    if chars == 0 {
        return 0;
    }
    chars * size.char_width() + usize::from(bold)
}

/// Rasterize `text` to a mask. Characters missing from the font leave a gap.
pub fn text_mask(text: &str, size: FontSize, bold: bool) -> TextMask {
    let width = text_width(text, size, bold);
    let height = size.char_height();
    let mut bits = vec![false; width * height];

    let Ok(mut font) = PSF2Font::new(size.font_data()) else {
        return TextMask { width, height, bits };
    };

    let char_w = size.char_width();
    let mut cursor_x = 0;
    for ch in text.chars() {
        let utf8 = ch.to_string();
        if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if !on || row_y >= height {
                        continue;
                    }
                    let x = cursor_x + col_x;
                    if x < width {
                        bits[row_y * width + x] = true;
                    }
                    if bold && x + 1 < width {
                        bits[row_y * width + x + 1] = true;
                    }
                }
            }
        }
        cursor_x += char_w;
    }

    TextMask { width, height, bits }
}

impl Canvas {
    /// Composite a mask onto the canvas with its top-left at (x, y).
    pub fn draw_mask(&mut self, mask: &TextMask, x: i64, y: i64, color: Rgba) {
        for my in 0..mask.height {
            for mx in 0..mask.width {
                if mask.get(mx, my) {
                    self.blend(x + mx as i64, y + my as i64, color);
                }
            }
        }
    }

    /// Draw text with its top-left at (x, y).
    pub fn draw_text(&mut self, text: &str, x: i64, y: i64, size: FontSize, bold: bool, color: Rgba) {
        let mask = text_mask(text, size, bold);
        self.draw_mask(&mask, x, y, color);
    }

    /// Draw text with an outline: the dilated mask in `outline`, then the
    /// glyphs in `fill` on top.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_outlined(
        &mut self,
        text: &str,
        x: i64,
        y: i64,
        size: FontSize,
        bold: bool,
        fill: Rgba,
        outline: Rgba,
        outline_width: usize,
    ) {
        let mask = text_mask(text, size, bold);
        if outline_width > 0 {
            let halo = mask.dilate(outline_width);
            let r = outline_width as i64;
            self.draw_mask(&halo, x - r, y - r, outline);
        }
        self.draw_mask(&mask, x, y, fill);
    }
}
