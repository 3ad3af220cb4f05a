//! Glyph bitmaps and the rasterizer seam.

/// A fixed-size boolean bitmap of one character.
///
/// Set bits are bright pixels and count toward the glyph's raw brightness.
/// For a glyph drawn in dark ink on a light page those are the background
/// pixels, not the ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl GlyphBitmap {
    /// Build a bitmap from row-major bits.
    ///
    /// Returns `None` if `bits.len() != width * height`.
    pub fn new(width: usize, height: usize, bits: Vec<bool>) -> Option<Self> {
        if bits.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            bits,
        })
    }

    /// Build a bitmap from rows of bytes, most significant bit first.
    ///
    /// Each row contributes `width` bits (at most 8).
    pub fn from_rows(rows: &[u8], width: usize) -> Self {
        let width = width.min(8);
        let mut bits = Vec::with_capacity(rows.len() * width);
        for &row in rows {
            for col in 0..width {
                bits.push(row & (0x80 >> col) != 0);
            }
        }
        Self {
            width,
            height: rows.len(),
            bits,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at (`x`, `y`) is on.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    /// Number of on pixels.
    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Fraction of set pixels, in [0, 1]. An empty bitmap has brightness 0.
    pub fn raw_brightness(&self) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        self.count_on() as f64 / self.bits.len() as f64
    }
}

/// Turns a character into a fixed-size bitmap.
///
/// Called at most once per distinct character by [`super::CharsetCache`].
pub trait GlyphRasterizer {
    fn rasterize(&self, c: char) -> GlyphBitmap;
}

impl<F> GlyphRasterizer for F
where
    F: Fn(char) -> GlyphBitmap,
{
    fn rasterize(&self, c: char) -> GlyphBitmap {
        self(c)
    }
}
