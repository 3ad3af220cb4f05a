//! Rendering orchestrator: image + resolution + character set → character grid.
//!
//! The engine owns both caches. Each sits behind its own mutex and every
//! lookup, build and insert-if-absent happens under a single lock
//! acquisition, so an engine can be shared between threads by reference.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{AsciiArtError, Result};
use crate::matching::{BitmapFont, CharBrightnessIndex, CharacterSet, CharsetCache, GlyphRasterizer};
use crate::raster::{padded_side, BrightnessMatrix, Image, ResolutionCache};

/// A `resolution x resolution` grid of characters, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    size: usize,
    cells: Vec<char>,
}

impl CharGrid {
    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterate rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks_exact(self.size.max(1))
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }
}

/// Range of resolutions a caller may request for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionBounds {
    pub min: u32,
    pub max: u32,
}

impl ResolutionBounds {
    /// Bounds for an image: `min = max(1, width / height)`, `max = width`.
    pub fn for_image(image: &Image) -> Self {
        Self::for_dimensions(image.width(), image.height())
    }

    /// Bounds from raw dimensions (integer division for the minimum).
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        Self {
            min: (width / height.max(1)).max(1),
            max: width,
        }
    }

    pub fn contains(&self, resolution: u32) -> bool {
        (self.min..=self.max).contains(&resolution)
    }

    /// Return `resolution` if it lies within the bounds.
    ///
    /// # Errors
    /// `ExceedsResolutionBounds` otherwise.
    pub fn validate(&self, resolution: u32) -> Result<u32> {
        if self.contains(resolution) {
            Ok(resolution)
        } else {
            Err(AsciiArtError::ExceedsResolutionBounds {
                requested: resolution,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Nearest resolution inside the bounds.
    pub fn clamp(&self, resolution: u32) -> u32 {
        resolution.clamp(self.min, self.max.max(self.min))
    }
}

/// Brightness-matching renderer with its two caches.
pub struct AsciiArtEngine<R = BitmapFont> {
    resolutions: Mutex<ResolutionCache>,
    charsets: Mutex<CharsetCache<R>>,
}

impl Default for AsciiArtEngine<BitmapFont> {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiArtEngine<BitmapFont> {
    /// Engine with empty caches and the built-in font.
    pub fn new() -> Self {
        Self::with_caches(ResolutionCache::new(), CharsetCache::default())
    }
}

impl<R: GlyphRasterizer> AsciiArtEngine<R> {
    /// Engine around caller-supplied caches.
    pub fn with_caches(resolutions: ResolutionCache, charsets: CharsetCache<R>) -> Self {
        Self {
            resolutions: Mutex::new(resolutions),
            charsets: Mutex::new(charsets),
        }
    }

    /// Render `image` as a `resolution x resolution` grid of characters from `charset`.
    ///
    /// # Steps
    /// 1. Reject an empty character set before touching the image
    /// 2. Brightness matrix from the resolution cache (built on miss)
    /// 3. Brightness index from the charset cache (built on miss)
    /// 4. One index query per matrix cell
    ///
    /// # Errors
    /// - `EmptyCharacterSet` if `charset` is empty
    /// - `ExceedsResolutionBounds` if `resolution` is zero or larger than the
    ///   padded canvas
    ///
    /// Failures leave both caches unchanged.
    pub fn render(&self, image: &Image, resolution: u32, charset: &CharacterSet) -> Result<CharGrid> {
        if charset.is_empty() {
            return Err(AsciiArtError::EmptyCharacterSet);
        }

        let matrix = self.brightness_matrix(image, resolution)?;
        let index = self.char_index(charset)?;

        let cells = matrix
            .values()
            .iter()
            .map(|&b| index.query(b))
            .collect::<Result<Vec<char>>>()?;

        Ok(CharGrid {
            size: matrix.resolution() as usize,
            cells,
        })
    }

    /// Brightness matrix for `(image, resolution)`, computed and cached on a miss.
    pub fn brightness_matrix(&self, image: &Image, resolution: u32) -> Result<Arc<BrightnessMatrix>> {
        let side = padded_side(image.width(), image.height());
        if resolution == 0 || resolution > side {
            return Err(AsciiArtError::ExceedsResolutionBounds {
                requested: resolution,
                min: 1,
                max: side,
            });
        }

        let mut cache = lock(&self.resolutions);
        if let Some(matrix) = cache.get(image, resolution) {
            log::debug!("Resolution cache hit: image {} at {}", image.id(), resolution);
            return Ok(matrix);
        }

        log::debug!("Resolution cache miss: image {} at {}", image.id(), resolution);
        let matrix = BrightnessMatrix::compute(image, resolution)?;
        Ok(cache.put(image, resolution, matrix))
    }

    /// Brightness index for the content of `charset`, built and cached on a miss.
    pub fn char_index(&self, charset: &CharacterSet) -> Result<Arc<CharBrightnessIndex>> {
        lock(&self.charsets).get_or_build(charset)
    }

    /// Number of cached brightness matrices.
    pub fn cached_matrices(&self) -> usize {
        lock(&self.resolutions).len()
    }

    /// Number of cached character-set indices.
    pub fn cached_indices(&self) -> usize {
        lock(&self.charsets).len()
    }

    /// Number of characters whose raw brightness has been computed.
    pub fn cached_glyphs(&self) -> usize {
        lock(&self.charsets).glyph_count()
    }
}

/// Lock a cache, recovering from poisoning.
///
/// The caches are insert-only, so a panic while the lock was held cannot
/// leave a half-written entry behind.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
