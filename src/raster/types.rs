//! Raster image type shared by the padding, partitioning and caching stages.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Image`] value.
///
/// The resolution cache keys on this by default, so two images with the same
/// pixels are still distinct cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An immutable RGB image.
///
/// Pixel data is stored row-major, 3 bytes per pixel.
/// Cloning produces a new identity: the clone is a distinct image as far as
/// identity-keyed caches are concerned.
#[derive(Debug)]
pub struct Image {
    id: ImageId,
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Image {
    /// Wrap raw RGB bytes.
    ///
    /// Returns `None` if the buffer length does not equal `width * height * 3`
    /// or if either dimension is zero.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if data.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            id: ImageId::next(),
            data,
            width,
            height,
        })
    }

    /// Create an image filled with a single color.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 3);
        for _ in 0..pixel_count {
            data.extend_from_slice(&[color.r, color.g, color.b]);
        }
        Self {
            id: ImageId::next(),
            data,
            width,
            height,
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for y in 0..height {
            for x in 0..width {
                let px = f(x, y);
                data.extend_from_slice(&[px.r, px.g, px.b]);
            }
        }
        Self {
            id: ImageId::next(),
            data,
            width,
            height,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Bytes of row `y`.
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Whether the image is a square with a power-of-two side.
    pub fn is_square_power_of_two(&self) -> bool {
        self.width == self.height && self.width.is_power_of_two()
    }
}

impl Clone for Image {
    fn clone(&self) -> Self {
        Self {
            id: ImageId::next(),
            data: self.data.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_rejects_wrong_length() {
        assert!(Image::from_rgb(2, 2, vec![0; 11]).is_none());
        assert!(Image::from_rgb(2, 2, vec![0; 12]).is_some());
    }

    #[test]
    fn test_from_rgb_rejects_zero_dimension() {
        assert!(Image::from_rgb(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_pixel_access_row_major() {
        let img = Image::from_fn(3, 2, |x, y| Rgb::new(x as u8, y as u8, 7));
        assert_eq!(img.pixel(2, 1), Rgb::new(2, 1, 7));
        assert_eq!(img.pixel(0, 0), Rgb::new(0, 0, 7));
    }

    #[test]
    fn test_clone_gets_new_identity() {
        let a = Image::filled(2, 2, Rgb::BLACK);
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_square_power_of_two() {
        assert!(Image::filled(8, 8, Rgb::WHITE).is_square_power_of_two());
        assert!(!Image::filled(8, 4, Rgb::WHITE).is_square_power_of_two());
        assert!(!Image::filled(6, 6, Rgb::WHITE).is_square_power_of_two());
    }
}
