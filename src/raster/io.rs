//! Image file decode/encode through the `image` crate.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::Image;

/// Errors raised while reading or writing image files.
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("failed to decode image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("failed to encode image '{}': {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("image '{}' has zero width or height", .path.display())]
    Empty { path: PathBuf },
}

impl Image {
    /// Decode an image file into an RGB image.
    ///
    /// Any format supported by the `image` crate is accepted; alpha is dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageIoError> {
        let path = path.as_ref();
        let decoded = ::image::open(path).map_err(|source| ImageIoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        let image = Image::from_rgb(width, height, rgb.into_raw()).ok_or_else(|| {
            ImageIoError::Empty {
                path: path.to_path_buf(),
            }
        })?;
        log::info!(
            "Loaded image {} ({}x{}) from {}",
            image.id(),
            width,
            height,
            path.display()
        );
        Ok(image)
    }

    /// Encode the image to a file; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageIoError> {
        let path = path.as_ref();
        ::image::save_buffer(
            path,
            self.data(),
            self.width(),
            self.height(),
            ::image::ExtendedColorType::Rgb8,
        )
        .map_err(|source| ImageIoError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{pad, Rgb};
    use tempfile::TempDir;

    #[test]
    fn test_save_then_open_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gradient.png");
        let img = Image::from_fn(5, 3, |x, y| Rgb::new(x as u8 * 50, y as u8 * 80, 9));
        img.save(&path).unwrap();

        let loaded = Image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (5, 3));
        assert_eq!(loaded.data(), img.data());
        assert_ne!(loaded.id(), img.id());
    }

    #[test]
    fn test_padded_canvas_can_be_saved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("padded.png");
        let img = Image::filled(3, 2, Rgb::BLACK);
        pad(&img).save(&path).unwrap();
        let loaded = Image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (4, 4));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Image::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ImageIoError::Decode { .. }));
    }
}
