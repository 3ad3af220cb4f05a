//! Cell brightness using the ITU-R BT.709 luminance weights.

use crate::error::Result;

use super::padding::pad;
use super::partition::{partition, Cell};
use super::types::Rgb;
use super::Image;

/// BT.709 weight of the red channel.
pub const RED_WEIGHT: f64 = 0.2126;
/// BT.709 weight of the green channel.
pub const GREEN_WEIGHT: f64 = 0.7152;
/// BT.709 weight of the blue channel.
pub const BLUE_WEIGHT: f64 = 0.0722;

/// Weighted luminance of one pixel, in [0, 255].
#[inline]
pub fn luminance(px: Rgb) -> f64 {
    px.r as f64 * RED_WEIGHT + px.g as f64 * GREEN_WEIGHT + px.b as f64 * BLUE_WEIGHT
}

/// Average luminance of a cell, normalized to [0, 1].
///
/// Sums [`luminance`] over every pixel and divides by `pixel_count * 255`.
/// An empty cell has brightness 0.
pub fn brightness(cell: &Cell<'_>) -> f64 {
    let count = cell.pixel_count();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = cell.pixels().map(luminance).sum();
    (sum / (count as f64 * 255.0)).clamp(0.0, 1.0)
}

/// A `resolution x resolution` grid of cell brightness values in [0, 1].
///
/// Built once per (image, resolution) and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BrightnessMatrix {
    resolution: u32,
    values: Vec<f64>,
}

impl BrightnessMatrix {
    /// Pad `image`, partition it and measure every cell.
    ///
    /// # Errors
    /// `ExceedsResolutionBounds` if the resolution does not fit the padded canvas.
    pub fn compute(image: &Image, resolution: u32) -> Result<Self> {
        let padded = pad(image);
        let cells = partition(&padded, resolution)?;
        let values = cells
            .iter()
            .flat_map(|row| row.iter().map(brightness))
            .collect();
        Ok(Self { resolution, values })
    }

    /// Build a matrix from row-major values.
    ///
    /// Returns `None` unless there are exactly `resolution^2` values, all in [0, 1].
    pub fn from_values(resolution: u32, values: Vec<f64>) -> Option<Self> {
        let expected = resolution as usize * resolution as usize;
        if resolution == 0 || values.len() != expected {
            return None;
        }
        if !values.iter().all(|v| (0.0..=1.0).contains(v)) {
            return None;
        }
        Some(Self { resolution, values })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Brightness of the cell at `row`, `col`.
    pub fn get(&self, row: u32, col: u32) -> f64 {
        self.values[row as usize * self.resolution as usize + col as usize]
    }

    /// Iterate rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.resolution as usize)
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
