//! Splitting a padded canvas into a square grid of cells.

use crate::error::{AsciiArtError, Result};

use super::types::{Image, Rgb};

/// A square window into a padded image.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    image: &'a Image,
    x0: u32,
    y0: u32,
    size: u32,
}

impl<'a> Cell<'a> {
    /// Edge length of the cell in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Top-left corner of the cell in image coordinates.
    pub fn origin(&self) -> (u32, u32) {
        (self.x0, self.y0)
    }

    /// Number of pixels covered by the cell.
    pub fn pixel_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// Iterate the cell's pixels row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + 'a {
        let image = self.image;
        let (x0, y0, size) = (self.x0, self.y0, self.size);
        (y0..y0 + size).flat_map(move |y| {
            let row = image.row(y);
            let start = x0 as usize * 3;
            let end = (x0 + size) as usize * 3;
            row[start..end]
                .chunks_exact(3)
                .map(|rgb| Rgb::new(rgb[0], rgb[1], rgb[2]))
        })
    }
}

/// Divide a padded square image into `resolution x resolution` cells.
///
/// The cell edge is `height / resolution` and is used for both axes, which
/// relies on the canvas being square (see [`super::pad`]). Cells are returned
/// row-major: `grid[row][col]`.
///
/// # Errors
/// `ExceedsResolutionBounds` if `resolution` is zero or larger than the
/// canvas side, since either would produce empty cells.
pub fn partition(padded: &Image, resolution: u32) -> Result<Vec<Vec<Cell<'_>>>> {
    let side = padded.height();
    if resolution == 0 || resolution > side {
        return Err(AsciiArtError::ExceedsResolutionBounds {
            requested: resolution,
            min: 1,
            max: side,
        });
    }
    debug_assert_eq!(padded.width(), padded.height(), "canvas must be square");

    let edge = side / resolution;
    let grid = (0..resolution)
        .map(|row| {
            (0..resolution)
                .map(|col| Cell {
                    image: padded,
                    x0: col * edge,
                    y0: row * edge,
                    size: edge,
                })
                .collect()
        })
        .collect();
    Ok(grid)
}
