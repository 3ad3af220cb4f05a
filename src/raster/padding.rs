//! Padding an image onto a square power-of-two canvas.

use std::borrow::Cow;

use super::types::{Image, Rgb};

/// Side length of the padded canvas for an image of the given dimensions.
///
/// This is the smallest power of two that is at least `max(width, height)`,
/// so the canvas is always square and every power-of-two resolution up to
/// the side divides it evenly.
pub fn padded_side(width: u32, height: u32) -> u32 {
    width.max(height).max(1).next_power_of_two()
}

/// Pad an image onto a white square canvas whose side is a power of two.
///
/// If the image already is such a square it is returned borrowed and
/// unchanged. Otherwise the original pixels are copied centered onto a new
/// white canvas. When the padding on an axis is odd, the extra pixel goes to
/// the right (or bottom) edge: the left and top offsets are
/// `(side - dim) / 2`, rounded down.
///
/// # Example
/// ```ignore
/// // 10x6 image -> 16x16 canvas, original at x in [3, 13), y in [5, 11)
/// let padded = pad(&image);
/// assert_eq!(padded.width(), 16);
/// ```
pub fn pad(image: &Image) -> Cow<'_, Image> {
    if image.is_square_power_of_two() {
        return Cow::Borrowed(image);
    }

    let side = padded_side(image.width(), image.height());
    let (left, top) = padding_offsets(image.width(), image.height(), side);

    let stride = side as usize * 3;
    let mut data = Vec::with_capacity(stride * side as usize);
    let white = [Rgb::WHITE.r, Rgb::WHITE.g, Rgb::WHITE.b];
    for _ in 0..(side as usize * side as usize) {
        data.extend_from_slice(&white);
    }

    // Copy the original row by row into the centered window
    for y in 0..image.height() {
        let dst_start = (top + y) as usize * stride + left as usize * 3;
        let src = image.row(y);
        data[dst_start..dst_start + src.len()].copy_from_slice(src);
    }

    match Image::from_rgb(side, side, data) {
        Some(padded) => Cow::Owned(padded),
        // Dimensions are non-zero and the buffer was sized from them.
        None => unreachable!("padded canvas buffer has the wrong length"),
    }
}

/// Left and top offsets of the original image inside a `side x side` canvas.
pub fn padding_offsets(width: u32, height: u32, side: u32) -> (u32, u32) {
    (
        side.saturating_sub(width) / 2,
        side.saturating_sub(height) / 2,
    )
}
