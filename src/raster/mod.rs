//! Image side of the pipeline: padding, partitioning, brightness and caching.
//!
//! 1. **Padding** - place the image on a white square power-of-two canvas
//! 2. **Partitioning** - split the canvas into `resolution x resolution` cells
//! 3. **Brightness** - BT.709 luminance per cell, normalized to [0, 1]
//! 4. **Caching** - memoize the resulting matrix per (image, resolution)

mod brightness;
mod cache;
mod io;
mod padding;
mod partition;
mod types;

pub use brightness::{
    brightness, luminance, BrightnessMatrix, BLUE_WEIGHT, GREEN_WEIGHT, RED_WEIGHT,
};
pub use cache::{CacheKeying, ImageKey, ResolutionCache};
pub use io::ImageIoError;
pub use padding::{pad, padded_side, padding_offsets};
pub use partition::{partition, Cell};
pub use types::{Image, ImageId, Rgb};
