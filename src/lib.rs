//! ascii-art library crate.
//!
//! Renders images as square grids of characters whose glyph brightness best
//! matches the brightness of the image region they stand for.
//!
//! [`AsciiArtEngine`] ties the pieces together: [`raster`] turns an image into
//! a brightness matrix, [`matching`] turns a character set into a brightness
//! index, and both results are cached inside the engine.

pub mod algorithm;
pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod output;
pub mod raster;
pub mod shell;

pub use algorithm::{AsciiArtEngine, CharGrid, ResolutionBounds};
pub use error::{AsciiArtError, Result};
