//! Character side of the pipeline: glyph brightness, the matching index and its cache.
//!
//! Glyph brightness is the fraction of set (bright) pixels in a character's
//! bitmap. The built-in font sets its background pixels, so heavily inked
//! glyphs stand for dark regions.
//! Within an active [`CharacterSet`] those values are rescaled to [0, 1] so the
//! darkest active glyph matches black cells and the brightest matches white.

mod cache;
mod charset;
mod font;
mod glyph;
mod index;

pub use cache::CharsetCache;
pub use charset::{
    parse_char_spec, CharacterSet, CharsetEdit, DEFAULT_CHARSET, PRINTABLE_END, PRINTABLE_START,
};
pub use font::{BitmapFont, FIRST_GLYPH, GLYPH_SIZE, LAST_GLYPH};
pub use glyph::{GlyphBitmap, GlyphRasterizer};
pub use index::{Bucket, CharBrightnessIndex};
