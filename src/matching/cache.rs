//! CharsetCache - memo of glyph raw brightness and of built brightness indices.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AsciiArtError, Result};

use super::charset::CharacterSet;
use super::font::BitmapFont;
use super::glyph::GlyphRasterizer;
use super::index::CharBrightnessIndex;

/// Two-level memo for the matching side of the pipeline.
///
/// - Raw brightness per character, computed once through the rasterizer and
///   shared by every character set.
/// - Built indices keyed by the sorted distinct content of a character set,
///   so removing and re-adding the same characters hits the cache.
///
/// Both levels are insert-if-absent and never evict.
pub struct CharsetCache<R = BitmapFont> {
    rasterizer: R,
    raw: HashMap<char, f64>,
    indices: HashMap<Vec<char>, Arc<CharBrightnessIndex>>,
}

impl Default for CharsetCache<BitmapFont> {
    fn default() -> Self {
        Self::new(BitmapFont)
    }
}

impl<R: GlyphRasterizer> CharsetCache<R> {
    /// Create an empty cache around a rasterizer.
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            raw: HashMap::new(),
            indices: HashMap::new(),
        }
    }

    /// Raw brightness of `c`, rasterizing it on first use.
    pub fn raw_brightness(&mut self, c: char) -> f64 {
        if let Some(&raw) = self.raw.get(&c) {
            return raw;
        }
        let raw = self.rasterizer.rasterize(c).raw_brightness();
        self.raw.insert(c, raw);
        raw
    }

    /// Cached index for the content of `set`, if any.
    pub fn get(&self, set: &CharacterSet) -> Option<Arc<CharBrightnessIndex>> {
        self.indices.get(&set.to_sorted_vec()).cloned()
    }

    /// Store an index for the content of `set` unless one is already cached.
    ///
    /// Returns the stored entry (the existing one on a duplicate put).
    pub fn put(
        &mut self,
        set: &CharacterSet,
        index: CharBrightnessIndex,
    ) -> Arc<CharBrightnessIndex> {
        Arc::clone(
            self.indices
                .entry(set.to_sorted_vec())
                .or_insert_with(|| Arc::new(index)),
        )
    }

    /// Cached index for `set`, building and storing it on a miss.
    ///
    /// # Errors
    /// `EmptyCharacterSet` if `set` is empty; nothing is cached in that case.
    pub fn get_or_build(&mut self, set: &CharacterSet) -> Result<Arc<CharBrightnessIndex>> {
        if set.is_empty() {
            return Err(AsciiArtError::EmptyCharacterSet);
        }
        if let Some(index) = self.get(set) {
            log::debug!("Charset cache hit ({} chars)", set.len());
            return Ok(index);
        }

        log::debug!("Charset cache miss ({} chars), building index", set.len());
        let entries: Vec<(char, f64)> = set.iter().map(|c| (c, self.raw_brightness(c))).collect();
        let index = CharBrightnessIndex::from_raw(entries);
        Ok(self.put(set, index))
    }

    /// Number of characters whose raw brightness is memoized.
    pub fn glyph_count(&self) -> usize {
        self.raw.len()
    }

    /// Number of cached indices.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::GlyphBitmap;
    use std::cell::Cell;

    /// Rasterizer that lights `code % 5` of 4 pixels and counts calls.
    struct CountingRasterizer {
        calls: Cell<usize>,
    }

    impl GlyphRasterizer for CountingRasterizer {
        fn rasterize(&self, c: char) -> GlyphBitmap {
            self.calls.set(self.calls.get() + 1);
            let on = (c as usize) % 5;
            let bits = (0..4).map(|i| i < on).collect();
            GlyphBitmap::new(4, 1, bits).unwrap()
        }
    }

    fn counting_cache() -> CharsetCache<CountingRasterizer> {
        CharsetCache::new(CountingRasterizer {
            calls: Cell::new(0),
        })
    }

    #[test]
    fn test_raw_brightness_memoized() {
        let mut cache = counting_cache();
        let first = cache.raw_brightness('a');
        let second = cache.raw_brightness('a');
        assert_eq!(first, second);
        assert_eq!(cache.rasterizer().calls.get(), 1);
        assert_eq!(cache.glyph_count(), 1);
    }

    #[test]
    fn test_raw_brightness_shared_across_sets() {
        let mut cache = counting_cache();
        cache.get_or_build(&CharacterSet::from("abc")).unwrap();
        cache.get_or_build(&CharacterSet::from("bcd")).unwrap();
        assert_eq!(cache.rasterizer().calls.get(), 4);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_content_keying_hits_after_remove_and_readd() {
        let mut cache = counting_cache();
        let mut set = CharacterSet::from("abc");
        let first = cache.get_or_build(&set).unwrap();

        set.remove('b');
        cache.get_or_build(&set).unwrap();
        set.add('b');
        let again = cache.get_or_build(&set).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_put_first_writer_wins() {
        let mut cache = counting_cache();
        let set = CharacterSet::from("ab");
        cache.put(&set, CharBrightnessIndex::from_raw([('a', 0.1), ('b', 0.2)]));
        let stored = cache.put(&set, CharBrightnessIndex::from_raw([('a', 0.9), ('b', 0.2)]));
        assert_eq!(stored.raw('a'), Some(0.1));
    }

    #[test]
    fn test_empty_set_not_cached() {
        let mut cache = counting_cache();
        let err = cache.get_or_build(&CharacterSet::new()).unwrap_err();
        assert_eq!(err, AsciiArtError::EmptyCharacterSet);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_uses_builtin_font() {
        let mut cache = CharsetCache::default();
        assert_eq!(cache.raw_brightness(' '), 1.0);
        assert!(cache.raw_brightness('@') < 1.0);
    }
}
