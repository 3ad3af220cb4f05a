//! Character brightness index: normalized glyph brightness and nearest-match queries.

use std::collections::BTreeMap;

use crate::error::{AsciiArtError, Result};

/// Characters sharing one exact normalized brightness.
///
/// Characters are kept in ascending code-point order and a bucket is never
/// empty. Buckets are replaced, not edited in place, when the index is rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    brightness: f64,
    chars: Vec<char>,
}

impl Bucket {
    /// Normalized brightness shared by every character in the bucket.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Characters in ascending code-point order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Smallest character in the bucket.
    fn first(&self) -> char {
        self.chars[0]
    }
}

/// Maps normalized brightness to the characters of the active set.
///
/// Normalized brightness of `c` is `(raw(c) - min) / (max - min)` where `min`
/// and `max` are taken over the whole active set. When every active glyph has
/// the same raw brightness, all characters normalize to 0.
///
/// Because normalization depends on the whole set, any edit that moves `min`
/// or `max` rebuilds every bucket from scratch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharBrightnessIndex {
    raw: BTreeMap<char, f64>,
    bounds: Option<(f64, f64)>,
    buckets: Vec<Bucket>,
}

impl CharBrightnessIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(char, raw brightness)` pairs in one pass.
    ///
    /// Duplicate characters keep their first raw value.
    pub fn from_raw(entries: impl IntoIterator<Item = (char, f64)>) -> Self {
        let mut index = Self::new();
        for (c, raw) in entries {
            index.raw.entry(c).or_insert(raw);
        }
        index.recompute_bounds();
        index.rebuild();
        index
    }

    /// Add a character with its raw brightness.
    ///
    /// Recomputes `min`/`max` over the whole set and rebuilds every bucket.
    /// Returns `false` (and changes nothing) if `c` is already present.
    pub fn add_char(&mut self, c: char, raw: f64) -> bool {
        if self.raw.contains_key(&c) {
            return false;
        }
        self.raw.insert(c, raw);
        self.recompute_bounds();
        self.rebuild();
        true
    }

    /// Remove a character.
    ///
    /// If its raw brightness was the current `min` or `max`, the bounds are
    /// recomputed and the whole index is rebuilt. Otherwise no other
    /// character's normalized value changes, so `c` is only dropped from its
    /// bucket. Returns `false` if `c` was not present.
    pub fn remove_char(&mut self, c: char) -> bool {
        let Some(raw) = self.raw.remove(&c) else {
            return false;
        };
        let Some((min, max)) = self.bounds else {
            return true;
        };

        if raw == min || raw == max {
            self.recompute_bounds();
            self.rebuild();
            return true;
        }

        let key = normalize(raw, min, max);
        if let Some(pos) = self.buckets.iter().position(|b| b.brightness == key) {
            let remaining: Vec<char> = self.buckets[pos]
                .chars
                .iter()
                .copied()
                .filter(|&other| other != c)
                .collect();
            if remaining.is_empty() {
                self.buckets.remove(pos);
            } else {
                self.buckets[pos] = Bucket {
                    brightness: key,
                    chars: remaining,
                };
            }
        }
        true
    }

    /// Character whose normalized brightness is closest to `brightness`.
    ///
    /// Ties in distance, within one bucket or across buckets, go to the
    /// smallest character code.
    ///
    /// # Errors
    /// `EmptyCharacterSet` if the index has no characters.
    pub fn query(&self, brightness: f64) -> Result<char> {
        let mut best: Option<(f64, char)> = None;
        for bucket in &self.buckets {
            let distance = (bucket.brightness - brightness).abs();
            let candidate = bucket.first();
            best = match best {
                None => Some((distance, candidate)),
                Some((best_distance, best_char)) => {
                    if distance < best_distance {
                        Some((distance, candidate))
                    } else if distance == best_distance {
                        Some((best_distance, best_char.min(candidate)))
                    } else {
                        Some((best_distance, best_char))
                    }
                }
            };
        }
        best.map(|(_, c)| c)
            .ok_or(AsciiArtError::EmptyCharacterSet)
    }

    /// Smallest raw brightness in the set, if non-empty.
    pub fn min(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    /// Largest raw brightness in the set, if non-empty.
    pub fn max(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }

    /// Normalized brightness of `c`, if present.
    pub fn normalized(&self, c: char) -> Option<f64> {
        let raw = *self.raw.get(&c)?;
        let (min, max) = self.bounds?;
        Some(normalize(raw, min, max))
    }

    /// Raw brightness of `c`, if present.
    pub fn raw(&self, c: char) -> Option<f64> {
        self.raw.get(&c).copied()
    }

    /// Buckets in ascending brightness order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Active characters in code-point order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.raw.keys().copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.raw.contains_key(&c)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn recompute_bounds(&mut self) {
        self.bounds = self.raw.values().fold(None, |acc, &r| match acc {
            None => Some((r, r)),
            Some((min, max)) => Some((min.min(r), max.max(r))),
        });
    }

    fn rebuild(&mut self) {
        let Some((min, max)) = self.bounds else {
            self.buckets.clear();
            return;
        };

        let mut pairs: Vec<(f64, char)> = self
            .raw
            .iter()
            .map(|(&c, &r)| (normalize(r, min, max), c))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut buckets: Vec<Bucket> = Vec::new();
        for (brightness, c) in pairs {
            match buckets.last_mut() {
                Some(last) if last.brightness == brightness => last.chars.push(c),
                _ => buckets.push(Bucket {
                    brightness,
                    chars: vec![c],
                }),
            }
        }

        log::debug!(
            "Rebuilt brightness index: {} chars in {} buckets (min={:.4}, max={:.4})",
            self.raw.len(),
            buckets.len(),
            min,
            max
        );
        self.buckets = buckets;
    }
}

/// Rescale `raw` into [0, 1] relative to the set's bounds.
fn normalize(raw: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((raw - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(char, f64)]) -> CharBrightnessIndex {
        CharBrightnessIndex::from_raw(entries.iter().copied())
    }

    #[test]
    fn test_two_chars_normalize_to_extremes() {
        let idx = index(&[('a', 0.2), ('b', 0.8)]);
        assert_eq!(idx.normalized('a'), Some(0.0));
        assert_eq!(idx.normalized('b'), Some(1.0));
        assert_eq!(idx.query(0.3), Ok('a'));
        assert_eq!(idx.query(0.6), Ok('b'));
    }

    #[test]
    fn test_single_char_degenerate() {
        let idx = index(&[('0', 0.4)]);
        assert_eq!(idx.normalized('0'), Some(0.0));
        assert_eq!(idx.query(0.0), Ok('0'));
        assert_eq!(idx.query(1.0), Ok('0'));
    }

    #[test]
    fn test_equal_raw_values_share_one_bucket() {
        let idx = index(&[('z', 0.5), ('m', 0.5), ('q', 0.5)]);
        assert_eq!(idx.buckets().len(), 1);
        assert_eq!(idx.buckets()[0].chars(), &['m', 'q', 'z']);
        assert_eq!(idx.buckets()[0].brightness(), 0.0);
        assert_eq!(idx.query(0.9), Ok('m'));
    }

    #[test]
    fn test_tie_within_bucket_picks_smallest_code() {
        let idx = index(&[('y', 0.0), ('x', 0.0), ('w', 1.0)]);
        assert_eq!(idx.query(0.1), Ok('x'));
    }

    #[test]
    fn test_tie_across_buckets_picks_smallest_code() {
        // 'b' at 0.0, 'a' at 1.0; query 0.5 is equidistant
        let idx = index(&[('b', 0.1), ('a', 0.3)]);
        assert_eq!(idx.query(0.5), Ok('a'));

        let idx = index(&[('a', 0.1), ('b', 0.3)]);
        assert_eq!(idx.query(0.5), Ok('a'));
    }

    #[test]
    fn test_empty_index_query_fails() {
        let idx = CharBrightnessIndex::new();
        assert_eq!(idx.query(0.5), Err(AsciiArtError::EmptyCharacterSet));
        assert!(idx.min().is_none());
    }

    #[test]
    fn test_add_existing_char_is_noop() {
        let mut idx = index(&[('a', 0.2)]);
        assert!(!idx.add_char('a', 0.9));
        assert_eq!(idx.raw('a'), Some(0.2));
    }

    #[test]
    fn test_add_that_moves_max_rebuilds_everything() {
        let mut idx = index(&[('a', 0.2), ('b', 0.4), ('c', 0.6)]);
        assert!((idx.normalized('b').unwrap() - 0.5).abs() < 1e-12);

        assert!(idx.add_char('d', 1.0));
        assert_eq!(idx.max(), Some(1.0));
        assert!((idx.normalized('b').unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(
            idx,
            index(&[('a', 0.2), ('b', 0.4), ('c', 0.6), ('d', 1.0)])
        );
    }

    #[test]
    fn test_remove_boundary_char_rebuilds_everything() {
        let mut idx = index(&[('a', 0.2), ('b', 0.4), ('c', 0.6), ('d', 1.0)]);
        assert!(idx.remove_char('d'));
        assert_eq!(idx.max(), Some(0.6));
        assert_eq!(idx, index(&[('a', 0.2), ('b', 0.4), ('c', 0.6)]));
    }

    #[test]
    fn test_remove_unique_min_rebuilds_everything() {
        let mut idx = index(&[('a', 0.2), ('b', 0.4), ('c', 0.6), ('d', 1.0)]);
        assert!(idx.remove_char('a'));
        assert_eq!(idx.min(), Some(0.4));
        assert_eq!(idx.normalized('b'), Some(0.0));
        assert_eq!(idx, index(&[('b', 0.4), ('c', 0.6), ('d', 1.0)]));
    }

    #[test]
    fn test_remove_one_of_shared_min() {
        let mut idx = index(&[('a', 0.2), ('b', 0.2), ('c', 0.6), ('d', 1.0)]);
        assert!(idx.remove_char('a'));
        assert_eq!(idx.min(), Some(0.2));
        assert_eq!(idx.buckets()[0].chars(), &['b']);
        assert_eq!(idx, index(&[('b', 0.2), ('c', 0.6), ('d', 1.0)]));
        assert_eq!(idx.query(0.0), Ok('b'));
    }

    #[test]
    fn test_remove_interior_char_only_drops_it() {
        let mut idx = index(&[('a', 0.0), ('b', 0.5), ('c', 0.5), ('d', 1.0)]);
        assert!(idx.remove_char('b'));
        assert_eq!(idx, index(&[('a', 0.0), ('c', 0.5), ('d', 1.0)]));

        assert!(idx.remove_char('c'));
        assert_eq!(idx.buckets().len(), 2);
        assert_eq!(idx, index(&[('a', 0.0), ('d', 1.0)]));
    }

    #[test]
    fn test_remove_missing_char() {
        let mut idx = index(&[('a', 0.2)]);
        assert!(!idx.remove_char('q'));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn test_remove_last_char_empties_index() {
        let mut idx = index(&[('a', 0.2)]);
        assert!(idx.remove_char('a'));
        assert!(idx.is_empty());
        assert!(idx.buckets().is_empty());
        assert_eq!(idx.query(0.2), Err(AsciiArtError::EmptyCharacterSet));
    }

    #[test]
    fn test_incremental_build_matches_bulk_build() {
        let entries = [('q', 0.31), ('#', 0.9), ('.', 0.05), ('+', 0.4), ('x', 0.31)];
        let mut incremental = CharBrightnessIndex::new();
        for &(c, r) in &entries {
            incremental.add_char(c, r);
        }
        assert_eq!(incremental, index(&entries));
    }

    #[test]
    fn test_normalized_values_in_unit_range() {
        let idx = index(&[('a', 0.11), ('b', 0.23), ('c', 0.57), ('d', 0.91)]);
        for c in idx.chars() {
            let v = idx.normalized(c).unwrap();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_query_is_deterministic() {
        let idx = index(&[('a', 0.1), ('b', 0.35), ('c', 0.6), ('d', 0.9)]);
        for i in 0..=20 {
            let b = i as f64 / 20.0;
            let first = idx.query(b).unwrap();
            assert!((0..5).all(|_| idx.query(b).unwrap() == first));
        }
    }
}
