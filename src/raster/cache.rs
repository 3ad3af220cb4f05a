//! ResolutionCache - in-memory memo of brightness matrices per (image, resolution).

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use super::brightness::BrightnessMatrix;
use super::types::{Image, ImageId};

/// How images are identified by the resolution cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKeying {
    /// Key on the image value's identity. Two images with identical pixels
    /// are separate entries.
    #[default]
    Identity,
    /// Key on a SHA-256 digest of the dimensions and pixels. Identical
    /// images share an entry, at the cost of hashing the pixels on every lookup.
    Content,
}

impl CacheKeying {
    pub fn name(&self) -> &'static str {
        match self {
            CacheKeying::Identity => "identity",
            CacheKeying::Content => "content",
        }
    }
}

/// Key identifying one image under a [`CacheKeying`] mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Identity(ImageId),
    Content(String),
}

/// Insert-if-absent memo of brightness matrices.
///
/// Unbounded; entries are never evicted or replaced.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    keying: CacheKeying,
    entries: HashMap<(ImageKey, u32), Arc<BrightnessMatrix>>,
}

impl ResolutionCache {
    /// Create an empty identity-keyed cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with the given keying mode.
    pub fn with_keying(keying: CacheKeying) -> Self {
        Self {
            keying,
            entries: HashMap::new(),
        }
    }

    pub fn keying(&self) -> CacheKeying {
        self.keying
    }

    /// Compute the cache key for an image under this cache's keying mode.
    pub fn key_for(&self, image: &Image) -> ImageKey {
        match self.keying {
            CacheKeying::Identity => ImageKey::Identity(image.id()),
            CacheKeying::Content => ImageKey::Content(Self::hash_image(image)),
        }
    }

    /// Get the cached matrix for `(image, resolution)`, if any.
    pub fn get(&self, image: &Image, resolution: u32) -> Option<Arc<BrightnessMatrix>> {
        self.entries
            .get(&(self.key_for(image), resolution))
            .cloned()
    }

    /// Store a matrix unless an entry for the key already exists.
    ///
    /// Returns the stored matrix: `matrix` itself on insert, the existing
    /// entry when the key was already present (first writer wins).
    pub fn put(
        &mut self,
        image: &Image,
        resolution: u32,
        matrix: BrightnessMatrix,
    ) -> Arc<BrightnessMatrix> {
        let key = (self.key_for(image), resolution);
        Arc::clone(self.entries.entry(key).or_insert_with(|| Arc::new(matrix)))
    }

    /// Number of cached matrices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic SHA-256 digest of an image's dimensions and pixels.
    /// Returns a 32-character hex string (first 16 bytes of the digest).
    pub fn hash_image(image: &Image) -> String {
        let mut hasher = Sha256::new();
        hasher.update(image.width().to_le_bytes());
        hasher.update(image.height().to_le_bytes());
        hasher.update(image.data());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rgb;

    fn matrix(v: f64) -> BrightnessMatrix {
        BrightnessMatrix::from_values(1, vec![v]).unwrap()
    }

    #[test]
    fn test_get_miss_then_hit() {
        let img = Image::filled(4, 4, Rgb::BLACK);
        let mut cache = ResolutionCache::new();
        assert!(cache.get(&img, 1).is_none());
        cache.put(&img, 1, matrix(0.25));
        assert_eq!(cache.get(&img, 1).unwrap().get(0, 0), 0.25);
        assert!(cache.get(&img, 2).is_none());
    }

    #[test]
    fn test_put_first_writer_wins() {
        let img = Image::filled(4, 4, Rgb::BLACK);
        let mut cache = ResolutionCache::new();
        cache.put(&img, 1, matrix(0.25));
        let stored = cache.put(&img, 1, matrix(0.75));
        assert_eq!(stored.get(0, 0), 0.25);
        assert_eq!(cache.get(&img, 1).unwrap().get(0, 0), 0.25);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_identity_keying_separates_equal_images() {
        let a = Image::filled(4, 4, Rgb::BLACK);
        let b = Image::filled(4, 4, Rgb::BLACK);
        let mut cache = ResolutionCache::with_keying(CacheKeying::Identity);
        cache.put(&a, 1, matrix(0.0));
        assert!(cache.get(&b, 1).is_none());
    }

    #[test]
    fn test_content_keying_shares_equal_images() {
        let a = Image::filled(4, 4, Rgb::BLACK);
        let b = a.clone();
        let mut cache = ResolutionCache::with_keying(CacheKeying::Content);
        cache.put(&a, 1, matrix(0.0));
        assert!(cache.get(&b, 1).is_some());
    }

    #[test]
    fn test_hash_depends_on_dimensions() {
        let wide = Image::filled(4, 2, Rgb::BLACK);
        let tall = Image::filled(2, 4, Rgb::BLACK);
        assert_ne!(
            ResolutionCache::hash_image(&wide),
            ResolutionCache::hash_image(&tall)
        );
        assert_eq!(ResolutionCache::hash_image(&wide).len(), 32);
    }
}
