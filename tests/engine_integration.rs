//! Integration tests for the render pipeline and its caches.
//!
//! Covers:
//! - Single-character sets fill every cell
//! - Dark and light regions map to the darkest and brightest glyphs
//! - Cold and warm caches give identical grids
//! - Each distinct character is rasterized once per engine
//! - Resolution bounds for wide images

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use ascii_art::matching::{BitmapFont, CharacterSet, CharsetCache, GlyphBitmap};
use ascii_art::raster::{pad, padding_offsets, CacheKeying, Image, ResolutionCache, Rgb};
use ascii_art::{AsciiArtEngine, AsciiArtError, ResolutionBounds};

/// Image split vertically: black on the left half, white on the right.
fn half_black(side: u32) -> Image {
    Image::from_fn(side, side, |x, _| {
        if x < side / 2 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    })
}

// ===== Grid contents =====

#[test]
fn test_single_char_fills_grid() {
    let engine = AsciiArtEngine::new();
    let img = Image::from_fn(40, 24, |x, y| Rgb::new((x * 6) as u8, (y * 10) as u8, 77));
    let grid = engine.render(&img, 16, &CharacterSet::from("0")).unwrap();

    assert_eq!(grid.size(), 16);
    assert!(grid.cells().iter().all(|&c| c == '0'));
}

#[test]
fn test_dark_and_light_halves() {
    let engine = AsciiArtEngine::new();
    let set = CharacterSet::from("0123456789");
    let index = engine.char_index(&set).unwrap();
    let darkest = index.query(0.0).unwrap();
    let brightest = index.query(1.0).unwrap();
    assert_ne!(darkest, brightest);

    let grid = engine.render(&half_black(16), 4, &set).unwrap();
    for row in grid.rows() {
        assert_eq!(row, &[darkest, darkest, brightest, brightest]);
    }
}

#[test]
fn test_ink_stands_for_dark() {
    let engine = AsciiArtEngine::new();
    let set = CharacterSet::from(" @");

    let grid = engine.render(&half_black(16), 2, &set).unwrap();
    for row in grid.rows() {
        assert_eq!(row, &['@', ' ']);
    }

    let white = engine.render(&Image::filled(8, 8, Rgb::WHITE), 2, &set).unwrap();
    assert!(white.cells().iter().all(|&c| c == ' '));
}

#[test]
fn test_padding_is_white() {
    // 16x8 black strip: top and bottom quarters of the 16x16 canvas are padding
    let engine = AsciiArtEngine::new();
    let set = CharacterSet::from("0123456789");
    let index = engine.char_index(&set).unwrap();
    let img = Image::filled(16, 8, Rgb::BLACK);

    let grid = engine.render(&img, 4, &set).unwrap();
    let brightest = index.query(1.0).unwrap();
    let darkest = index.query(0.0).unwrap();
    assert!(grid.rows().next().unwrap().iter().all(|&c| c == brightest));
    assert!(grid.rows().nth(1).unwrap().iter().all(|&c| c == darkest));
    assert!(grid.rows().nth(3).unwrap().iter().all(|&c| c == brightest));
}

#[test]
fn test_ten_by_six_is_centered() {
    let img = Image::filled(10, 6, Rgb::BLACK);
    let padded = pad(&img);
    assert_eq!((padded.width(), padded.height()), (16, 16));
    assert_eq!(padding_offsets(10, 6, 16), (3, 5));
    assert_eq!(padded.pixel(3, 5), Rgb::BLACK);
    assert_eq!(padded.pixel(12, 10), Rgb::BLACK);
    assert_eq!(padded.pixel(2, 5), Rgb::WHITE);
    assert_eq!(padded.pixel(13, 10), Rgb::WHITE);
    assert_eq!(padded.pixel(3, 11), Rgb::WHITE);
}

// ===== Caching =====

#[test]
fn test_cold_and_warm_renders_match() {
    let engine = AsciiArtEngine::new();
    let img = Image::from_fn(64, 48, |x, y| Rgb::new((x * 4) as u8, (y * 5) as u8, 128));
    let set = CharacterSet::from(" .:-=+*#%@");

    let cold = engine.render(&img, 32, &set).unwrap();
    let warm = engine.render(&img, 32, &set).unwrap();
    assert_eq!(cold, warm);
    assert_eq!(engine.cached_matrices(), 1);
    assert_eq!(engine.cached_indices(), 1);

    let fresh = AsciiArtEngine::new().render(&img, 32, &set).unwrap();
    assert_eq!(cold, fresh);
}

#[test]
fn test_each_glyph_rasterized_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let rasterizer = move |c: char| {
        counter.fetch_add(1, Ordering::SeqCst);
        let lit = (c as usize) % 9;
        GlyphBitmap::new(3, 3, (0..9).map(|i| i < lit).collect()).unwrap()
    };
    let engine = AsciiArtEngine::with_caches(ResolutionCache::new(), CharsetCache::new(rasterizer));
    let img = half_black(8);

    engine.render(&img, 2, &CharacterSet::from("abc")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Overlapping set: only 'd' is new
    engine.render(&img, 2, &CharacterSet::from("bcd")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(engine.cached_indices(), 2);

    // Same content in another order hits the index cache
    engine.render(&img, 4, &CharacterSet::from("cba")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(engine.cached_indices(), 2);
    assert_eq!(engine.cached_glyphs(), 4);
}

#[test]
fn test_resolution_cache_per_image_and_resolution() {
    let engine = AsciiArtEngine::new();
    let set = CharacterSet::from("01");
    let a = Image::filled(8, 8, Rgb::BLACK);
    let b = a.clone();

    engine.render(&a, 2, &set).unwrap();
    engine.render(&a, 4, &set).unwrap();
    engine.render(&a, 2, &set).unwrap();
    assert_eq!(engine.cached_matrices(), 2);

    // Identity keying: a clone is a different image
    engine.render(&b, 2, &set).unwrap();
    assert_eq!(engine.cached_matrices(), 3);
}

#[test]
fn test_content_keying_shares_identical_pixels() {
    let engine = AsciiArtEngine::with_caches(
        ResolutionCache::with_keying(CacheKeying::Content),
        CharsetCache::new(BitmapFont),
    );
    let set = CharacterSet::from("01");
    let a = Image::filled(8, 8, Rgb::BLACK);
    let b = a.clone();
    let c = Image::filled(8, 8, Rgb::WHITE);

    engine.render(&a, 2, &set).unwrap();
    engine.render(&b, 2, &set).unwrap();
    assert_eq!(engine.cached_matrices(), 1);

    engine.render(&c, 2, &set).unwrap();
    assert_eq!(engine.cached_matrices(), 2);
}

#[test]
fn test_shared_engine_across_threads() {
    let engine = Arc::new(AsciiArtEngine::new());
    let img = Arc::new(half_black(32));
    let set = Arc::new(CharacterSet::from("0123456789"));

    let expected = engine.render(&img, 8, &set).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let img = Arc::clone(&img);
            let set = Arc::clone(&set);
            thread::spawn(move || engine.render(&img, 8, &set).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(engine.cached_matrices(), 1);
    assert_eq!(engine.cached_indices(), 1);
}

// ===== Errors =====

#[test]
fn test_empty_charset_rejected() {
    let engine = AsciiArtEngine::new();
    let err = engine
        .render(&half_black(8), 2, &CharacterSet::new())
        .unwrap_err();
    assert_eq!(err, AsciiArtError::EmptyCharacterSet);
}

#[test]
fn test_wide_image_bounds() {
    let img = Image::filled(100, 50, Rgb::BLACK);
    let bounds = ResolutionBounds::for_image(&img);
    assert_eq!(bounds.min, 2);
    assert_eq!(bounds.max, 100);
    assert_eq!(
        bounds.validate(1),
        Err(AsciiArtError::ExceedsResolutionBounds {
            requested: 1,
            min: 2,
            max: 100,
        })
    );
    assert!(bounds.validate(2).is_ok());
}
