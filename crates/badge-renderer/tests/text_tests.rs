//! Tests for text measurement and bold drawing.
//!
//! Glyph tests need a TrueType font and are skipped when none is installed.

use badge_renderer::text::{centered_x, draw_bold, measure, BadgeFont, FontFace};
use image::{Rgba, RgbaImage};
use imageproc::drawing::text_size;
use rusttype::{Font, Scale};
use test_utils::require_font;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn covered(img: &RgbaImage) -> usize {
    img.pixels().filter(|p| p[0] > 0).count()
}

#[test]
fn test_fallback_width_grows_with_spacing() {
    let font = BadgeFont::fallback(20.0);
    let widths: Vec<u32> = [0.0, 1.0, 2.0, 4.0, 8.0]
        .iter()
        .map(|s| measure("PLATINUM", &font, *s).0)
        .collect();
    assert!(widths.windows(2).all(|w| w[0] < w[1]), "{:?}", widths);
    // 8 chars * 12 px + 7 gaps * 8 px
    assert_eq!(widths[4], 96 + 56);
}

#[test]
fn test_fallback_height_is_font_size() {
    let font = BadgeFont::fallback(34.0);
    assert_eq!(measure("GOLD", &font, 4.0).1, 34);
}

#[test]
fn test_zero_spacing_matches_native_measurement() {
    let bytes = require_font!();
    let rt = Font::try_from_vec(bytes.clone()).unwrap();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 40.0);

    let (w, h) = text_size(Scale::uniform(40.0), &rt, "12,345 Reward Points");
    assert_eq!(
        measure("12,345 Reward Points", &font, 0.0),
        (w as u32, h as u32)
    );
}

#[test]
fn test_real_font_width_increases_with_spacing() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 40.0);
    let w1 = measure("SILVER", &font, 1.0).0;
    let w4 = measure("SILVER", &font, 4.0).0;
    let w8 = measure("SILVER", &font, 8.0).0;
    assert!(w1 < w4 && w4 < w8);
    // Five gaps between six characters
    assert!((w8 as i64 - w4 as i64 - 20).abs() <= 1);
}

#[test]
fn test_real_font_measure_is_continuous_at_zero_spacing() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 272.0);

    for text in ["GOLD", "SILVER", "PLATINUM", "DIAMOND", "CLASSIC", "To achieve Gold"] {
        let native = measure(text, &font, 0.0);
        let nudged = measure(text, &font, 0.001);
        assert!(
            nudged.0 >= native.0 && nudged.0 <= native.0 + 1,
            "{text}: {native:?} vs {nudged:?}"
        );
        assert_eq!(native.1, nudged.1, "{text}");
    }
}

#[test]
fn test_real_font_measure_is_monotonic_in_spacing() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 272.0);

    for text in ["GOLD", "PLATINUM", "AV"] {
        let widths: Vec<u32> = [0.0, 0.001, 0.5, 1.0, 4.0, 32.0]
            .iter()
            .map(|s| measure(text, &font, *s).0)
            .collect();
        assert!(widths.windows(2).all(|w| w[0] <= w[1]), "{text}: {widths:?}");
        assert!(widths[5] > widths[0], "{text}: {widths:?}");
    }
}

#[test]
fn test_very_long_text_draws_only_what_fits() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 272.0);
    let text = "W".repeat(3000);
    let mut img = RgbaImage::new(3200, 400);

    let started = std::time::Instant::now();
    let drawn = draw_bold(&mut img, (-1000, 20), &text, &font, WHITE, 8, 32.0);
    let elapsed = started.elapsed();

    assert_eq!(drawn, measure(&text, &font, 32.0));
    assert!(drawn.0 > 3200 * 100);
    assert!(covered(&img) > 0);
    assert!(elapsed < std::time::Duration::from_secs(10), "{elapsed:?}");
}

#[test]
fn test_stroke_thickens_glyphs() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 32.0);

    let mut plain = RgbaImage::new(240, 60);
    let mut bold = RgbaImage::new(240, 60);
    let size_plain = draw_bold(&mut plain, (4, 4), "GOLD", &font, WHITE, 0, 0.0);
    let size_bold = draw_bold(&mut bold, (4, 4), "GOLD", &font, WHITE, 2, 0.0);

    assert_eq!(size_plain, size_bold);
    assert!(covered(&plain) > 0);
    assert!(covered(&bold) > covered(&plain));
}

#[test]
fn test_draw_returns_measurement() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 24.0);
    let mut img = RgbaImage::new(300, 50);
    let drawn = draw_bold(&mut img, (0, 0), "DIAMOND", &font, WHITE, 1, 3.0);
    assert_eq!(drawn, measure("DIAMOND", &font, 3.0));
}

#[test]
fn test_text_is_clipped_at_canvas_edges() {
    let bytes = require_font!();
    let font = BadgeFont::new(FontFace::from_bytes(bytes).unwrap(), 24.0);
    let mut img = RgbaImage::new(20, 10);
    draw_bold(&mut img, (-30, -5), "CLASSIC", &font, WHITE, 2, 0.0);
    assert_eq!(img.dimensions(), (20, 10));
}

#[test]
fn test_centering() {
    assert_eq!(centered_x(3200, 800), 1200);
    assert_eq!(centered_x(401, 100), 150);
}
