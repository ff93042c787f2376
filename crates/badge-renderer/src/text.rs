//! Single-line text measurement and drawing.
//!
//! Glyphs are laid out and rasterized with rusttype. Layout follows rusttype's
//! own single-line layout (advance widths plus pair kerning) and adds the
//! letter spacing after every character, so measuring and drawing share one
//! set of glyph positions. Boldness is simulated by dilating the glyph
//! coverage mask with imageproc before compositing. There is no wrapping.

use image::{GrayImage, Pixel, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::fmt;
use tracing::warn;

use crate::assets::AssetProvider;

/// Advance of one character in the fallback face is `size * 3 / 5`.
fn fallback_advance(size: f32) -> f32 {
    size * 3.0 / 5.0
}

/// A parsed font, or the metric-only fallback used when no font is available.
#[derive(Clone)]
pub enum FontFace {
    TrueType(Font<'static>),
    /// Deterministic metrics, draws nothing.
    Fallback,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::TrueType(_) => f.write_str("FontFace::TrueType"),
            FontFace::Fallback => f.write_str("FontFace::Fallback"),
        }
    }
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(FontFace::TrueType)
    }

    /// First readable font among absolute system paths.
    pub fn from_system(candidates: &[String]) -> Option<Self> {
        candidates.iter().find_map(|path| {
            let bytes = std::fs::read(path).ok()?;
            Self::from_bytes(bytes)
        })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FontFace::Fallback)
    }
}

/// Where a resolved font face came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSource {
    /// Loaded from the asset provider under the name at this index of the request.
    Asset(usize),
    System,
    Fallback,
}

/// Resolve a face: each asset name in order, then system fonts, then the fallback face.
pub fn resolve_face(
    provider: &dyn AssetProvider,
    names: &[&str],
    system_fonts: &[String],
) -> (FontFace, FaceSource) {
    for (i, name) in names.iter().enumerate() {
        if let Some(face) = provider.load_font_face(name) {
            return (face, FaceSource::Asset(i));
        }
    }
    if let Some(face) = FontFace::from_system(system_fonts) {
        return (face, FaceSource::System);
    }
    warn!(fonts = ?names, "No font available, text will be laid out without glyphs");
    (FontFace::Fallback, FaceSource::Fallback)
}

/// A face at a pixel size.
#[derive(Debug, Clone)]
pub struct BadgeFont {
    face: FontFace,
    size: f32,
}

impl BadgeFont {
    pub fn new(face: FontFace, size: f32) -> Self {
        Self {
            face,
            size: size.max(1.0),
        }
    }

    pub fn fallback(size: f32) -> Self {
        Self::new(FontFace::Fallback, size)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    fn scale(&self) -> Scale {
        Scale::uniform(self.size)
    }
}

/// Lay `text` out on one line with its baseline at the font's ascent.
///
/// Pairs are kerned and `letter_spacing` is added after every character. At
/// zero spacing this matches `Font::layout` exactly.
fn layout_glyphs(
    font: &Font<'static>,
    scale: Scale,
    text: &str,
    letter_spacing: f32,
) -> Vec<PositionedGlyph<'static>> {
    let ascent = font.v_metrics(scale).ascent;
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut last = None;
    for ch in text.chars() {
        let glyph = font.glyph(ch).scaled(scale);
        if let Some(prev) = last {
            caret += font.pair_kerning(scale, prev, glyph.id());
        }
        last = Some(glyph.id());
        let advance = glyph.h_metrics().advance_width;
        glyphs.push(glyph.positioned(point(caret, ascent)));
        caret += advance + letter_spacing;
    }
    glyphs
}

/// Right and bottom pixel extent of laid-out glyphs, measured from the origin.
fn glyph_extent(glyphs: &[PositionedGlyph<'_>]) -> (u32, u32) {
    let (mut w, mut h) = (0i32, 0i32);
    for bb in glyphs.iter().filter_map(|g| g.pixel_bounding_box()) {
        w = w.max(bb.max.x);
        h = h.max(bb.max.y);
    }
    (w.max(0) as u32, h.max(0) as u32)
}

/// Measure `text` as `(width, height)`.
///
/// Width is the right edge of the last inked pixel with glyphs advanced by
/// their advance width, pair kerning and `letter_spacing`. At zero spacing
/// this is the font's native bounding box, and it grows continuously and
/// monotonically with the spacing.
pub fn measure(text: &str, font: &BadgeFont, letter_spacing: f32) -> (u32, u32) {
    if text.is_empty() {
        return (0, 0);
    }
    match &font.face {
        FontFace::TrueType(ttf) => {
            glyph_extent(&layout_glyphs(ttf, font.scale(), text, letter_spacing))
        }
        FontFace::Fallback => {
            let chars = text.chars().count() as f32;
            let width = chars * fallback_advance(font.size) + (chars - 1.0) * letter_spacing;
            (width.max(0.0).round() as u32, font.size.ceil() as u32)
        }
    }
}

/// X offset that centers a block of `width` on a canvas of `canvas_width`.
pub fn centered_x(canvas_width: u32, width: u32) -> i32 {
    (canvas_width as i32 - width as i32) / 2
}

/// Part of the canvas a text block can touch, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MaskWindow {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Window for a coverage mask: the ink bounds `(left, top, right, bottom)`
/// grown by `pad`, intersected with the canvas grown by `pad`.
///
/// Ink farther than `pad` outside the canvas cannot dilate onto it, so the
/// mask never exceeds the canvas by more than `pad` on any side.
pub(crate) fn mask_window(
    ink: (i32, i32, i32, i32),
    pad: i32,
    canvas: (u32, u32),
) -> Option<MaskWindow> {
    let left = (ink.0 - pad).max(-pad);
    let top = (ink.1 - pad).max(-pad);
    let right = (ink.2 + pad).min(canvas.0 as i32 + pad);
    let bottom = (ink.3 + pad).min(canvas.1 as i32 + pad);
    if left >= right || top >= bottom {
        return None;
    }
    Some(MaskWindow {
        x: left,
        y: top,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// Draw `text` with its layout box's top-left at `position`.
///
/// `stroke_px` thickens every glyph outline by that many pixels in the same
/// color. Only the part of the text that can reach the canvas is rasterized.
/// Returns the measured `(width, height)`, identical to [`measure`].
pub fn draw_bold(
    canvas: &mut RgbaImage,
    position: (i32, i32),
    text: &str,
    font: &BadgeFont,
    color: Rgba<u8>,
    stroke_px: u32,
    letter_spacing: f32,
) -> (u32, u32) {
    let ttf = match &font.face {
        FontFace::TrueType(ttf) => ttf,
        FontFace::Fallback => return measure(text, font, letter_spacing),
    };
    if text.is_empty() {
        return (0, 0);
    }

    let glyphs = layout_glyphs(ttf, font.scale(), text, letter_spacing);
    let size = glyph_extent(&glyphs);

    let ink = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32, i32, i32)>, bb| {
            let (l, t, r, b) = acc.unwrap_or((bb.min.x, bb.min.y, bb.max.x, bb.max.y));
            Some((l.min(bb.min.x), t.min(bb.min.y), r.max(bb.max.x), b.max(bb.max.y)))
        })
        .map(|(l, t, r, b)| (l + position.0, t + position.1, r + position.0, b + position.1));
    let Some(ink) = ink else {
        return size;
    };

    let pad = stroke_px.min(u8::MAX as u32) as i32;
    let Some(window) = mask_window(ink, pad, canvas.dimensions()) else {
        return size;
    };

    let mut mask = GrayImage::new(window.width, window.height);
    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        let left = position.0 + bb.min.x - window.x;
        let top = position.1 + bb.min.y - window.y;
        if left >= window.width as i32
            || top >= window.height as i32
            || left + bb.width() <= 0
            || top + bb.height() <= 0
        {
            continue;
        }
        glyph.draw(|gx, gy, v| {
            let mx = left + gx as i32;
            let my = top + gy as i32;
            if mx < 0 || my < 0 || mx >= window.width as i32 || my >= window.height as i32 {
                return;
            }
            let value = (v * 255.0).round().clamp(0.0, 255.0) as u8;
            let px = mask.get_pixel_mut(mx as u32, my as u32);
            px[0] = px[0].max(value);
        });
    }

    let stroked = if pad > 0 {
        Some(dilate(&mask, Norm::LInf, pad as u8))
    } else {
        None
    };

    for (mx, my, coverage) in mask.enumerate_pixels() {
        let mut alpha = coverage[0];
        if let Some(stroked) = &stroked {
            alpha = alpha.max(stroked.get_pixel(mx, my)[0]);
        }
        if alpha == 0 {
            continue;
        }
        let x = window.x + mx as i32;
        let y = window.y + my as i32;
        if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
            continue;
        }
        let scaled_alpha = (alpha as u16 * color[3] as u16 / 255) as u8;
        canvas
            .get_pixel_mut(x as u32, y as u32)
            .blend(&Rgba([color[0], color[1], color[2], scaled_alpha]));
    }

    size
}
