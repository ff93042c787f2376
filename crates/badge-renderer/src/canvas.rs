//! Supersampled drawing surface.
//!
//! The canvas is `target × scale` pixels. All geometry is drawn at that size
//! and the result is downsampled once, at the end, with a Lanczos filter.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use rayon::prelude::*;

use badge_common::{BadgeError, BadgeResult, CanvasConfig, Rgb};

/// RGBA pixel buffer drawn at a multiple of the output size.
#[derive(Debug, Clone)]
pub struct SupersampledCanvas {
    image: RgbaImage,
    scale: u32,
    target_width: u32,
    target_height: u32,
}

impl SupersampledCanvas {
    /// Canvas showing `background` stretched to fill it, or a flat `fallback` color.
    pub fn new(
        config: &CanvasConfig,
        background: Option<&RgbaImage>,
        fallback: Rgb,
    ) -> BadgeResult<Self> {
        let width = config
            .target_width
            .checked_mul(config.scale_factor)
            .ok_or_else(|| BadgeError::Render("canvas width overflows".to_string()))?;
        let height = config
            .target_height
            .checked_mul(config.scale_factor)
            .ok_or_else(|| BadgeError::Render("canvas height overflows".to_string()))?;

        let image = match background {
            Some(bg) if bg.dimensions() == (width, height) => bg.clone(),
            Some(bg) if bg.width() > 0 && bg.height() > 0 => {
                imageops::resize(bg, width, height, FilterType::Lanczos3)
            }
            _ => RgbaImage::from_pixel(width, height, Rgba(fallback.opaque())),
        };

        Ok(Self {
            image,
            scale: config.scale_factor,
            target_width: config.target_width,
            target_height: config.target_height,
        })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Convert a target-pixel length to canvas pixels.
    pub fn px(&self, target: f32) -> f32 {
        target * self.scale as f32
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Alpha-composite a full-canvas layer of `color` at opacity `alpha` (0..=1).
    pub fn apply_tint(&mut self, color: Rgb, alpha: f32) {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        if a == 0 {
            return;
        }
        let overlay = Rgba(color.with_alpha(a));
        self.image
            .par_chunks_exact_mut(4)
            .for_each(|px| {
                let mut pixel = Rgba([px[0], px[1], px[2], px[3]]);
                pixel.blend(&overlay);
                px.copy_from_slice(&pixel.0);
            });
    }

    /// Alpha-composite `top` with its top-left corner at `(x, y)`.
    pub fn overlay(&mut self, top: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.image, top, x, y);
    }

    /// Resize `image` to `width` (canvas pixels) keeping its aspect ratio,
    /// paste it horizontally centered at `y`, and return its pasted height.
    pub fn paste_centered_width(&mut self, image: &RgbaImage, width: u32, y: i64) -> u32 {
        if image.width() == 0 || image.height() == 0 || width == 0 {
            return 0;
        }
        let height =
            ((width as f64 * image.height() as f64 / image.width() as f64).round() as u32).max(1);
        let resized = imageops::resize(image, width, height, FilterType::Lanczos3);
        let x = (self.width() as i64 - width as i64) / 2;
        self.overlay(&resized, x, y);
        height
    }

    /// Disc of `backing_diameter` centered at `center`, with `icon` scaled to
    /// `icon_size` pasted in its middle. Without an icon only the disc is drawn.
    pub fn paste_icon_badge(
        &mut self,
        center: (f32, f32),
        backing_diameter: f32,
        backing: Rgb,
        icon: Option<&RgbaImage>,
        icon_size: f32,
    ) {
        let cx = center.0.round() as i32;
        let cy = center.1.round() as i32;
        let radius = (backing_diameter / 2.0).round() as i32;
        draw_filled_circle_mut(&mut self.image, (cx, cy), radius, Rgba(backing.opaque()));

        let Some(icon) = icon else {
            return;
        };
        let size = icon_size.round().max(1.0) as u32;
        if icon.width() == 0 || icon.height() == 0 {
            return;
        }
        let resized = imageops::resize(icon, size, size, FilterType::Lanczos3);
        let x = cx as i64 - size as i64 / 2;
        let y = cy as i64 - size as i64 / 2;
        self.overlay(&resized, x, y);
    }

    /// Downsample to the target size. The only resize of the composed badge.
    pub fn downsample(&self) -> RgbaImage {
        if self.scale == 1 {
            return self.image.clone();
        }
        imageops::resize(
            &self.image,
            self.target_width,
            self.target_height,
            FilterType::Lanczos3,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(px: &Rgba<u8>, expected: [u8; 4]) {
        for (got, want) in px.0.iter().zip(expected) {
            assert!(
                (*got as i32 - want as i32).abs() <= 1,
                "pixel {:?} differs from {:?}",
                px,
                expected
            );
        }
    }

    fn config(scale: u32) -> CanvasConfig {
        CanvasConfig {
            target_width: 20,
            target_height: 10,
            scale_factor: scale,
        }
    }

    #[test]
    fn test_canvas_is_supersampled() {
        let canvas = SupersampledCanvas::new(&config(4), None, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (80, 40));
        assert_eq!(canvas.image().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
        assert_eq!(canvas.px(2.5), 10.0);
    }

    #[test]
    fn test_background_is_stretched() {
        let bg = RgbaImage::from_pixel(5, 5, Rgba([9, 9, 9, 255]));
        let canvas = SupersampledCanvas::new(&config(2), Some(&bg), Rgb::WHITE).unwrap();
        assert_eq!(canvas.image().dimensions(), (40, 20));
        assert_close(canvas.image().get_pixel(20, 10), [9, 9, 9, 255]);
    }

    #[test]
    fn test_tint_blends_toward_color() {
        let mut canvas = SupersampledCanvas::new(&config(1), None, Rgb::new(0, 0, 0)).unwrap();
        canvas.apply_tint(Rgb::new(200, 100, 0), 0.5);
        let px = canvas.image().get_pixel(3, 3);
        assert!((px[0] as i32 - 100).abs() <= 1);
        assert!((px[1] as i32 - 50).abs() <= 1);
        assert_eq!(px[2], 0);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_zero_tint_is_noop() {
        let mut canvas = SupersampledCanvas::new(&config(1), None, Rgb::new(7, 7, 7)).unwrap();
        let before = canvas.image().clone();
        canvas.apply_tint(Rgb::WHITE, 0.0);
        assert_eq!(canvas.image(), &before);
    }

    #[test]
    fn test_downsample_to_target() {
        let canvas = SupersampledCanvas::new(&config(4), None, Rgb::new(50, 60, 70)).unwrap();
        let out = canvas.downsample();
        assert_eq!(out.dimensions(), (20, 10));
        assert_close(out.get_pixel(10, 5), [50, 60, 70, 255]);
    }

    #[test]
    fn test_paste_centered_width_keeps_aspect() {
        let mut canvas = SupersampledCanvas::new(&config(4), None, Rgb::WHITE).unwrap();
        let card = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255]));
        let h = canvas.paste_centered_width(&card, 20, 4);
        assert_eq!(h, 10);
        assert_close(canvas.image().get_pixel(40, 8), [0, 0, 255, 255]);
        assert_eq!(canvas.image().get_pixel(25, 8), &Rgba([255, 255, 255, 255]));
    }
}
