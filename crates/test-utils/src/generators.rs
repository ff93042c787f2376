//! Synthetic image assets.
//!
//! These generators create small, predictable images that stand in for the
//! background, card and icon artwork in tests.

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::fixtures::{BACKGROUND_ASSET, CARD_ASSETS, ICON_ASSETS};

/// A single-color RGBA image.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Encode an image as PNG bytes.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut buf, ImageOutputFormat::Png)
        .expect("Failed to encode test PNG");
    buf.into_inner()
}

/// A single-color PNG.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    png_bytes(&solid_image(width, height, rgba))
}

/// A horizontal gradient, red increasing left to right.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        let red = (x * 255 / width.max(1)) as u8;
        Rgba([red, 64, 128, 255])
    })
}

/// Every raster asset the default configuration names, as `(name, png)` pairs.
///
/// Cards are 317x200 (aspect 1.585), icons 32x32 and the background 100x115.
pub fn standard_image_assets() -> Vec<(String, Vec<u8>)> {
    let mut assets = vec![(
        BACKGROUND_ASSET.to_string(),
        solid_png(100, 115, [226, 192, 156, 255]),
    )];
    for name in CARD_ASSETS {
        assets.push((name.to_string(), solid_png(317, 200, [20, 20, 20, 255])));
    }
    for name in ICON_ASSETS {
        assets.push((name.to_string(), solid_png(32, 32, [200, 30, 30, 255])));
    }
    assets
}

/// Write `(name, bytes)` pairs into `dir`.
pub fn write_assets(dir: &Path, assets: &[(String, Vec<u8>)]) {
    for (name, bytes) in assets {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create asset directory");
        }
        std::fs::write(&path, bytes).expect("Failed to write test asset");
    }
}
