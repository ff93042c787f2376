//! Tests for the RGBA PNG encoder.
//!
//! Output is decoded with the `image` crate to check it is a valid PNG with
//! the expected dimensions, color type and pixels.

use badge_common::BadgeError;
use badge_renderer::png::{create_png, encode_png};
use image::{ColorType, Rgba, RgbaImage};
use test_utils::gradient_image;

#[test]
fn test_encoded_png_decodes_to_same_pixels() {
    let img = gradient_image(37, 11);
    let bytes = encode_png(&img).unwrap();

    assert_eq!(&bytes[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgba8);
    assert_eq!(decoded.to_rgba8(), img);
}

#[test]
fn test_transparency_is_preserved() {
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
    img.put_pixel(1, 2, Rgba([255, 10, 20, 128]));
    let decoded = image::load_from_memory(&encode_png(&img).unwrap())
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    assert_eq!(decoded.get_pixel(1, 2), &Rgba([255, 10, 20, 128]));
}

#[test]
fn test_rejects_empty_image() {
    assert!(matches!(create_png(&[], 0, 5), Err(BadgeError::Encode(_))));
}

#[test]
fn test_rejects_mismatched_buffer() {
    let pixels = vec![0u8; 4 * 3];
    assert!(matches!(create_png(&pixels, 2, 2), Err(BadgeError::Encode(_))));
}

#[test]
fn test_smooth_image_compresses() {
    let img = RgbaImage::from_pixel(200, 200, Rgba([226, 192, 156, 255]));
    let bytes = encode_png(&img).unwrap();
    assert!(bytes.len() < 200 * 200 * 4 / 20);
}
