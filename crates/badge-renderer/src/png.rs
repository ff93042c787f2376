//! PNG encoding for the finished badge.
//!
//! Badges are anti-aliased photographs of gradients and text, so they never
//! fit a 256-entry palette. Only truecolor with alpha (color type 6) is
//! written. Scanlines use the `Sub` filter, which compresses the smooth
//! horizontal runs of a downsampled badge noticeably better than `None`.

use image::RgbaImage;
use std::io::Write;

use badge_common::{BadgeError, BadgeResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG filter type 1: each byte minus the corresponding byte of the previous pixel.
const FILTER_SUB: u8 = 1;

const BYTES_PER_PIXEL: usize = 4;

/// Encode an RGBA image as PNG.
pub fn encode_png(image: &RgbaImage) -> BadgeResult<Vec<u8>> {
    create_png(
        image.as_raw(),
        image.width() as usize,
        image.height() as usize,
    )
}

/// Create a PNG image from RGBA pixel data (color type 6).
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> BadgeResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(BadgeError::Encode(format!(
            "cannot encode empty image {}x{}",
            width, height
        )));
    }
    if pixels.len() != width * height * BYTES_PER_PIXEL {
        return Err(BadgeError::Encode(format!(
            "pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            width * height * BYTES_PER_PIXEL,
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    let idat_data = deflate_idat(pixels, width, height)
        .map_err(|e| BadgeError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk: length, type, data, CRC over type + data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Filter and deflate RGBA scanlines for the IDAT chunk.
fn deflate_idat(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * BYTES_PER_PIXEL;
    let mut filtered = Vec::with_capacity(height * (1 + stride));

    for row in pixels.chunks_exact(stride) {
        filtered.push(FILTER_SUB);
        filter_sub(row, &mut filtered);
    }

    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::with_capacity(filtered.len() / 4), flate2::Compression::default());
    encoder.write_all(&filtered)?;
    encoder.finish()
}

fn filter_sub(row: &[u8], out: &mut Vec<u8>) {
    for (i, &byte) in row.iter().enumerate() {
        let left = if i >= BYTES_PER_PIXEL {
            row[i - BYTES_PER_PIXEL]
        } else {
            0
        };
        out.push(byte.wrapping_sub(left));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sub_first_pixel_untouched() {
        let row = [10, 20, 30, 40, 15, 25, 35, 45];
        let mut out = Vec::new();
        filter_sub(&row, &mut out);
        assert_eq!(out, vec![10, 20, 30, 40, 5, 5, 5, 5]);
    }

    #[test]
    fn test_filter_sub_wraps() {
        let row = [200, 0, 0, 255, 10, 0, 0, 255];
        let mut out = Vec::new();
        filter_sub(&row, &mut out);
        assert_eq!(out[4], 10u8.wrapping_sub(200));
        assert_eq!(out[7], 0);
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(create_png(&[0, 0, 0], 1, 1).is_err());
        assert!(create_png(&[], 0, 0).is_err());
    }

    #[test]
    fn test_signature_and_ihdr() {
        let png = create_png(&[255, 0, 0, 255], 1, 1).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        // color type byte sits after width, height and bit depth
        assert_eq!(png[16 + 9], 6);
    }
}
