//! Conversion between encoded images, cairo surfaces and output encodings.

use std::io::Cursor;

use cairo::{Format, ImageSurface};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use super::CaptionError;
use crate::config::FileType;

/// Decodes any supported image format into RGBA pixels.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, CaptionError> {
    if bytes.is_empty() {
        return Err(CaptionError::Decode("image buffer is empty".to_string()));
    }
    let image = image::load_from_memory(bytes).map_err(|e| CaptionError::Decode(e.to_string()))?;
    Ok(image.to_rgba8())
}

/// Copies RGBA pixels into a new ARGB32 surface (premultiplied, native endian).
pub fn rgba_to_surface(image: &RgbaImage) -> Result<ImageSurface, CaptionError> {
    let (width, height) = image.dimensions();
    let mut surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
    let stride = surface.stride() as usize;

    {
        let mut data = surface.data()?;
        for (y, row) in image.rows().enumerate() {
            let line = &mut data[y * stride..y * stride + width as usize * 4];
            for (pixel, out) in row.zip(line.chunks_exact_mut(4)) {
                let [r, g, b, a] = pixel.0;
                let premul = |c: u8| (c as u32 * a as u32 + 127) / 255;
                let argb = (a as u32) << 24 | premul(r) << 16 | premul(g) << 8 | premul(b);
                out.copy_from_slice(&argb.to_ne_bytes());
            }
        }
    }

    surface.mark_dirty();
    Ok(surface)
}

/// Reads an ARGB32 surface back as tightly packed, opaque RGB.
///
/// Colour channels are un-premultiplied before alpha is discarded.
pub fn surface_to_rgb(surface: &mut ImageSurface) -> Result<(u32, u32, Vec<u8>), CaptionError> {
    surface.flush();
    let width = surface.width() as usize;
    let height = surface.height() as usize;
    let stride = surface.stride() as usize;
    let data = surface.data()?;
    Ok((width as u32, height as u32, argb32_to_rgb(&data, width, height, stride)))
}

/// Converts premultiplied native-endian ARGB32 rows into RGB triples.
pub fn argb32_to_rgb(data: &[u8], width: usize, height: usize, stride: usize) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row = &data[y * stride..y * stride + width * 4];
        for px in row.chunks_exact(4) {
            let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
            let a = argb >> 24;
            let unpremul = |c: u32| {
                if a == 0 {
                    0
                } else {
                    ((c * 255 + a / 2) / a).min(255) as u8
                }
            };
            rgb.push(unpremul((argb >> 16) & 0xff));
            rgb.push(unpremul((argb >> 8) & 0xff));
            rgb.push(unpremul(argb & 0xff));
        }
    }
    rgb
}

/// Maps the 0-9 level onto the PNG encoder's effort presets.
pub fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Maps the 0-9 level onto a JPEG quality; higher levels compress harder.
pub fn jpeg_quality(level: u8) -> u8 {
    100 - level.min(9) * 5
}

/// Encodes RGB pixels in the requested file type.
pub fn encode_rgb(
    width: u32,
    height: u32,
    rgb: &[u8],
    file_type: FileType,
    compression_level: u8,
) -> Result<Vec<u8>, CaptionError> {
    let mut out = Cursor::new(Vec::new());
    let result = match file_type {
        FileType::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut out,
                png_compression(compression_level),
                FilterType::Adaptive,
            );
            encoder.write_image(rgb, width, height, ExtendedColorType::Rgb8)
        }
        FileType::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality(compression_level));
            encoder.write_image(rgb, width, height, ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| CaptionError::Encode(e.to_string()))?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    #[test]
    fn argb_is_unpremultiplied_and_alpha_dropped() {
        // Half-transparent pure red, premultiplied: a=128, r=128.
        let argb: u32 = 128 << 24 | 128 << 16;
        let rgb = argb32_to_rgb(&argb.to_ne_bytes(), 1, 1, 4);
        assert_eq!(rgb, vec![255, 0, 0]);
    }

    #[test]
    fn fully_transparent_pixels_become_black() {
        let rgb = argb32_to_rgb(&0u32.to_ne_bytes(), 1, 1, 4);
        assert_eq!(rgb, vec![0, 0, 0]);
    }

    #[test]
    fn stride_padding_is_skipped() {
        let mut data = Vec::new();
        data.extend_from_slice(&(0xff00_ff00u32).to_ne_bytes());
        data.extend_from_slice(&[9, 9, 9, 9]);
        data.extend_from_slice(&(0xff00_00ffu32).to_ne_bytes());
        data.extend_from_slice(&[9, 9, 9, 9]);
        let rgb = argb32_to_rgb(&data, 1, 2, 8);
        assert_eq!(rgb, vec![0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn surface_round_trip_keeps_opaque_pixels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 200, 30, 255]));
        let mut surface = rgba_to_surface(&image).unwrap();
        let (w, h, rgb) = surface_to_rgb(&mut surface).unwrap();
        assert_eq!((w, h), (3, 2));
        assert!(rgb.chunks(3).all(|px| px == [10, 200, 30]));
    }

    #[test]
    fn encodes_png_and_jpeg() {
        let rgb = vec![128u8; 4 * 4 * 3];
        let png = encode_rgb(4, 4, &rgb, FileType::Png, 9).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let jpeg = encode_rgb(4, 4, &rgb, FileType::Jpeg, 6).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(decode_rgba(b"not an image"), Err(CaptionError::Decode(_))));
        assert!(matches!(decode_rgba(&[]), Err(CaptionError::Decode(_))));
    }

    #[test]
    fn compression_levels_map_to_presets() {
        assert!(matches!(png_compression(0), CompressionType::Fast));
        assert!(matches!(png_compression(6), CompressionType::Default));
        assert!(matches!(png_compression(9), CompressionType::Best));
        assert_eq!(jpeg_quality(0), 100);
        assert_eq!(jpeg_quality(9), 55);
    }
}
