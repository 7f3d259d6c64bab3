use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader};
use log::debug;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub mod luma;
pub mod paths;

pub use luma::{luma_601, to_luma601};
pub use paths::{derive_output_path, OUTPUT_PREFIX};

// --- decoding ---

/// Open and decode an image, detecting the format from the file content.
pub fn decode(input: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(input)
        .with_context(|| format!("Failed to open input image: {}", input.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read input image: {}", input.display()))?
        .decode()
        .with_context(|| format!("Failed to decode input image: {}", input.display()))?;
    Ok(img)
}

// --- encoding ---

/// Wrap a luma buffer in a pixel layout the target encoder accepts.
///
/// Most encoders take `L8` directly. The rest get the same intensities
/// replicated across RGB(A) channels, so every pixel still holds one value.
/// GIF stays lossless: a gray image never has more than 256 colours.
pub fn encodable(gray: GrayImage, format: Option<ImageFormat>) -> DynamicImage {
    let gray = DynamicImage::ImageLuma8(gray);
    match format {
        Some(ImageFormat::Gif | ImageFormat::Ico) => DynamicImage::ImageRgba8(gray.to_rgba8()),
        Some(ImageFormat::Qoi) => DynamicImage::ImageRgb8(gray.to_rgb8()),
        Some(ImageFormat::Farbfeld) => DynamicImage::ImageRgba16(gray.to_rgba16()),
        Some(ImageFormat::OpenExr | ImageFormat::Hdr) => {
            DynamicImage::ImageRgb32F(gray.to_rgb32f())
        }
        _ => gray,
    }
}

// --- conversion ---

/// Convert `input` to 8-bit grayscale and write it to the derived `bw_` path.
///
/// The output format follows the output path's extension. Returns the path written.
pub fn convert_file(input: &Path) -> Result<PathBuf> {
    let out_path = derive_output_path(input);

    let img = decode(input)?;
    debug!(
        "decoded {} ({}x{}, {:?})",
        input.display(),
        img.width(),
        img.height(),
        img.color()
    );

    let format = ImageFormat::from_path(&out_path).ok();
    encodable(to_luma601(&img), format)
        .save(&out_path)
        .with_context(|| format!("Failed to save output image: {}", out_path.display()))?;

    debug!("wrote {}", out_path.display());
    Ok(out_path)
}

/// Library entry point for in-memory callers: decode `input` (png/jpg/etc),
/// convert it to grayscale, and return it encoded as `format`.
pub fn convert_encoded_bytes(input: &[u8], format: ImageFormat) -> Result<Vec<u8>> {
    let img = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .context("Failed to read input bytes")?
        .decode()
        .context("Failed to decode input bytes as an image")?;

    let gray = encodable(to_luma601(&img), Some(format));

    let mut out: Vec<u8> = Vec::new();
    gray.write_to(&mut Cursor::new(&mut out), format)
        .with_context(|| format!("Failed to encode output as {format:?}"))?;

    debug!("converted {} bytes -> {} bytes ({format:?})", input.len(), out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, Rgb, RgbImage};

    fn red_png(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([255, 0, 0])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn encoded_red_png_becomes_single_channel_76() {
        let out = convert_encoded_bytes(&red_png(10, 10), ImageFormat::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.color(), ColorType::L8);
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
        let gray = decoded.to_luma8();
        assert!(gray.pixels().all(|p| p.0[0].abs_diff(76) <= 1));
    }

    #[test]
    fn encoded_output_is_deterministic() {
        let input = red_png(3, 4);
        let a = convert_encoded_bytes(&input, ImageFormat::Png).unwrap();
        let b = convert_encoded_bytes(&input, ImageFormat::Png).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn text_bytes_are_rejected() {
        let err = convert_encoded_bytes(b"not an image at all", ImageFormat::Png).unwrap_err();
        assert!(err.to_string().contains("Failed to decode"));
    }

    #[test]
    fn gif_output_keeps_one_intensity_per_pixel() {
        let out = convert_encoded_bytes(&red_png(4, 4), ImageFormat::Gif).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Gif);
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert!(decoded.pixels().all(|p| p[0] == p[1] && p[1] == p[2] && p[0] == 76));
    }

    #[test]
    fn encoders_without_luma_support_get_expanded_pixels() {
        let gray = GrayImage::from_pixel(2, 2, image::Luma([9]));
        assert_eq!(encodable(gray.clone(), None).color(), ColorType::L8);
        assert_eq!(encodable(gray.clone(), Some(ImageFormat::Png)).color(), ColorType::L8);
        assert_eq!(encodable(gray.clone(), Some(ImageFormat::Gif)).color(), ColorType::Rgba8);
        assert_eq!(encodable(gray, Some(ImageFormat::Qoi)).color(), ColorType::Rgb8);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = decode(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to open input image"));
    }
}
