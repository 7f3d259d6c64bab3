use image::{ColorType, DynamicImage, GrayImage, Luma};

// ITU-R 601-2 weights in 16.16 fixed point (0.299 / 0.587 / 0.114).
pub const LUMA_R: u32 = 19595;
pub const LUMA_G: u32 = 38470;
pub const LUMA_B: u32 = 7471;

/// Perceptual luma of one 8-bit RGB sample, rounded to nearest.
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + 0x8000) >> 16) as u8
}

/// Reduce any decoded image to a single 8-bit luminance channel.
///
/// Sources that already carry only luminance keep their intensity (alpha is
/// dropped). 16-bit luminance is clipped to 255, not rescaled. Everything
/// else goes through 8-bit RGB and is weighted with [`luma_601`]; alpha
/// never contributes.
pub fn to_luma601(img: &DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma16(buf) => {
            GrayImage::from_fn(buf.width(), buf.height(), |x, y| clip16(buf.get_pixel(x, y)[0]))
        }
        DynamicImage::ImageLumaA16(buf) => {
            GrayImage::from_fn(buf.width(), buf.height(), |x, y| clip16(buf.get_pixel(x, y)[0]))
        }
        _ if matches!(img.color(), ColorType::L8 | ColorType::La8) => img.to_luma8(),
        _ => {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            let mut out = GrayImage::new(w, h);
            for (x, y, p) in rgb.enumerate_pixels() {
                out.put_pixel(x, y, Luma([luma_601(p[0], p[1], p[2])]));
            }
            out
        }
    }
}

fn clip16(v: u16) -> Luma<u8> {
    Luma([v.min(255) as u8])
}
