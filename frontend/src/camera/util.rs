//! Frame conversion helpers for image-backed cameras

use ferrite_core::frontend::camera::{Flip, OutputFormat, Resolution};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Scale `source` to cover `resolution`, cropping the overflow evenly.
pub fn resize_to_fill(source: &RgbaImage, resolution: Resolution) -> RgbaImage {
    let (width, height) = (u32::from(resolution.width), u32::from(resolution.height));
    if source.dimensions() == (width, height) {
        return source.clone();
    }
    DynamicImage::ImageRgba8(source.clone())
        .resize_to_fill(width, height, FilterType::Triangle)
        .into_rgba8()
}

pub fn apply_flip(image: &mut RgbaImage, flip: Flip) {
    if flip.is_horizontal() {
        imageops::flip_horizontal_in_place(image);
    }
    if flip.is_vertical() {
        imageops::flip_vertical_in_place(image);
    }
}

/// Pack RGBA pixels as RGB565.
pub fn to_rgb565(image: &RgbaImage) -> Vec<u16> {
    image
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
        })
        .collect()
}

/// BT.601 studio-swing conversion of one pixel.
fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (i32, i32, i32) {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let y = ((66 * r + 129 * g + 25 * b + 128) >> 8) + 16;
    let u = ((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128;
    let v = ((112 * r - 94 * g - 18 * b + 128) >> 8) + 128;
    (y, u, v)
}

fn clamp_u8(value: i32) -> u16 {
    value.clamp(0, 255) as u16
}

/// Pack RGBA pixels as YUV422.
///
/// Each horizontal pixel pair shares the averaged chroma and is emitted as
/// `y0 | u << 8`, `y1 | v << 8`. An odd trailing pixel is paired with itself.
pub fn to_yuv422(image: &RgbaImage) -> Vec<u16> {
    let (width, height) = image.dimensions();
    let mut out = Vec::with_capacity((width * height) as usize);
    for row in 0..height {
        let mut x = 0;
        while x < width {
            let [r0, g0, b0, _] = image.get_pixel(x, row).0;
            let [r1, g1, b1, _] = image.get_pixel((x + 1).min(width - 1), row).0;
            let (y0, u0, v0) = rgb_to_yuv(r0, g0, b0);
            let (y1, u1, v1) = rgb_to_yuv(r1, g1, b1);
            let u = (u0 + u1) / 2;
            let v = (v0 + v1) / 2;

            out.push(clamp_u8(y0) | (clamp_u8(u) << 8));
            if x + 1 < width {
                out.push(clamp_u8(y1) | (clamp_u8(v) << 8));
            }
            x += 2;
        }
    }
    out
}

/// Render `source` into a camera frame.
pub fn render_frame(
    source: &RgbaImage,
    resolution: Resolution,
    flip: Flip,
    format: OutputFormat,
) -> Vec<u16> {
    let mut frame = resize_to_fill(source, resolution);
    apply_flip(&mut frame, flip);
    match format {
        OutputFormat::Rgb565 => to_rgb565(&frame),
        OutputFormat::Yuv422 => to_yuv422(&frame),
    }
}
