//! Circular alpha mask.
//!
//! A pixel is opaque when its centre lies within the inscribed circle of the
//! square, measured from the square's centre: `px² + py² ≤ (size/2)²`. With a
//! supersampling factor `n > 1` the alpha is the share of the `n × n`
//! sub-pixel samples that fall inside the circle.

use image::{GrayImage, Luma, RgbaImage};

fn coverage(x: u32, y: u32, size: u32, supersample: u32) -> u8 {
    let n = supersample.max(1);
    let radius = size as f64 / 2.0;
    let r2 = radius * radius;
    let step = 1.0 / n as f64;

    let mut inside = 0u32;
    for sy in 0..n {
        let py = y as f64 + (sy as f64 + 0.5) * step - radius;
        for sx in 0..n {
            let px = x as f64 + (sx as f64 + 0.5) * step - radius;
            if px * px + py * py <= r2 {
                inside += 1;
            }
        }
    }

    ((inside * 255 + (n * n) / 2) / (n * n)) as u8
}

/// Build a `size × size` mask (255 = opaque, 0 = transparent).
pub fn circle_mask(size: u32, supersample: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| Luma([coverage(x, y, size, supersample)]))
}

/// Multiply the alpha channel of a square image by the circular mask.
///
/// Non-square images are masked with the circle inscribed in their shorter
/// edge, anchored at the top-left corner.
pub fn apply_circle_mask(image: &mut RgbaImage, supersample: u32) {
    let size = image.width().min(image.height());
    let mask = circle_mask(size, supersample);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let m = if x < size && y < size {
            mask.get_pixel(x, y)[0]
        } else {
            0
        };
        pixel[3] = ((pixel[3] as u16 * m as u16 + 127) / 255) as u8;
    }
}
