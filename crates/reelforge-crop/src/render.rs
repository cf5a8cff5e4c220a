//! Turn a resolved crop into the final circular image.

use crate::geometry::{CropConfig, CropSpec, FrameSize};
use crate::mask::apply_circle_mask;
use crate::Result;
use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, RgbaImage};

/// Cut the crop square out of `image`, resample it to the configured target
/// size with Lanczos3 and mask it into a circle.
///
/// # Errors
///
/// Returns [`crate::Error::ZeroDimensions`] for an empty image.
pub fn render_circular(
    image: &DynamicImage,
    crop: &CropSpec,
    config: &CropConfig,
) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    let frame = FrameSize::new(width, height)?;
    let rect = crop.pixel_rect(frame);

    let square = imageops::crop_imm(image, rect.x, rect.y, rect.side, rect.side).to_image();
    let target = config.target_size();
    let mut output = if rect.side == target {
        square
    } else {
        imageops::resize(&square, target, target, FilterType::Lanczos3)
    };

    apply_circle_mask(&mut output, config.supersample());
    Ok(output)
}
