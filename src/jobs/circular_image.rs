//! Face-centred circular crops of still images.

use super::parent_dir;
use crate::detector::DetectorHandle;
use anyhow::{Context, Result};
use image::ImageFormat;
use reelforge_av::Workspace;
use reelforge_common::paths::derived_path;
use reelforge_crop::{
    render_circular, resolve, select_face, CropConfig, CropSpec, FaceRect, FrameSize, PixelRect,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory name for default outputs; also skipped when discovering inputs.
pub const OUTPUT_DIR: &str = "circular";

/// `<out>/<stem>_circular.png`, with `<out>` defaulting to a `circular/`
/// directory next to the image.
pub fn plan_output(file: &Path, output_dir: Option<&Path>) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => parent_dir(file).join(OUTPUT_DIR),
    };
    derived_path(&dir, file, "_circular", "png")
}

/// Crop `file` into a circular PNG at `output`.
pub fn process(
    file: &Path,
    output: &Path,
    crop: &CropConfig,
    detector: &DetectorHandle,
) -> Result<PathBuf> {
    let image = image::open(file).with_context(|| format!("Failed to read image {:?}", file))?;
    let frame = FrameSize::new(image.width(), image.height())?;

    let faces = detector.detect(&image);
    let spec = resolve(frame, &faces, crop);
    tracing::debug!(
        "{:?}: {} face(s), crop centre ({:.1}, {:.1}) side {:.1}",
        file,
        faces.len(),
        spec.cx,
        spec.cy,
        spec.side
    );

    let circle = render_circular(&image, &spec, crop)?;

    let workspace = Workspace::for_output(output)?;
    circle
        .save_with_format(workspace.output(), ImageFormat::Png)
        .with_context(|| format!("Failed to write {:?}", output))?;

    Ok(workspace.finalize()?)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameReport {
    pub width: u32,
    pub height: u32,
}

/// Everything the resolver saw and decided for one image.
#[derive(Debug, Clone, Serialize)]
pub struct CropReport {
    pub file: PathBuf,
    pub frame: FrameReport,
    pub detector_available: bool,
    pub faces: Vec<FaceRect>,
    pub selected: Option<FaceRect>,
    pub crop: CropSpec,
    pub pixel_rect: PixelRect,
    pub target_size: u32,
}

/// Resolve `file` without rendering anything.
pub fn inspect(file: &Path, crop: &CropConfig, detector: &DetectorHandle) -> Result<CropReport> {
    let image = image::open(file).with_context(|| format!("Failed to read image {:?}", file))?;
    let frame = FrameSize::new(image.width(), image.height())?;

    let faces = detector.detect(&image);
    let spec = resolve(frame, &faces, crop);

    Ok(CropReport {
        file: file.to_path_buf(),
        frame: FrameReport {
            width: frame.width(),
            height: frame.height(),
        },
        detector_available: detector.is_available(),
        selected: select_face(frame, &faces),
        faces,
        crop: spec,
        pixel_rect: spec.pixel_rect(frame),
        target_size: crop.target_size(),
    })
}
