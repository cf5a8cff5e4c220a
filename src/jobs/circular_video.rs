//! Face-centred circular crops of videos, kept transparent as PNG-in-MOV.
//!
//! The crop is resolved once, on the first decoded frame, and applied to the
//! whole clip. Faces that move out of the circle later on stay cut off.

use super::parent_dir;
use crate::detector::DetectorHandle;
use anyhow::{Context, Result};
use image::ImageFormat;
use rayon::prelude::*;
use reelforge_av::actions::{
    encode_png_sequence, extract_cropped_frames, extract_first_frame, list_frames,
};
use reelforge_av::{probe_video, Toolchain, Workspace};
use reelforge_common::paths::derived_path;
use reelforge_crop::{apply_circle_mask, resolve, CropConfig, FrameSize};
use std::path::{Path, PathBuf};

/// Containers picked up when scanning a directory.
pub const EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv"];

/// Stems containing these are earlier outputs or leftovers, not inputs.
pub const SKIP_MARKERS: &[&str] = &["circular", "temp_"];

/// Whether `file` is an input the directory scan should pick up.
pub fn is_candidate(file: &Path) -> bool {
    let ext_ok = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false);
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ext_ok && !SKIP_MARKERS.iter().any(|m| stem.contains(m))
}

/// `<out>/<stem>_circular.mov`; `<out>` defaults to `output/` inside the
/// scanned directory (or next to a single input file).
pub fn plan_output(input_root: &Path, file: &Path, output_dir: Option<&Path>) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None if input_root.is_dir() => input_root.join("output"),
        None => parent_dir(file).join("output"),
    };
    derived_path(&dir, file, "_circular", "mov")
}

/// Render `file` as a circular video at `output`.
pub fn process(
    tools: &Toolchain,
    file: &Path,
    output: &Path,
    crop: &CropConfig,
    detector: &DetectorHandle,
) -> Result<PathBuf> {
    let info = probe_video(tools, file)?;
    tracing::debug!(
        "{:?}: {}x{} @ {} fps ({} frames)",
        file,
        info.width,
        info.height,
        info.frame_rate_raw,
        info.frame_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string())
    );

    let workspace = Workspace::for_output(output)?;

    let first_frame = workspace.temp_file("first_frame.png");
    extract_first_frame(tools, file, &first_frame)?;
    let image = image::open(&first_frame)
        .with_context(|| format!("Failed to decode first frame of {:?}", file))?;

    // Decoded frames may be rotated relative to the stream's coded size.
    let frame = FrameSize::new(image.width(), image.height())?;
    let faces = detector.detect(&image);
    let spec = resolve(frame, &faces, crop);
    let rect = spec.pixel_rect(frame);
    tracing::debug!(
        "{:?}: {} face(s) on first frame, cropping {}x{} at ({}, {})",
        file,
        faces.len(),
        rect.side,
        rect.side,
        rect.x,
        rect.y
    );

    let frames_dir = workspace.temp_subdir("frames")?;
    extract_cropped_frames(
        tools,
        file,
        (rect.x, rect.y, rect.side),
        crop.target_size(),
        &frames_dir,
    )?;

    let frames = list_frames(&frames_dir)?;
    if frames.is_empty() {
        anyhow::bail!("No frames decoded from {:?}", file);
    }

    let supersample = crop.supersample();
    frames
        .par_iter()
        .try_for_each(|path| mask_frame(path, supersample))?;
    tracing::debug!("Masked {} frame(s) for {:?}", frames.len(), file);

    encode_png_sequence(tools, &frames_dir, &info.frame_rate_raw, workspace.output())?;

    Ok(workspace.finalize()?)
}

fn mask_frame(path: &Path, supersample: u32) -> Result<()> {
    let mut frame = image::open(path)
        .with_context(|| format!("Failed to read frame {:?}", path))?
        .to_rgba8();
    apply_circle_mask(&mut frame, supersample);
    frame
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write frame {:?}", path))?;
    Ok(())
}
