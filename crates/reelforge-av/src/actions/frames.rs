//! Frame extraction and PNG-sequence encoding for the circular video path.

use crate::tools::Toolchain;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Filename pattern used for extracted frame sequences.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

/// Decode the first video frame of `input` into a PNG at `output`.
pub fn extract_first_frame(tools: &Toolchain, input: &Path, output: &Path) -> Result<()> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }

    let mut cmd = tools.ffmpeg();
    cmd.arg("-i")
        .path_arg(input)
        .args(["-frames:v", "1", "-update", "1"])
        .path_arg(output);
    cmd.execute()?;

    if !output.exists() {
        return Err(Error::tool_failed(
            "ffmpeg",
            format!("no frame could be decoded from {:?}", input),
        ));
    }
    Ok(())
}

/// `crop` + `scale` filter for a square region resampled to `size × size`.
///
/// `exact=1` stops ffmpeg from rounding odd offsets to the chroma grid of
/// subsampled formats such as yuv420p.
pub fn crop_scale_filter(x: u32, y: u32, side: u32, size: u32) -> String {
    format!(
        "crop={side}:{side}:{x}:{y}:exact=1,scale={size}:{size}:flags=lanczos,format=rgba"
    )
}

/// Crop every frame of `input` to the square at `(x, y)` with edge `side`,
/// resample to `size`, and write the frames as RGBA PNGs into `dir`.
pub fn extract_cropped_frames(
    tools: &Toolchain,
    input: &Path,
    (x, y, side): (u32, u32, u32),
    size: u32,
    dir: &Path,
) -> Result<()> {
    if side == 0 || size == 0 {
        return Err(Error::InvalidInput(format!(
            "crop side and output size must be positive ({side}, {size})"
        )));
    }

    let mut cmd = tools.ffmpeg();
    cmd.arg("-i")
        .path_arg(input)
        .arg("-vf")
        .arg(crop_scale_filter(x, y, side, size))
        .path_arg(&dir.join(FRAME_PATTERN));
    cmd.execute()?;
    Ok(())
}

/// Frames written by [`extract_cropped_frames`], in order.
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("frame_") && n.ends_with(".png"))
        })
        .collect();
    frames.sort();
    Ok(frames)
}

/// Encode the PNG sequence in `dir` at `framerate` into a MOV with the PNG
/// codec, which keeps the alpha channel.
pub fn encode_png_sequence(
    tools: &Toolchain,
    dir: &Path,
    framerate: &str,
    output: &Path,
) -> Result<()> {
    let mut cmd = tools.ffmpeg();
    cmd.args(["-framerate", framerate])
        .arg("-i")
        .path_arg(&dir.join(FRAME_PATTERN))
        .args(["-c:v", "png"])
        .path_arg(output);
    cmd.execute()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_scale_filter() {
        assert_eq!(
            crop_scale_filter(300, 198, 300, 500),
            "crop=300:300:300:198:exact=1,scale=500:500:flags=lanczos,format=rgba"
        );
        assert!(crop_scale_filter(37, 611, 73, 64).starts_with("crop=73:73:37:611:exact=1,"));
    }

    #[test]
    fn test_list_frames_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame_000002.png", "frame_000001.png", "palette.png", "frame_000010.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let frames = list_frames(dir.path()).unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["frame_000001.png", "frame_000002.png", "frame_000010.png"]
        );
    }

    #[test]
    fn test_zero_side_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Toolchain::from_paths("ffmpeg", "ffprobe");
        let err = extract_cropped_frames(&tools, Path::new("in.mp4"), (0, 0, 0), 500, dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_first_frame_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Toolchain::from_paths("ffmpeg", "ffprobe");
        let err = extract_first_frame(
            &tools,
            Path::new("/nonexistent/in.mp4"),
            &dir.path().join("f.png"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
