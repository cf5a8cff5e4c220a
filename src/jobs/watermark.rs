//! Logo watermarks on videos and images.

use super::parent_dir;
use anyhow::{Context, Result};
use reelforge_av::actions::{apply_watermark, WatermarkOptions};
use reelforge_av::{Toolchain, Workspace};
use reelforge_common::MediaKind;
use std::path::{Path, PathBuf};

/// Default output directory name, next to each input.
pub const OUTPUT_DIR: &str = "with_logo";

/// `<out>/<file name>`, with `<out>` defaulting to `with_logo/` next to the
/// input.
pub fn plan_output(file: &Path, output_dir: Option<&Path>) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => parent_dir(file).join(OUTPUT_DIR),
    };
    match file.file_name() {
        Some(name) => dir.join(name),
        None => dir.join("output"),
    }
}

/// Overlay `logo` onto `file`. Videos keep their audio; images stay single
/// frames in their original format.
pub fn process(
    tools: &Toolchain,
    file: &Path,
    logo: &Path,
    output: &Path,
    opts: &WatermarkOptions,
) -> Result<PathBuf> {
    let copy_audio = match MediaKind::of(file) {
        Some(MediaKind::Video) => true,
        Some(MediaKind::Image) => false,
        None => anyhow::bail!("Unsupported file type: {:?}", file),
    };

    let workspace = Workspace::for_output(output)?;
    apply_watermark(tools, file, logo, workspace.output(), opts, copy_audio)
        .with_context(|| format!("Failed to watermark {:?}", file))?;

    Ok(workspace.finalize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_output() {
        assert_eq!(
            plan_output(Path::new("clips/intro.mp4"), None),
            PathBuf::from("clips/with_logo/intro.mp4")
        );
        assert_eq!(
            plan_output(Path::new("clips/cover.jpg"), Some(Path::new("branded"))),
            PathBuf::from("branded/cover.jpg")
        );
    }

    #[test]
    fn test_unsupported_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Toolchain::from_paths("ffmpeg", "ffprobe");
        let file = dir.path().join("notes.txt");
        let result = process(
            &tools,
            &file,
            Path::new("logo.png"),
            &plan_output(&file, None),
            &WatermarkOptions::default(),
        );
        assert!(result.is_err());
    }
}
