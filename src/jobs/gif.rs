//! Video to animated GIF.

use super::names_output_file;
use anyhow::{Context, Result};
use reelforge_av::actions::{video_to_gif, GifOptions};
use reelforge_av::{Toolchain, Workspace};
use reelforge_common::paths::derived_path;
use std::path::{Path, PathBuf};

/// `<out>/<stem>.gif`, or the input path with a `.gif` extension. A single
/// input file may name the GIF itself through `output`.
pub fn plan_output(file: &Path, output: Option<&Path>, single_file: bool) -> PathBuf {
    match output {
        Some(out) if names_output_file(out, "gif", single_file) => out.to_path_buf(),
        Some(dir) => derived_path(dir, file, "", "gif"),
        None => file.with_extension("gif"),
    }
}

pub fn process(
    tools: &Toolchain,
    file: &Path,
    output: &Path,
    opts: &GifOptions,
) -> Result<PathBuf> {
    let workspace = Workspace::for_output(output)?;
    video_to_gif(tools, file, &workspace, opts)
        .with_context(|| format!("Failed to convert {:?} to GIF", file))?;
    Ok(workspace.finalize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_output() {
        assert_eq!(
            plan_output(Path::new("clips/wave.mov"), None, true),
            PathBuf::from("clips/wave.gif")
        );
        assert_eq!(
            plan_output(Path::new("clips/wave.mov"), Some(Path::new("gifs")), false),
            PathBuf::from("gifs/wave.gif")
        );
    }

    #[test]
    fn test_plan_output_names_single_gif() {
        assert_eq!(
            plan_output(Path::new("video.mp4"), Some(Path::new("clip.gif")), true),
            PathBuf::from("clip.gif")
        );
        assert_eq!(
            plan_output(Path::new("video.mp4"), Some(Path::new("clip.gif")), false),
            PathBuf::from("clip.gif/video.gif")
        );
    }

    #[test]
    fn test_failed_conversion_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing.gif");
        let tools = Toolchain::from_paths("ffmpeg", "ffprobe");

        let result = process(
            &tools,
            &dir.path().join("missing.mp4"),
            &output,
            &GifOptions::default(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }
}
