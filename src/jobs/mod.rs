//! Per-file jobs behind each subcommand.
//!
//! Every job takes one input file and a planned output path, and either
//! produces that output or returns an error; batching and reporting live in
//! [`crate::batch`].

pub mod audio;
pub mod circular_image;
pub mod circular_video;
pub mod gif;
pub mod watermark;

use crate::config::Config;
use anyhow::{Context, Result};
use reelforge_av::Toolchain;
use std::path::{Path, PathBuf};

/// Locate ffmpeg/ffprobe, honouring the `[tools]` overrides.
pub fn toolchain(config: &Config) -> Result<Toolchain> {
    Toolchain::resolve(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
    .context("ffmpeg and ffprobe are required for this command (see `reelforge check-tools`)")
}

/// Directory containing `file`, or `.` for a bare file name.
pub(crate) fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `-o` names the output file itself rather than a directory.
///
/// Only single-file runs can target a file. The path counts as a file when it
/// ends in `extension` or is not an existing directory.
pub(crate) fn names_output_file(output: &Path, extension: &str, single_file: bool) -> bool {
    if !single_file {
        return false;
    }
    let has_extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
    has_extension || !output.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_output_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(names_output_file(Path::new("audio.mp3"), "mp3", true));
        assert!(names_output_file(Path::new("AUDIO.MP3"), "mp3", true));
        assert!(names_output_file(Path::new("new/track"), "mp3", true));
        assert!(!names_output_file(dir.path(), "mp3", true));
        assert!(!names_output_file(Path::new("audio.mp3"), "mp3", false));
    }

    #[test]
    fn test_existing_directory_with_extension_is_a_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("clips.gif");
        std::fs::create_dir(&odd).unwrap();
        assert!(names_output_file(&odd, "gif", true));
        assert!(!names_output_file(&odd, "mp3", true));
    }
}
