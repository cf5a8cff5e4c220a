//! Audio extraction from videos.

use super::names_output_file;
use anyhow::{Context, Result};
use reelforge_av::actions::{extract_audio, AudioFormat};
use reelforge_av::{Toolchain, Workspace};
use reelforge_common::paths::derived_path;
use std::path::{Path, PathBuf};

/// `<out>/<stem>.<ext>`, or the input path with the new extension when no
/// output is given. For a single input file, `output` may name the audio file
/// itself when it carries the format extension or is not an existing directory.
pub fn plan_output(
    file: &Path,
    output: Option<&Path>,
    single_file: bool,
    format: AudioFormat,
) -> PathBuf {
    match output {
        Some(out) if names_output_file(out, format.extension(), single_file) => out.to_path_buf(),
        Some(dir) => derived_path(dir, file, "", format.extension()),
        None => file.with_extension(format.extension()),
    }
}

/// Size in megabytes, as reported after extraction.
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

pub fn process(
    tools: &Toolchain,
    file: &Path,
    output: &Path,
    format: AudioFormat,
    bitrate: &str,
) -> Result<PathBuf> {
    let workspace = Workspace::for_output(output)?;
    let size = extract_audio(tools, file, workspace.output(), format, bitrate)
        .with_context(|| format!("Failed to extract audio from {:?}", file))?;
    let output = workspace.finalize()?;

    tracing::info!("{:?}: {:.2} MB of {}", output, megabytes(size), format);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_output_alongside_input() {
        assert_eq!(
            plan_output(Path::new("talks/keynote.mp4"), None, true, AudioFormat::Mp3),
            PathBuf::from("talks/keynote.mp3")
        );
    }

    #[test]
    fn test_plan_output_in_directory() {
        assert_eq!(
            plan_output(
                Path::new("talks/keynote.mkv"),
                Some(Path::new("audio")),
                false,
                AudioFormat::Flac
            ),
            PathBuf::from("audio/keynote.flac")
        );
    }

    #[test]
    fn test_plan_output_single_file_target() {
        assert_eq!(
            plan_output(
                Path::new("video.mp4"),
                Some(Path::new("audio.mp3")),
                true,
                AudioFormat::Mp3
            ),
            PathBuf::from("audio.mp3")
        );

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            plan_output(Path::new("video.mp4"), Some(dir.path()), true, AudioFormat::Wav),
            dir.path().join("video.wav")
        );
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(megabytes(1024 * 1024), 1.0);
        assert_eq!(megabytes(0), 0.0);
    }
}
