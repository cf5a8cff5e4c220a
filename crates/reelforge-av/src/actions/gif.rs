//! Two-pass palette GIF conversion.

use crate::tools::Toolchain;
use crate::{Error, Result, Workspace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Palette size and dithering preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GifQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl GifQuality {
    pub fn max_colors(&self) -> u32 {
        match self {
            GifQuality::Low => 128,
            GifQuality::Medium | GifQuality::High => 256,
        }
    }

    /// `paletteuse` dither mode.
    pub fn dither(&self) -> &'static str {
        match self {
            GifQuality::Low => "bayer:bayer_scale=3",
            GifQuality::Medium => "bayer:bayer_scale=5",
            GifQuality::High => "floyd_steinberg",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            GifQuality::Low => "low",
            GifQuality::Medium => "medium",
            GifQuality::High => "high",
        }
    }
}

impl fmt::Display for GifQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GifQuality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(GifQuality::Low),
            "medium" => Ok(GifQuality::Medium),
            "high" => Ok(GifQuality::High),
            other => Err(Error::InvalidInput(format!(
                "unknown GIF quality '{}', expected low, medium or high",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GifOptions {
    pub fps: u32,
    /// Output width; `None` keeps the source width.
    pub width: Option<u32>,
    pub quality: GifQuality,
    /// Seek position, in any form ffmpeg's `-ss` accepts.
    pub start: Option<String>,
    /// Clip length, in any form ffmpeg's `-t` accepts.
    pub duration: Option<String>,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            fps: 10,
            width: None,
            quality: GifQuality::Medium,
            start: None,
            duration: None,
        }
    }
}

impl GifOptions {
    /// Lanczos scale filter for the requested width.
    pub fn scale_filter(&self) -> String {
        match self.width {
            Some(w) => format!("scale={w}:-1:flags=lanczos"),
            None => "scale=iw:ih:flags=lanczos".to_string(),
        }
    }

    /// `-vf` graph for the palette pass.
    pub fn palette_filter(&self) -> String {
        format!(
            "{},fps={},palettegen=max_colors={}:stats_mode=diff",
            self.scale_filter(),
            self.fps,
            self.quality.max_colors()
        )
    }

    /// `-filter_complex` graph for the encode pass; input 1 is the palette.
    pub fn gif_filter(&self) -> String {
        format!(
            "{},fps={}[x];[x][1:v]paletteuse=dither={}",
            self.scale_filter(),
            self.fps,
            self.quality.dither()
        )
    }

    fn input_args(&self, input: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(start) = &self.start {
            args.push("-ss".to_string());
            args.push(start.clone());
        }
        if let Some(duration) = &self.duration {
            args.push("-t".to_string());
            args.push(duration.clone());
        }
        args.push("-i".to_string());
        args.push(input.to_string_lossy().into_owned());
        args
    }
}

/// Convert `input` to a looping GIF at `workspace.output()`.
///
/// The palette is written inside the workspace and goes away with it.
pub fn video_to_gif(
    tools: &Toolchain,
    input: &Path,
    workspace: &Workspace,
    opts: &GifOptions,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }
    if opts.fps == 0 {
        return Err(Error::InvalidInput("fps must be positive".to_string()));
    }
    if opts.width == Some(0) {
        return Err(Error::InvalidInput("width must be positive".to_string()));
    }

    let palette = workspace.temp_file("palette.png");

    tracing::debug!("Generating palette for {:?}", input);
    let mut palette_cmd = tools.ffmpeg();
    palette_cmd
        .args(opts.input_args(input))
        .arg("-vf")
        .arg(opts.palette_filter())
        .path_arg(&palette);
    palette_cmd.execute()?;

    tracing::debug!("Encoding GIF for {:?}", input);
    let mut gif_cmd = tools.ffmpeg();
    gif_cmd
        .args(opts.input_args(input))
        .arg("-i")
        .path_arg(&palette)
        .arg("-filter_complex")
        .arg(opts.gif_filter())
        .args(["-loop", "0"])
        .path_arg(workspace.output());
    gif_cmd.execute()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_presets() {
        assert_eq!(GifQuality::Low.max_colors(), 128);
        assert_eq!(GifQuality::Low.dither(), "bayer:bayer_scale=3");
        assert_eq!(GifQuality::Medium.max_colors(), 256);
        assert_eq!(GifQuality::Medium.dither(), "bayer:bayer_scale=5");
        assert_eq!(GifQuality::High.dither(), "floyd_steinberg");
        assert_eq!("HIGH".parse::<GifQuality>().unwrap(), GifQuality::High);
        assert!("ultra".parse::<GifQuality>().is_err());
    }

    #[test]
    fn test_filters_default() {
        let opts = GifOptions::default();
        assert_eq!(opts.scale_filter(), "scale=iw:ih:flags=lanczos");
        assert_eq!(
            opts.palette_filter(),
            "scale=iw:ih:flags=lanczos,fps=10,palettegen=max_colors=256:stats_mode=diff"
        );
        assert_eq!(
            opts.gif_filter(),
            "scale=iw:ih:flags=lanczos,fps=10[x];[x][1:v]paletteuse=dither=bayer:bayer_scale=5"
        );
    }

    #[test]
    fn test_filters_with_width() {
        let opts = GifOptions {
            fps: 15,
            width: Some(480),
            quality: GifQuality::Low,
            ..Default::default()
        };
        assert_eq!(
            opts.palette_filter(),
            "scale=480:-1:flags=lanczos,fps=15,palettegen=max_colors=128:stats_mode=diff"
        );
    }

    #[test]
    fn test_input_args_put_seek_before_input() {
        let opts = GifOptions {
            start: Some("5".to_string()),
            duration: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(
            opts.input_args(Path::new("clip.mp4")),
            ["-ss", "5", "-t", "3", "-i", "clip.mp4"]
        );
        assert_eq!(
            GifOptions::default().input_args(Path::new("clip.mp4")),
            ["-i", "clip.mp4"]
        );
    }

    #[test]
    fn test_zero_fps_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        std::fs::write(&input, b"").unwrap();
        let workspace = Workspace::for_output(dir.path().join("clip.gif")).unwrap();
        let tools = Toolchain::from_paths("ffmpeg", "ffprobe");

        let opts = GifOptions {
            fps: 0,
            ..Default::default()
        };
        let err = video_to_gif(&tools, &input, &workspace, &opts).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
