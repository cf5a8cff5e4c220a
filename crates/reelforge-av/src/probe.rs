//! ffprobe-based video probing.

use crate::tools::Toolchain;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: String,
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

/// What the video jobs need to know about an input.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub format_name: String,
    pub duration: Option<Duration>,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second as a float.
    pub frame_rate: f64,
    /// Frame rate exactly as ffprobe reported it (e.g. `30000/1001`), suitable
    /// for passing back to ffmpeg's `-framerate`.
    pub frame_rate_raw: String,
    pub frame_count: Option<u64>,
    pub has_audio: bool,
}

/// Probe a video file.
///
/// # Errors
///
/// Fails if the file does not exist, ffprobe fails, or the file has no
/// video stream.
pub fn probe_video(tools: &Toolchain, path: &Path) -> Result<VideoInfo> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let mut cmd = tools.ffprobe();
    cmd.args(["-show_format", "-show_streams"]).path_arg(path);
    let output = cmd.execute()?;

    let ff_output: FfprobeOutput = serde_json::from_str(&output.stdout)?;
    parse_ffprobe_output(path, ff_output)
}

fn parse_ffprobe_output(path: &Path, output: FfprobeOutput) -> Result<VideoInfo> {
    let has_audio = output.streams.iter().any(|s| s.codec_type == "audio");

    let video = output
        .streams
        .into_iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| Error::parse_error("ffprobe", format!("no video stream in {:?}", path)))?;

    let width = video.width.unwrap_or(0);
    let height = video.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(Error::parse_error(
            "ffprobe",
            format!("video stream has no dimensions: {}x{}", width, height),
        ));
    }

    // r_frame_rate is the stream's base rate; avg_frame_rate covers VFR inputs
    // where r_frame_rate is 0/0.
    let (frame_rate, frame_rate_raw) = [video.r_frame_rate, video.avg_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|raw| parse_frame_rate(&raw).map(|fps| (fps, raw)))
        .ok_or_else(|| Error::parse_error("ffprobe", "video stream has no usable frame rate"))?;

    Ok(VideoInfo {
        path: path.to_path_buf(),
        file_size: output.format.size.and_then(|s| s.parse().ok()).unwrap_or(0),
        format_name: output.format.format_name,
        duration: output
            .format
            .duration
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(Duration::from_secs_f64),
        codec: video.codec_name.unwrap_or_default(),
        width,
        height,
        frame_rate,
        frame_rate_raw,
        frame_count: video.nb_frames.and_then(|s| s.parse().ok()),
        has_audio,
    })
}

/// Parse `num/den` or a plain number. Zero and non-finite rates are rejected.
pub fn parse_frame_rate(rate_str: &str) -> Option<f64> {
    let rate = match rate_str.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate_str.trim().parse().ok()?,
    };

    (rate.is_finite() && rate > 0.0).then_some(rate)
}
