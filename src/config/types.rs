use reelforge_av::actions::{AudioFormat, Corner, GifQuality};
use reelforge_crop::DetectorSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub circular: CircularConfig,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub watermark: WatermarkConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub gif: GifConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Circular crop output, shared by images and videos.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CircularConfig {
    /// Edge of the square output, in pixels.
    #[serde(default = "default_circle_size")]
    pub size: u32,

    /// Square side as a multiple of the face's larger edge.
    #[serde(default = "default_radius_scale")]
    pub radius_scale: f64,

    /// Upward shift of the crop centre, as a fraction of face height.
    #[serde(default = "default_vertical_bias")]
    pub vertical_bias: f64,

    /// Mask samples per pixel edge; 1 gives a hard edge.
    #[serde(default = "default_supersample")]
    pub supersample: u32,
}

fn default_circle_size() -> u32 {
    reelforge_crop::geometry::DEFAULT_TARGET_SIZE
}

fn default_radius_scale() -> f64 {
    reelforge_crop::geometry::DEFAULT_RADIUS_SCALE
}

fn default_vertical_bias() -> f64 {
    reelforge_crop::geometry::DEFAULT_VERTICAL_BIAS
}

fn default_supersample() -> u32 {
    1
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            size: default_circle_size(),
            radius_scale: default_radius_scale(),
            vertical_bias: default_vertical_bias(),
            supersample: default_supersample(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectorConfig {
    /// SeetaFace frontal model (`seeta_fd_frontal_v1.0.bin`). Without it every
    /// frame falls back to the centred crop.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    #[serde(default = "default_min_face_size")]
    pub min_face_size: u32,

    #[serde(default = "default_score_thresh")]
    pub score_thresh: f64,

    #[serde(default = "default_pyramid_scale_factor")]
    pub pyramid_scale_factor: f32,

    #[serde(default = "default_slide_window_step")]
    pub slide_window_step: u32,
}

fn default_min_face_size() -> u32 {
    DetectorSettings::default().min_face_size
}

fn default_score_thresh() -> f64 {
    DetectorSettings::default().score_thresh
}

fn default_pyramid_scale_factor() -> f32 {
    DetectorSettings::default().pyramid_scale_factor
}

fn default_slide_window_step() -> u32 {
    DetectorSettings::default().slide_window_step
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            min_face_size: default_min_face_size(),
            score_thresh: default_score_thresh(),
            pyramid_scale_factor: default_pyramid_scale_factor(),
            slide_window_step: default_slide_window_step(),
        }
    }
}

impl DetectorConfig {
    pub fn settings(&self) -> DetectorSettings {
        DetectorSettings {
            min_face_size: self.min_face_size,
            score_thresh: self.score_thresh,
            pyramid_scale_factor: self.pyramid_scale_factor,
            slide_window_step: self.slide_window_step,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatermarkConfig {
    /// Default logo when `--logo` is not given.
    #[serde(default)]
    pub logo: Option<PathBuf>,

    #[serde(default)]
    pub position: Corner,

    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Logo width as a fraction of the input width.
    #[serde(default = "default_logo_scale")]
    pub scale: f64,
}

fn default_margin() -> u32 {
    10
}

fn default_logo_scale() -> f64 {
    0.15
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            logo: None,
            position: Corner::default(),
            margin: default_margin(),
            scale: default_logo_scale(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub format: AudioFormat,

    /// Bitrate for lossy formats.
    #[serde(default = "default_audio_bitrate")]
    pub bitrate: String,
}

fn default_audio_bitrate() -> String {
    reelforge_av::actions::audio::DEFAULT_BITRATE.to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            format: AudioFormat::default(),
            bitrate: default_audio_bitrate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GifConfig {
    #[serde(default = "default_gif_fps")]
    pub fps: u32,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub quality: GifQuality,
}

fn default_gif_fps() -> u32 {
    10
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            fps: default_gif_fps(),
            width: None,
            quality: GifQuality::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Worker threads; 0 uses every core.
    #[serde(default)]
    pub jobs: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
