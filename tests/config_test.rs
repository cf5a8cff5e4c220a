//! Integration tests for configuration loading.

use reelforge::config::{self, Config};
use reelforge_av::actions::{AudioFormat, Corner, GifQuality};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn load_full_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reelforge.toml");
    fs::write(
        &path,
        r#"
[circular]
size = 320
radius_scale = 3.0
vertical_bias = 0.0
supersample = 4

[detector]
model_path = "/models/seeta_fd_frontal_v1.0.bin"
min_face_size = 40

[watermark]
logo = "/brand/logo.png"
position = "top-left"
margin = 24
scale = 0.2

[audio]
format = "wav"
bitrate = "320k"

[gif]
fps = 15
width = 480
quality = "low"

[batch]
jobs = 3

[tools]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
"#,
    )
    .unwrap();

    let config = config::load_config(&path).unwrap();

    assert_eq!(config.circular.size, 320);
    assert_eq!(config.circular.supersample, 4);
    assert_eq!(
        config.detector.model_path,
        Some(PathBuf::from("/models/seeta_fd_frontal_v1.0.bin"))
    );
    assert_eq!(config.detector.min_face_size, 40);
    assert_eq!(config.detector.slide_window_step, 4);
    assert_eq!(config.watermark.position, Corner::TopLeft);
    assert_eq!(config.watermark.margin, 24);
    assert_eq!(config.audio.format, AudioFormat::Wav);
    assert_eq!(config.gif.quality, GifQuality::Low);
    assert_eq!(config.gif.width, Some(480));
    assert_eq!(config.batch.jobs, 3);
    assert_eq!(
        config.tools.ffmpeg_path,
        Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
    );
    assert!(config.tools.ffprobe_path.is_none());

    let crop = config::crop_config(&config.circular).unwrap();
    assert_eq!(crop.target_size(), 320);
    assert_eq!(crop.radius_scale(), 3.0);
}

#[test]
fn explicit_path_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[gif]\nfps = 24\n").unwrap();

    let config = config::load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.gif.fps, 24);
}

#[test]
fn missing_explicit_path_is_error() {
    let dir = tempdir().unwrap();
    let err = config::load_config_or_default(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}

#[test]
fn malformed_toml_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[circular\nsize = ").unwrap();

    let err = config::load_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn invalid_values_are_rejected() {
    let dir = tempdir().unwrap();
    for body in [
        "[circular]\nsize = 0\n",
        "[circular]\nradius_scale = -1.0\n",
        "[circular]\nsupersample = 0\n",
        "[watermark]\nscale = 0.0\n",
        "[gif]\nfps = 0\n",
        "[audio]\nbitrate = \"loud\"\n",
        "[detector]\npyramid_scale_factor = 1.5\n",
    ] {
        let path = dir.path().join("invalid.toml");
        fs::write(&path, body).unwrap();
        assert!(config::load_config(&path).is_err(), "accepted: {body}");
    }
}

#[test]
fn defaults_round_trip_through_toml() {
    let text = toml::to_string(&Config::default()).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.circular.size, 500);
    assert_eq!(parsed.watermark.position, Corner::TopRight);
    assert!(config::validate_config(&parsed).is_ok());
}
