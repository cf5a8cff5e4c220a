mod types;

pub use types::*;

use anyhow::{Context, Result};
use reelforge_crop::CropConfig;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./reelforge.toml", "~/.config/reelforge/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    // Crop geometry
    crop_config(&config.circular)?;

    // Detector
    config
        .detector
        .settings()
        .validate()
        .context("Invalid [detector] settings")?;
    if let Some(ref model) = config.detector.model_path {
        if !model.exists() {
            tracing::warn!("Face model does not exist: {:?}", model);
        }
    }

    // Watermark
    if !(config.watermark.scale.is_finite() && config.watermark.scale > 0.0) {
        anyhow::bail!(
            "Watermark scale must be positive, got {}",
            config.watermark.scale
        );
    }
    if let Some(ref logo) = config.watermark.logo {
        if !logo.exists() {
            tracing::warn!("Watermark logo does not exist: {:?}", logo);
        }
    }

    // Audio
    reelforge_av::actions::audio::validate_bitrate(&config.audio.bitrate)
        .context("Invalid [audio] bitrate")?;

    // GIF
    if config.gif.fps == 0 {
        anyhow::bail!("GIF fps cannot be 0");
    }
    if config.gif.width == Some(0) {
        anyhow::bail!("GIF width cannot be 0");
    }

    // Tools
    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}

/// Build the resolver configuration from the `[circular]` section.
pub fn crop_config(circular: &CircularConfig) -> Result<CropConfig> {
    let config = CropConfig::new(circular.size, circular.radius_scale)?
        .with_vertical_bias(circular.vertical_bias)?
        .with_supersample(circular.supersample)?;
    Ok(config)
}
