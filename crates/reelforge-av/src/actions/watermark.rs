//! Logo overlay.

use crate::tools::Toolchain;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Corner of the frame the logo is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopRight,
        Corner::TopLeft,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopRight => "top-right",
            Corner::TopLeft => "top-left",
            Corner::BottomRight => "bottom-right",
            Corner::BottomLeft => "bottom-left",
        }
    }

    /// ffmpeg `overlay` position expression for this corner.
    fn overlay_position(&self, margin: u32) -> String {
        let m = margin;
        match self {
            Corner::TopRight => format!("main_w-overlay_w-{m}:{m}"),
            Corner::TopLeft => format!("{m}:{m}"),
            Corner::BottomRight => format!("main_w-overlay_w-{m}:main_h-overlay_h-{m}"),
            Corner::BottomLeft => format!("{m}:main_h-overlay_h-{m}"),
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Corner::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown position '{}', expected one of: top-right, top-left, bottom-right, bottom-left",
                    s
                ))
            })
    }
}

/// Where and how large the logo is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOptions {
    pub corner: Corner,
    /// Distance from the two anchoring edges, in pixels.
    pub margin: u32,
    /// Logo width as a fraction of the input width.
    pub scale: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            corner: Corner::TopRight,
            margin: 10,
            scale: 0.15,
        }
    }
}

/// Build the `-filter_complex` graph: input 0 is the base, input 1 the logo.
///
/// The logo is resized against the base with `scale2ref`, keeping its aspect
/// ratio, so the result is `scale × base width` wide whatever the logo's
/// native resolution.
pub fn overlay_filter(opts: &WatermarkOptions) -> String {
    format!(
        "[1:v][0:v]scale2ref=w=main_w*{scale}:h=ow/a[logo][base];[base][logo]overlay={pos}[out]",
        scale = opts.scale,
        pos = opts.corner.overlay_position(opts.margin),
    )
}

/// Overlay `logo` onto `input`, writing `output`.
///
/// With `copy_audio` the input's audio streams (if any) are stream-copied;
/// otherwise the output is a single frame, as for still images.
pub fn apply_watermark(
    tools: &Toolchain,
    input: &Path,
    logo: &Path,
    output: &Path,
    opts: &WatermarkOptions,
    copy_audio: bool,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }
    if !logo.exists() {
        return Err(Error::file_not_found(logo));
    }
    if !(opts.scale.is_finite() && opts.scale > 0.0) {
        return Err(Error::InvalidInput(format!(
            "logo scale must be positive, got {}",
            opts.scale
        )));
    }

    let mut cmd = tools.ffmpeg();
    cmd.arg("-i")
        .path_arg(input)
        .arg("-i")
        .path_arg(logo)
        .arg("-filter_complex")
        .arg(overlay_filter(opts))
        .args(["-map", "[out]"]);

    if copy_audio {
        cmd.args(["-map", "0:a?", "-codec:a", "copy"]);
    } else {
        cmd.args(["-frames:v", "1", "-update", "1"]);
    }

    cmd.path_arg(output);
    cmd.execute()?;
    Ok(())
}
