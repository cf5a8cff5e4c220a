//! External tool detection and management.
//!
//! [`Toolchain`] resolves ffmpeg and ffprobe once per batch run (honouring
//! configured overrides) and hands out pre-configured [`ToolCommand`]s.

use crate::command::ToolCommand;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tools every reelforge video command relies on.
const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available using a custom version argument.
pub fn check_tool_with_arg(program: &Path, name: &str, version_arg: &str) -> ToolInfo {
    let result = Command::new(program).arg(version_arg).output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = if program.is_absolute() {
                Some(program.to_path_buf())
            } else {
                which::which(program).ok()
            };

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check ffmpeg and ffprobe, preferring configured paths.
pub fn check_tools(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Vec<ToolInfo> {
    KNOWN_TOOLS
        .iter()
        .map(|&name| {
            let configured = match name {
                "ffmpeg" => ffmpeg,
                _ => ffprobe,
            };
            let program = configured
                .filter(|p| p.exists())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(name));
            check_tool_with_arg(&program, name, "-version")
        })
        .collect()
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {:?} does not exist, searching PATH",
            name,
            path
        );
    }

    require_tool(name)
}

/// Resolved locations of ffmpeg and ffprobe.
#[derive(Debug, Clone)]
pub struct Toolchain {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Toolchain {
    /// Resolve both tools.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] if either tool cannot be located.
    pub fn resolve(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Result<Self> {
        Ok(Self {
            ffmpeg: get_tool_path("ffmpeg", ffmpeg)?,
            ffprobe: get_tool_path("ffprobe", ffprobe)?,
        })
    }

    /// Use explicit paths without checking them.
    pub fn from_paths(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe
    }

    /// An ffmpeg invocation that is quiet, non-interactive and overwrites
    /// its output.
    pub fn ffmpeg(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffmpeg.clone());
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]);
        cmd
    }

    /// An ffprobe invocation printing JSON.
    pub fn ffprobe(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffprobe.clone());
        cmd.args(["-v", "quiet", "-print_format", "json"]);
        cmd
    }
}
