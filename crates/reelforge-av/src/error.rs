//! Errors from driving ffmpeg and ffprobe.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The executable could not be located or spawned.
    #[error("{tool} not found (install it or set its path under [tools])")]
    ToolNotFound { tool: String },

    /// The tool ran but exited unsuccessfully; `message` carries its stderr.
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("unexpected {tool} output: {message}")]
    ParseError { tool: String, message: String },

    #[error("no such file: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed JSON from ffprobe: {0}")]
    Json(#[from] serde_json::Error),

    /// Arguments the action cannot work with (zero sizes, bad bitrates, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Scratch directory creation or the final move failed.
    #[error("workspace: {0}")]
    Workspace(String),
}

impl Error {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::tool_not_found("ffprobe").to_string(),
            "ffprobe not found (install it or set its path under [tools])"
        );
        assert_eq!(
            Error::tool_failed("ffmpeg", "exited with status 1: boom").to_string(),
            "ffmpeg failed: exited with status 1: boom"
        );
        assert_eq!(
            Error::file_not_found("/in/clip.mp4").to_string(),
            "no such file: /in/clip.mp4"
        );
    }
}
