//! # reelforge-av
//!
//! Thin, synchronous wrappers around `ffmpeg` and `ffprobe`.
//!
//! This crate provides:
//! - Tool discovery with configurable overrides ([`Toolchain`], [`check_tools`])
//! - A command builder that captures output and maps failures ([`ToolCommand`])
//! - Video probing ([`probe_video`])
//! - Per-output scratch directories with safe finalisation ([`Workspace`])
//! - Actions: logo overlay, audio extraction, palette GIFs, frame sequences
//!
//! ## Example
//!
//! ```no_run
//! use reelforge_av::{probe_video, Toolchain};
//! use std::path::Path;
//!
//! let tools = Toolchain::resolve(None, None)?;
//! let info = probe_video(&tools, Path::new("/path/to/clip.mp4"))?;
//! println!("{}x{} @ {} fps", info.width, info.height, info.frame_rate);
//! # Ok::<(), reelforge_av::Error>(())
//! ```

pub mod actions;
mod command;
mod error;
pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use probe::{parse_frame_rate, probe_video, VideoInfo};
pub use tools::{check_tools, get_tool_path, require_tool, ToolInfo, Toolchain};
pub use workspace::Workspace;
