//! Reelforge-Common: shared path utilities for the reelforge tools.
//!
//! - **Path Utilities**: detect image and video files by extension
//! - **Discovery**: enumerate the input files of a batch run
//!
//! # Examples
//!
//! ```
//! use reelforge_common::paths::{is_image_file, MediaKind};
//! use std::path::Path;
//!
//! assert!(is_image_file(Path::new("portrait.JPG")));
//! assert_eq!(MediaKind::of(Path::new("clip.mov")), Some(MediaKind::Video));
//! ```

pub mod discover;
pub mod paths;

pub use discover::Discovery;
pub use paths::MediaKind;
