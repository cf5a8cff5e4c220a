//! Path utilities for detecting file types by extension.
//!
//! The tools in this workspace pick their inputs by extension only; decoding
//! problems surface later as per-file failures.

use std::path::{Path, PathBuf};

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv", "wmv", "m4v"];

/// List of supported image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

/// Broad category of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video (possibly with audio).
    Video,
}

impl MediaKind {
    /// Classify a path by its extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use reelforge_common::MediaKind;
    ///
    /// assert_eq!(MediaKind::of(Path::new("a.png")), Some(MediaKind::Image));
    /// assert_eq!(MediaKind::of(Path::new("a.MKV")), Some(MediaKind::Video));
    /// assert_eq!(MediaKind::of(Path::new("notes.txt")), None);
    /// ```
    pub fn of(path: &Path) -> Option<Self> {
        if is_image_file(path) {
            Some(MediaKind::Image)
        } else if is_video_file(path) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Plural noun used in batch summaries.
    pub fn plural(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelforge_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("reel.mp4")));
/// assert!(is_video_file(Path::new("/path/to/story.MOV")));
/// assert!(!is_video_file(Path::new("logo.png")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Check if a path has an image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelforge_common::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("portrait.jpg")));
/// assert!(is_image_file(Path::new("/path/to/scan.TIFF")));
/// assert!(!is_image_file(Path::new("reel.mp4")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

/// File stem as an owned string, or `"output"` when the path has none.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Build `<dir>/<stem><suffix>.<extension>` for an input path.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelforge_common::paths::derived_path;
///
/// let out = derived_path(Path::new("/out"), Path::new("/in/face.jpg"), "_circular", "png");
/// assert_eq!(out, Path::new("/out/face_circular.png"));
/// ```
pub fn derived_path(dir: &Path, input: &Path, suffix: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}{}.{}", stem_of(input), suffix, extension))
}
