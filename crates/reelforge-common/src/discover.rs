//! Input discovery for batch runs.
//!
//! A batch input is either a single file (taken as-is) or a directory that is
//! walked for files of the requested media kinds. Results are sorted so that
//! runs over the same tree always visit files in the same order.

use crate::paths::MediaKind;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Builder describing which files a batch run picks up.
#[derive(Debug, Clone)]
pub struct Discovery {
    kinds: Vec<MediaKind>,
    recursive: bool,
    skip_markers: Vec<String>,
}

impl Discovery {
    /// Discover files of the given kinds (non-recursive by default).
    pub fn new(kinds: &[MediaKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            recursive: false,
            skip_markers: Vec::new(),
        }
    }

    /// Descend into subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Skip any file whose path below the input root contains `marker`.
    ///
    /// Used to keep previous outputs (`circular/`, `*_circular.mov`) out of
    /// a re-run over the same directory.
    pub fn skip_marker(mut self, marker: impl Into<String>) -> Self {
        self.skip_markers.push(marker.into());
        self
    }

    fn accepts(&self, root: &Path, path: &Path) -> bool {
        let Some(kind) = MediaKind::of(path) else {
            return false;
        };
        if !self.kinds.contains(&kind) {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let hidden_dir = relative.parent().is_some_and(|dirs| {
            dirs.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .map(|s| s.starts_with('.') && s.len() > 1 && s != "..")
                    .unwrap_or(false)
            })
        });
        if hidden_dir {
            return false;
        }

        let relative = relative.to_string_lossy();
        !self
            .skip_markers
            .iter()
            .any(|marker| relative.contains(marker.as_str()))
    }

    /// Enumerate the files for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::NotFound`] if `input` does not exist.
    pub fn run(&self, input: &Path) -> io::Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }
        if !input.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input does not exist: {}", input.display()),
            ));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(input).max_depth(max_depth).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", input, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if self.accepts(input, entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Discovered {} file(s) under {:?}", files.len(), input);
        Ok(files)
    }
}
