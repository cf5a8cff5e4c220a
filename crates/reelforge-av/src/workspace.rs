//! Scratch space for producing one output file.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Workspace for producing a single output file.
///
/// The temporary directory is created next to the destination so the final
/// move is a same-filesystem rename. Intermediate files (palettes, frame
/// sequences) live inside it and are removed when the workspace is dropped,
/// whether or not the job succeeded.
///
/// # Example
///
/// ```no_run
/// use reelforge_av::Workspace;
///
/// let workspace = Workspace::for_output("/videos/output/clip_circular.mov")?;
/// // Write to workspace.output(), intermediates to workspace.temp_file("palette.png")
/// workspace.finalize()?;
/// # Ok::<(), reelforge_av::Error>(())
/// ```
pub struct Workspace {
    temp_dir: TempDir,
    output_path: PathBuf,
    destination: PathBuf,
}

impl Workspace {
    /// Create a workspace whose output will eventually land at `destination`.
    ///
    /// The destination's parent directory is created if missing.
    pub fn for_output<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref();

        let file_name = destination
            .file_name()
            .ok_or_else(|| Error::InvalidInput("Invalid output file path".to_string()))?;

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .map_err(|e| Error::Workspace(format!("Failed to create {:?}: {}", parent, e)))?;

        let temp_dir = tempfile::Builder::new()
            .prefix(".reelforge-")
            .tempdir_in(&parent)
            .map_err(|e| Error::Workspace(e.to_string()))?;

        let output_path = temp_dir.path().join(file_name);

        Ok(Self {
            temp_dir,
            output_path,
            destination: destination.to_path_buf(),
        })
    }

    /// Path the tool should write its output to.
    pub fn output(&self) -> &Path {
        &self.output_path
    }

    /// Final destination of the output.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Get the temp directory path.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a temp file path with the given name.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Create (if needed) and return a subdirectory of the workspace.
    pub fn temp_subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.temp_dir.path().join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Move the output to its destination.
    ///
    /// An existing file at the destination is backed up first and restored
    /// if the move fails.
    pub fn finalize(self) -> Result<PathBuf> {
        let dest = self.destination.as_path();

        if !self.output_path.exists() {
            return Err(Error::Workspace(format!(
                "Output file does not exist: {:?}",
                self.output_path
            )));
        }

        if dest.exists() {
            let backup = self.temp_dir.path().join(".previous");
            std::fs::rename(dest, &backup).map_err(|e| {
                Error::Workspace(format!("Failed to create backup of existing file: {}", e))
            })?;

            if let Err(e) = std::fs::rename(&self.output_path, dest) {
                let _ = std::fs::rename(&backup, dest);
                return Err(Error::Workspace(format!(
                    "Failed to move output to destination: {}",
                    e
                )));
            }
        } else {
            std::fs::rename(&self.output_path, dest).map_err(|e| {
                Error::Workspace(format!("Failed to move output to destination: {}", e))
            })?;
        }

        Ok(self.destination)
    }
}
