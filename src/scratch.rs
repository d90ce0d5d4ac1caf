//! Scoped scratch directory for intermediate raster artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the scratch directory created next to the icon output.
pub const SCRATCH_DIR_NAME: &str = "temp";

/// Prefix shared by every scratch file name.
pub const SCRATCH_FILE_PREFIX: &str = "_temp_";

/// A `temp` directory whose scratch files are removed when dropped.
///
/// Only plain files named with [`SCRATCH_FILE_PREFIX`] are deleted. The
/// directory itself is removed only if this value created it, so an existing
/// `temp` directory and anything else in it are left alone. Removal is
/// best-effort: failures are logged and never escalated.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    created: bool,
    removed: bool,
}

impl ScratchDir {
    /// Creates `<parent>/temp` (and `parent` itself if needed).
    pub fn create(parent: &Path) -> Result<Self> {
        let path = parent.join(SCRATCH_DIR_NAME);
        let created = !path.is_dir();
        fs::create_dir_all(&path).map_err(Error::io(format!(
            "error creating temp directory {}",
            path.display()
        )))?;
        Ok(Self {
            path,
            created,
            removed: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.path
    }

    /// Path of a scratch file, `<dir>/_temp_<name>`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}{}", SCRATCH_FILE_PREFIX, name))
    }

    /// Removes the scratch files now instead of at drop time.
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        if !self.path.exists() {
            return;
        }
        if let Err(err) = remove_scratch_files(&self.path) {
            tracing::warn!("Error cleaning up temp directory: {}", err);
            return;
        }
        if !self.created {
            tracing::debug!("keeping existing directory {}", self.path.display());
            return;
        }
        match fs::remove_dir(&self.path) {
            Ok(()) => tracing::info!("Cleaned up temporary directory: {}", self.path.display()),
            Err(err) => tracing::warn!("Error cleaning up temp directory: {}", err),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.remove();
    }
}

fn remove_scratch_files(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let ours = entry.file_name().to_string_lossy().starts_with(SCRATCH_FILE_PREFIX);
        if ours && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
