//! File store port for materializing dispositions on disk.

use std::io;
use std::path::{Path, PathBuf};

/// Blocking file operations used by the realizer.
pub trait FileStore: Send + Sync {
    /// Creates `dir` if missing. An existing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Copies `source` into `dir`, keeping its file name and, where the
    /// platform allows, its timestamps and permissions. Never moves or
    /// deletes `source`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if reading or writing fails.
    fn copy_into(&self, source: &Path, dir: &Path) -> io::Result<PathBuf>;
}
