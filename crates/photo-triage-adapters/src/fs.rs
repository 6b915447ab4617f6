//! Filesystem adapters for enumerating photos and copying them into
//! category folders.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use photo_triage_core::domain::{ImageCollection, TriageError};
use photo_triage_core::ports::{FileStore, ImageSource};
use tracing::{debug, warn};

/// Extensions eligible for triage, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Lists the images directly inside a folder.
///
/// Subfolders are not descended into, so category folders from an earlier
/// run are never picked up. Assets are ordered by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl FsImageSource {
    /// Creates a new filesystem image source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, folder: &Path) -> Result<ImageCollection, TriageError> {
        let access = |source: io::Error| TriageError::FolderAccess {
            path: folder.to_path_buf(),
            source,
        };
        let entries = fs::read_dir(folder).map_err(access)?;

        let mut files = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {e}", folder.display());
                    continue;
                }
            };
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("Found {} image files in {}", files.len(), folder.display());

        ImageCollection::new(folder, files).ok_or_else(|| TriageError::EmptyCollection {
            path: folder.to_path_buf(),
        })
    }
}

/// Checks if a path has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Copies files with `std::fs`, keeping permissions and timestamps.
///
/// An existing file with the same name in the destination folder is
/// overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileStore;

impl FsFileStore {
    /// Creates a new filesystem store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileStore for FsFileStore {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn copy_into(&self, source: &Path, dir: &Path) -> io::Result<PathBuf> {
        let name = source.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", source.display()),
            )
        })?;
        let destination = dir.join(name);
        if is_same_file(source, &destination)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is the source file itself", destination.display()),
            ));
        }
        fs::copy(source, &destination)?;

        // Timestamps are best effort: a read-only copy cannot be reopened
        // for writing, and some filesystems lack access times.
        if let Err(e) = copy_times(source, &destination) {
            debug!("Timestamps not preserved for {}: {e}", destination.display());
        }
        Ok(destination)
    }
}

/// True if `destination` exists and resolves to the same file as `source`,
/// as happens when a category folder links back to the root. Copying then
/// would truncate the original.
fn is_same_file(source: &Path, destination: &Path) -> io::Result<bool> {
    if !destination.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(source)? == fs::canonicalize(destination)?)
}

fn copy_times(source: &Path, destination: &Path) -> io::Result<()> {
    let meta = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(destination)?.set_times(times)
}
