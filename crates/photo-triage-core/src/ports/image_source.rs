//! Image source port for building a collection from a folder.

use std::path::Path;

use crate::domain::{ImageCollection, TriageError};

/// Port for enumerating the eligible images of a folder.
pub trait ImageSource: Send + Sync {
    /// Builds the ordered collection of images directly inside `folder`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::FolderAccess`] if the folder cannot be read and
    /// [`TriageError::EmptyCollection`] if it holds no eligible image.
    fn load(&self, folder: &Path) -> Result<ImageCollection, TriageError>;
}
