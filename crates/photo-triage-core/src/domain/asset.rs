//! Image assets and the immutable collection built from a folder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

/// Stable identity of an asset within one collection (its discovery index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetId(usize);

impl AssetId {
    /// Identity of the asset at `index` in its collection.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the asset in the collection.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One eligible image file found in the selected folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    /// Path to the image file.
    pub path: PathBuf,
    /// Position in the collection.
    pub discovery_index: usize,
}

impl ImageAsset {
    /// Identity of this asset within its collection.
    #[must_use]
    pub const fn id(&self) -> AssetId {
        AssetId(self.discovery_index)
    }

    /// File name for display and destination naming.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Ordered, immutable list of assets under one root folder.
///
/// Cloning is cheap; clones share the asset slice.
#[derive(Debug, Clone)]
pub struct ImageCollection {
    root: PathBuf,
    assets: Arc<[ImageAsset]>,
}

impl ImageCollection {
    /// Builds a collection from paths in their final order.
    ///
    /// Returns `None` when `paths` is empty; callers map that to
    /// [`TriageError::EmptyCollection`](crate::TriageError::EmptyCollection).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            return None;
        }
        let assets = paths
            .into_iter()
            .enumerate()
            .map(|(discovery_index, path)| ImageAsset {
                path,
                discovery_index,
            })
            .collect();
        Some(Self {
            root: root.into(),
            assets,
        })
    }

    /// Folder the collection was built from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of assets; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Looks up an asset by identity.
    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<&ImageAsset> {
        self.assets.get(id.0)
    }

    /// Assets in collection order.
    #[must_use]
    pub fn assets(&self) -> &[ImageAsset] {
        &self.assets
    }

    /// Iterates over assets in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, ImageAsset> {
        self.assets.iter()
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a ImageAsset;
    type IntoIter = std::slice::Iter<'a, ImageAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
