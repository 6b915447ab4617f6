//! Triage outcomes and the per-asset disposition map.

use serde::{Deserialize, Serialize};

use super::{AssetId, TriageError};

/// Triage outcome for one image.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Disposition {
    /// Copy into the keep folder.
    Keep,
    /// Copy into the discard folder.
    Discard,
    /// Copy into the maybe folder (manual mode only).
    Maybe,
    /// Not decided yet.
    #[default]
    Unclassified,
}

impl Disposition {
    /// Dispositions an operator may assign by hand.
    pub const MANUAL: [Self; 3] = [Self::Keep, Self::Discard, Self::Maybe];

    /// Dispositions produced by threshold classification.
    pub const AUTOMATIC: [Self; 2] = [Self::Keep, Self::Discard];

    /// True for every value except `Unclassified`.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Keep => "Keep",
            Self::Discard => "Discard",
            Self::Maybe => "Maybe",
            Self::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

/// Folder names used for each category under the root folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNames {
    /// Folder for `Keep`.
    pub keep: String,
    /// Folder for `Discard`.
    pub discard: String,
    /// Folder for `Maybe`.
    pub maybe: String,
}

impl Default for CategoryNames {
    fn default() -> Self {
        Self {
            keep: "Keep".to_string(),
            discard: "Discard".to_string(),
            maybe: "Maybe".to_string(),
        }
    }
}

impl CategoryNames {
    /// Folder name for a decided disposition; `None` for `Unclassified`.
    #[must_use]
    pub fn folder_for(&self, disposition: Disposition) -> Option<&str> {
        match disposition {
            Disposition::Keep => Some(&self.keep),
            Disposition::Discard => Some(&self.discard),
            Disposition::Maybe => Some(&self.maybe),
            Disposition::Unclassified => None,
        }
    }

    /// Checks that every name is a plain folder name and that no two
    /// categories share a folder. Names are compared trimmed and without
    /// regard to case, since case-insensitive file systems would merge them.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidCategoryName`] for the first offending
    /// name.
    pub fn validate(&self) -> Result<(), TriageError> {
        let named = [
            (Disposition::Keep, &self.keep),
            (Disposition::Discard, &self.discard),
            (Disposition::Maybe, &self.maybe),
        ];
        for (i, (disposition, name)) in named.iter().enumerate() {
            if !is_plain_folder_name(name) {
                return Err(TriageError::InvalidCategoryName {
                    disposition: *disposition,
                    name: (*name).clone(),
                    reason: "not a plain folder name".to_string(),
                });
            }
            let key = name.trim().to_lowercase();
            if let Some((other, _)) = named[..i]
                .iter()
                .find(|(_, earlier)| earlier.trim().to_lowercase() == key)
            {
                return Err(TriageError::InvalidCategoryName {
                    disposition: *disposition,
                    name: (*name).clone(),
                    reason: format!("same folder as {other}"),
                });
            }
        }
        Ok(())
    }
}

/// True for a single non-empty path component other than `.` and `..`.
#[must_use]
pub fn is_plain_folder_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// One disposition per asset of a collection, indexed by [`AssetId`].
///
/// The map is sized to its collection when created, so it cannot hold
/// entries for assets outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispositions {
    values: Vec<Disposition>,
}

impl Dispositions {
    /// All assets start `Unclassified`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![Disposition::Unclassified; len],
        }
    }

    /// Current disposition; `Unclassified` for unknown ids.
    #[must_use]
    pub fn get(&self, id: AssetId) -> Disposition {
        self.values
            .get(id.index())
            .copied()
            .unwrap_or(Disposition::Unclassified)
    }

    /// Sets a disposition, returning the previous one.
    ///
    /// Returns `None` and changes nothing if `id` is outside the collection.
    pub fn set(&mut self, id: AssetId, disposition: Disposition) -> Option<Disposition> {
        self.values
            .get_mut(id.index())
            .map(|slot| std::mem::replace(slot, disposition))
    }

    /// Number of assets covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the map covers no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of assets still `Unclassified`.
    #[must_use]
    pub fn undecided(&self) -> usize {
        self.values.iter().filter(|d| !d.is_decided()).count()
    }

    /// True when every asset has a decided disposition.
    #[must_use]
    pub fn all_decided(&self) -> bool {
        self.values.iter().all(|d| d.is_decided())
    }

    /// Number of assets with the given disposition.
    #[must_use]
    pub fn count(&self, disposition: Disposition) -> usize {
        self.values.iter().filter(|d| **d == disposition).count()
    }

    /// `(id, disposition)` pairs in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetId, Disposition)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, d)| (AssetId::from_index(i), *d))
    }
}
