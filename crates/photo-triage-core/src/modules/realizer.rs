//! Copies assets into per-category folders under the root.
//!
//! Realization is not transactional. A failed copy is recorded and the batch
//! moves on; an interrupted batch leaves the copies made so far in place.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{
    CategoryNames, CopyFailure, CopyOutcome, Disposition, Dispositions, ImageAsset,
    ImageCollection, RealizationSummary, TriageError,
};
use crate::ports::FileStore;

/// Everything the realizer needs, captured by value so it can run on a
/// background thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealizationPlan {
    /// Folder the category folders are created in.
    pub root: PathBuf,
    /// Assets to copy with their category, in collection order.
    pub entries: Vec<(ImageAsset, Disposition)>,
    /// Folder name per category.
    pub categories: CategoryNames,
    /// Assets left out because they have no disposition.
    pub excluded: Vec<ImageAsset>,
}

impl RealizationPlan {
    /// Builds a plan from a collection and its dispositions.
    ///
    /// Undecided assets go to `excluded` rather than being copied.
    #[must_use]
    pub fn new(
        collection: &ImageCollection,
        dispositions: &Dispositions,
        categories: CategoryNames,
    ) -> Self {
        let mut entries = Vec::with_capacity(collection.len());
        let mut excluded = Vec::new();
        for asset in collection {
            match dispositions.get(asset.id()) {
                Disposition::Unclassified => excluded.push(asset.clone()),
                decided => entries.push((asset.clone(), decided)),
            }
        }
        Self {
            root: collection.root().to_path_buf(),
            entries,
            categories,
            excluded,
        }
    }

    /// Number of copies the plan will attempt.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is nothing to copy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories that occur in the plan.
    #[must_use]
    pub fn categories_present(&self) -> BTreeSet<Disposition> {
        self.entries.iter().map(|(_, d)| *d).collect()
    }

    /// Destination folder for a category.
    #[must_use]
    pub fn folder(&self, disposition: Disposition) -> Option<PathBuf> {
        self.categories
            .folder_for(disposition)
            .map(|name| self.root.join(name))
    }
}

/// Runs a plan against `store`, reporting each copy to `on_outcome`.
///
/// Folders are created only for categories present in the plan. If a folder
/// cannot be created, or the category names fail
/// [`CategoryNames::validate`], every asset of that category is recorded as
/// failed and nothing is written.
/// `on_outcome` fires exactly once per entry, success or failure.
pub fn realize(
    plan: &RealizationPlan,
    store: &dyn FileStore,
    mut on_outcome: impl FnMut(&CopyOutcome),
) -> RealizationSummary {
    info!(
        "Copying {} image(s) into category folders under {}",
        plan.len(),
        plan.root.display()
    );

    let invalid = plan.categories.validate().err().map(|e| e.to_string());
    let mut folders: BTreeMap<Disposition, Result<PathBuf, String>> = BTreeMap::new();
    for disposition in plan.categories_present() {
        let Some(dir) = plan.folder(disposition) else {
            continue;
        };
        if let Some(reason) = &invalid {
            warn!("Not copying {disposition} images: {reason}");
            folders.insert(disposition, Err(reason.clone()));
            continue;
        }
        let ready = match store.ensure_dir(&dir) {
            Ok(()) => {
                debug!("Folder ready: {}", dir.display());
                Ok(dir)
            }
            Err(e) => {
                warn!("Cannot create {}: {e}", dir.display());
                Err(format!("cannot create folder {}: {e}", dir.display()))
            }
        };
        folders.insert(disposition, ready);
    }

    let mut summary = RealizationSummary {
        excluded: plan.excluded.clone(),
        ..RealizationSummary::default()
    };

    for (asset, disposition) in &plan.entries {
        let outcome = match folders.get(disposition) {
            Some(Ok(dir)) => copy_one(store, asset, *disposition, dir),
            Some(Err(reason)) => CopyOutcome::Failed(CopyFailure {
                asset: asset.clone(),
                reason: reason.clone(),
            }),
            None => CopyOutcome::Failed(CopyFailure {
                asset: asset.clone(),
                reason: format!("no folder configured for {disposition}"),
            }),
        };
        on_outcome(&outcome);
        summary.record(outcome);
    }

    info!(
        "Copied {} image(s), {} failure(s)",
        summary.copied(),
        summary.failures.len()
    );
    summary
}

fn copy_one(
    store: &dyn FileStore,
    asset: &ImageAsset,
    disposition: Disposition,
    dir: &std::path::Path,
) -> CopyOutcome {
    match store.copy_into(&asset.path, dir) {
        Ok(destination) => CopyOutcome::Copied {
            asset: asset.clone(),
            disposition,
            destination,
        },
        Err(source) => {
            let error = TriageError::FileCopy {
                path: asset.path.clone(),
                destination: dir.to_path_buf(),
                source,
            };
            warn!("{error}");
            CopyOutcome::Failed(CopyFailure {
                asset: asset.clone(),
                reason: error.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetId;

    fn collection(names: &[&str]) -> ImageCollection {
        let paths = names.iter().map(|n| PathBuf::from("/shoot").join(n)).collect();
        ImageCollection::new("/shoot", paths).unwrap_or_else(|| panic!("empty"))
    }

    #[test]
    fn test_plan_splits_decided_and_excluded() {
        let photos = collection(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut dispositions = Dispositions::new(3);
        dispositions.set(AssetId::from_index(0), Disposition::Keep);
        dispositions.set(AssetId::from_index(2), Disposition::Discard);

        let plan = RealizationPlan::new(&photos, &dispositions, CategoryNames::default());

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.excluded.len(), 1);
        assert!(plan.excluded[0].path.ends_with("b.jpg"));
        assert_eq!(
            plan.categories_present().into_iter().collect::<Vec<_>>(),
            vec![Disposition::Keep, Disposition::Discard]
        );
        assert_eq!(
            plan.folder(Disposition::Keep),
            Some(PathBuf::from("/shoot/Keep"))
        );
    }

    #[test]
    fn test_custom_folder_names() {
        let photos = collection(&["a.jpg"]);
        let mut dispositions = Dispositions::new(1);
        dispositions.set(AssetId::from_index(0), Disposition::Maybe);
        let names = CategoryNames {
            maybe: "Later".into(),
            ..CategoryNames::default()
        };

        let plan = RealizationPlan::new(&photos, &dispositions, names);
        assert_eq!(
            plan.folder(Disposition::Maybe),
            Some(PathBuf::from("/shoot/Later"))
        );
    }
}
