//! Mock implementations of core port traits.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use image::GrayImage;
use photo_triage_core::domain::{ImageAsset, ImageCollection, SharpnessScore, TriageError};
use photo_triage_core::ports::{
    Confirmation, FileStore, ImageDecoder, ImageSource, ProgressEvent, ProgressSink,
    SharpnessScorer,
};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Mock implementation of `ImageSource` for testing.
///
/// Serves pre-registered folders by path; any other folder fails with
/// [`TriageError::FolderAccess`]. Tracks how often each folder was loaded.
#[derive(Default)]
pub struct MockImageSource {
    folders: HashMap<PathBuf, Vec<String>>,
    loads: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockImageSource {
    /// Creates a source with no folders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `folder` holding files named `names`, in that order.
    /// An empty list makes the folder load as
    /// [`TriageError::EmptyCollection`].
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<PathBuf>, names: &[&str]) -> Self {
        self.folders
            .insert(folder.into(), names.iter().map(ToString::to_string).collect());
        self
    }

    /// Folders loaded so far, in call order.
    #[must_use]
    pub fn loads(&self) -> Vec<PathBuf> {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ImageSource for MockImageSource {
    fn load(&self, folder: &Path) -> Result<ImageCollection, TriageError> {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(folder.to_path_buf());

        let names = self
            .folders
            .get(folder)
            .ok_or_else(|| TriageError::FolderAccess {
                path: folder.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such folder"),
            })?;
        let paths = names.iter().map(|n| folder.join(n)).collect();
        ImageCollection::new(folder, paths).ok_or_else(|| TriageError::EmptyCollection {
            path: folder.to_path_buf(),
        })
    }
}

/// Mock implementation of `ImageDecoder` keyed by file name.
#[derive(Default)]
pub struct MockImageDecoder {
    images: HashMap<String, GrayImage>,
}

impl MockImageDecoder {
    /// Creates a decoder that fails for every file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `name` to `image`.
    #[must_use]
    pub fn with_image(mut self, name: &str, image: GrayImage) -> Self {
        self.images.insert(name.to_string(), image);
        self
    }
}

impl ImageDecoder for MockImageDecoder {
    fn decode(&self, path: &Path) -> Result<GrayImage, TriageError> {
        self.images
            .get(&file_name(path))
            .cloned()
            .ok_or_else(|| TriageError::ImageDecode {
                path: path.to_path_buf(),
                reason: "unknown test image".into(),
            })
    }
}

/// Scorer returning fixed values keyed by file name.
///
/// Unknown names fail to decode. An optional per-name delay lets tests
/// hold a result in flight while the session moves on.
#[derive(Default)]
pub struct FixedScorer {
    values: HashMap<String, f64>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FixedScorer {
    /// Creates a scorer with no known files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores every `(name, value)` pair.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        pairs
            .iter()
            .fold(Self::new(), |scorer, (name, value)| scorer.with(name, *value))
    }

    /// Scores `name` as `value`.
    #[must_use]
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Sleeps for `delay` before scoring `name`.
    #[must_use]
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// File names scored so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SharpnessScorer for FixedScorer {
    fn score(&self, asset: &ImageAsset) -> SharpnessScore {
        let name = asset.file_name().to_string();
        if let Some(delay) = self.delays.get(&name) {
            std::thread::sleep(*delay);
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.clone());
        match self.values.get(&name) {
            Some(value) => SharpnessScore::scored(asset.id(), *value),
            None => SharpnessScore::decode_failed(asset.id(), format!("cannot decode {name}")),
        }
    }
}

/// In-memory `FileStore` recording directories and copies.
///
/// Copies of file names registered with [`MockFileStore::failing`] and
/// directories registered with [`MockFileStore::failing_dir`] fail.
#[derive(Default)]
pub struct MockFileStore {
    failing_files: HashSet<String>,
    failing_dirs: HashSet<PathBuf>,
    copy_delay: Option<Duration>,
    dirs: Arc<Mutex<Vec<PathBuf>>>,
    copies: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl MockFileStore {
    /// Creates a store where everything succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes copies of `name` fail.
    #[must_use]
    pub fn failing(mut self, name: &str) -> Self {
        self.failing_files.insert(name.to_string());
        self
    }

    /// Makes creating `dir` fail.
    #[must_use]
    pub fn failing_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failing_dirs.insert(dir.into());
        self
    }

    /// Sleeps for `delay` before every copy.
    #[must_use]
    pub fn with_copy_delay(mut self, delay: Duration) -> Self {
        self.copy_delay = Some(delay);
        self
    }

    /// Directories created, in call order.
    #[must_use]
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Successful `(source, destination)` copies, in call order.
    #[must_use]
    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FileStore for MockFileStore {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        if self.failing_dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only folder",
            ));
        }
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(dir.to_path_buf());
        Ok(())
    }

    fn copy_into(&self, source: &Path, dir: &Path) -> io::Result<PathBuf> {
        if let Some(delay) = self.copy_delay {
            std::thread::sleep(delay);
        }
        let name = file_name(source);
        if self.failing_files.contains(&name) {
            return Err(io::Error::other("disk full"));
        }
        let destination = dir.join(&name);
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((source.to_path_buf(), destination.clone()));
        Ok(destination)
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Returns the number of `Advanced` events.
    #[must_use]
    pub fn advanced_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Advanced { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the `(completed, failed)` counts of every `Finished` event.
    #[must_use]
    pub fn finished_counts(&self) -> Vec<(usize, usize)> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Finished {
                    completed, failed, ..
                } => Some((*completed, *failed)),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Confirmation that replays scripted answers and records prompts.
///
/// Once the script runs out every further prompt is declined.
#[derive(Default)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    /// Creates a confirmation answering with `answers` in order.
    #[must_use]
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use photo_triage_core::domain::AssetId;
    use photo_triage_core::ports::Phase;

    #[test]
    fn test_mock_image_source_folders() {
        let source = MockImageSource::new()
            .with_folder("/shoot", &["a.jpg", "b.jpg"])
            .with_folder("/empty", &[]);

        let collection = source.load(Path::new("/shoot")).unwrap();
        assert_eq!(collection.len(), 2);
        assert!(matches!(
            source.load(Path::new("/empty")),
            Err(TriageError::EmptyCollection { .. })
        ));
        assert!(matches!(
            source.load(Path::new("/missing")),
            Err(TriageError::FolderAccess { .. })
        ));
        assert_eq!(source.loads().len(), 3);
    }

    #[test]
    fn test_fixed_scorer() {
        let scorer = FixedScorer::from_pairs(&[("a.jpg", 40.0)]);
        let known = ImageAsset {
            path: PathBuf::from("/shoot/a.jpg"),
            discovery_index: 0,
        };
        let unknown = ImageAsset {
            path: PathBuf::from("/shoot/b.jpg"),
            discovery_index: 1,
        };

        assert!(scorer.score(&known).is_scored());
        let failed = scorer.score(&unknown);
        assert!(!failed.is_scored());
        assert_eq!(failed.asset, AssetId::from_index(1));
        assert_eq!(scorer.calls(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_mock_file_store_failures() {
        let store = MockFileStore::new()
            .failing("bad.jpg")
            .failing_dir("/shoot/Maybe");

        assert!(store.ensure_dir(Path::new("/shoot/Keep")).is_ok());
        assert!(store.ensure_dir(Path::new("/shoot/Maybe")).is_err());
        assert!(store
            .copy_into(Path::new("/shoot/bad.jpg"), Path::new("/shoot/Keep"))
            .is_err());
        let dest = store
            .copy_into(Path::new("/shoot/ok.jpg"), Path::new("/shoot/Keep"))
            .unwrap();

        assert_eq!(dest, PathBuf::from("/shoot/Keep/ok.jpg"));
        assert_eq!(store.copies().len(), 1);
        assert_eq!(store.dirs(), vec![PathBuf::from("/shoot/Keep")]);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();
        sink.on_event(ProgressEvent::Started {
            phase: Phase::Scoring,
            total: 1,
        });
        sink.on_event(ProgressEvent::Finished {
            phase: Phase::Scoring,
            completed: 1,
            failed: 0,
        });

        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.finished_counts(), vec![(1, 0)]);
    }

    #[test]
    fn test_scripted_confirmation_runs_out() {
        let confirm = ScriptedConfirmation::new(&[true]);
        assert!(confirm.confirm("first?"));
        assert!(!confirm.confirm("second?"));
        assert_eq!(confirm.prompts(), vec!["first?", "second?"]);
    }
}
