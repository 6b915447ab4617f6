//! Configuration file support for photo-triage.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/photo-triage/config.toml` (lowest priority)
//! - Project-local: `.photo-triage.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use photo_triage_core::domain::{is_plain_folder_name, CategoryNames};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Automatic sorting settings.
    pub sorting: SortingConfig,
    /// Category folder names.
    pub folders: FoldersConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Automatic sorting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SortingConfig {
    /// Sharpness threshold (0-100).
    pub threshold: Option<f64>,
    /// Pin the threshold to the default.
    pub lock_default: Option<bool>,
    /// Worker threads for scoring and copying.
    pub threads: Option<usize>,
}

/// Category folder names.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    /// Folder for sharp or kept images.
    pub keep: Option<String>,
    /// Folder for blurry or rejected images.
    pub discard: Option<String>,
    /// Folder for undecided images (manual mode).
    pub maybe: Option<String>,
}

impl FoldersConfig {
    /// Configured names, trimmed, with defaults for unset or unusable ones.
    pub fn names(&self) -> CategoryNames {
        let defaults = CategoryNames::default();
        let pick = |name: &Option<String>, default: String| {
            name.as_deref()
                .filter(|n| is_plain_folder_name(n))
                .map_or(default, |n| n.trim().to_string())
        };
        CategoryNames {
            keep: pick(&self.keep, defaults.keep),
            discard: pick(&self.discard, defaults.discard),
            maybe: pick(&self.maybe, defaults.maybe),
        }
    }
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json", "jsonl" or "text".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/photo-triage/config.toml`
    /// 2. Project-local: `.photo-triage.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are warned about
    /// and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.sanitize() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Lists values outside their accepted ranges.
    fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(t) = self.sorting.threshold {
            if !(0.0..=100.0).contains(&t) {
                problems.push(format!("sorting.threshold must be 0-100, got {t}"));
            }
        }
        if self.sorting.threads == Some(0) {
            problems.push("sorting.threads must be at least 1".to_string());
        }

        for (key, name) in [
            ("folders.keep", &self.folders.keep),
            ("folders.discard", &self.folders.discard),
            ("folders.maybe", &self.folders.maybe),
        ] {
            if let Some(name) = name {
                if !is_plain_folder_name(name) {
                    problems.push(format!("{key} must be a plain folder name, got '{name}'"));
                }
            }
        }
        // Two categories in one folder would mix their files.
        if let Err(e) = self.folders.names().validate() {
            problems.push(format!("folders: {e}"));
        }

        if let Some(ref f) = self.output.format {
            if !matches!(f.as_str(), "json" | "jsonl" | "text") {
                problems.push(format!(
                    "output.format must be 'json', 'jsonl' or 'text', got '{f}'"
                ));
            }
        }

        problems
    }

    /// Drops invalid values so the defaults apply, returning what was wrong.
    fn sanitize(&mut self) -> Vec<String> {
        let problems = self.validate();
        if problems.is_empty() {
            return problems;
        }

        self.sorting.threshold = self
            .sorting
            .threshold
            .filter(|t| (0.0..=100.0).contains(t));
        self.sorting.threads = self.sorting.threads.filter(|n| *n > 0);
        for name in [
            &mut self.folders.keep,
            &mut self.folders.discard,
            &mut self.folders.maybe,
        ] {
            if name.as_deref().is_some_and(|n| !is_plain_folder_name(n)) {
                *name = None;
            }
        }
        if self.folders.names().validate().is_err() {
            self.folders = FoldersConfig::default();
        }
        if self
            .output
            .format
            .as_deref()
            .is_some_and(|f| !matches!(f, "json" | "jsonl" | "text"))
        {
            self.output.format = None;
        }

        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Sorting
        self.sorting.threshold = other.sorting.threshold.or(self.sorting.threshold);
        self.sorting.lock_default = other.sorting.lock_default.or(self.sorting.lock_default);
        self.sorting.threads = other.sorting.threads.or(self.sorting.threads);

        // Folders
        self.folders.keep = other.folders.keep.or_else(|| self.folders.keep.take());
        self.folders.discard = other
            .folders
            .discard
            .or_else(|| self.folders.discard.take());
        self.folders.maybe = other.folders.maybe.or_else(|| self.folders.maybe.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photo-triage").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.photo-triage.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".photo-triage.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
