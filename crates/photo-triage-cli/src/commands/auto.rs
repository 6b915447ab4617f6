//! Auto command - score every image and sort by sharpness.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use photo_triage_adapters::filesystem_services;
use photo_triage_core::domain::{CategoryNames, RealizationSummary, Threshold};
use photo_triage_core::session::OwnerUpdate;
use photo_triage_core::{SessionOwner, SessionSettings, TriageMode};
use tracing::{debug, info};

use super::{category_names, ExitCode};
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar, TextOutput, TriageReport};

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Single JSON object
    Json,
    /// JSON Lines (one object per image, then a summary line)
    Jsonl,
}

/// Hardcoded default values.
mod defaults {
    pub const THRESHOLD: f64 = 100.0;
}

/// Parse and validate a threshold value (0-100).
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=100"))
    }
}

/// Parse a worker thread count (at least 1).
fn parse_threads(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("thread count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a valid thread count")),
    }
}

/// Arguments for automatic sorting.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AutoArgs {
    /// Folder holding the photos
    pub folder: PathBuf,

    /// Sharpness threshold (0-100); images scoring below it are discarded
    #[arg(short, long, value_parser = parse_threshold, conflicts_with = "lock_default")]
    pub threshold: Option<f64>,

    /// Pin the threshold to the default (100)
    #[arg(long)]
    pub lock_default: bool,

    /// Score and report without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Worker threads for scoring and copying (default: one per core)
    #[arg(long, value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Category folder names (populated by `with_config`, not from CLI).
    #[arg(skip)]
    categories: Option<CategoryNames>,
}

impl AutoArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.threshold = args.threshold.or(config.sorting.threshold);
        args.threads = args.threads.or(config.sorting.threads);
        if !args.lock_default {
            args.lock_default = config.sorting.lock_default.unwrap_or(false);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, true).ok());
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.categories = Some(category_names(config));
        args
    }

    /// Get threshold with fallback to hardcoded default.
    fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(defaults::THRESHOLD)
    }

    /// Get output format with fallback to text.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn categories(&self) -> CategoryNames {
        self.categories.clone().unwrap_or_default()
    }
}

/// Result of running the auto command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct AutoResult {
    /// Number of images in the folder.
    pub total: usize,
    /// Images classified as blurry.
    pub blurry: usize,
    /// Images that could not be scored or copied.
    pub failures: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the auto command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &AutoArgs) -> Result<AutoResult> {
    info!("Sorting {} automatically", args.folder.display());

    // Only reachable through config layering; clap rejects both flags.
    if args.lock_default {
        if let Some(t) = args
            .threshold
            .filter(|t| (t - defaults::THRESHOLD).abs() > f64::EPSILON)
        {
            eprintln!(
                "warning: threshold {t} ignored, locked to the default {}",
                defaults::THRESHOLD
            );
        }
    }

    let threshold = Threshold::new(args.threshold()).context("Invalid threshold")?;
    let settings = SessionSettings {
        threshold,
        lock_default: args.lock_default,
        categories: args.categories(),
    };

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(args.quiet, show_progress);

    let mut owner = SessionOwner::new(filesystem_services(), settings, args.threads)
        .context("Cannot start triage session")?
        .with_progress(Arc::new(progress));

    owner.select_folder(&args.folder, TriageMode::Automatic);
    for update in owner.wait_idle() {
        if let OwnerUpdate::SelectionFailed { error, .. } = update {
            return Err(error).with_context(|| format!("Cannot sort {}", args.folder.display()));
        }
    }

    let summary = if args.dry_run {
        debug!("Dry run, skipping copy");
        None
    } else {
        owner.start_realization().context("Cannot copy files")?;
        Some(wait_realized(&mut owner)?)
    };

    let session = owner
        .session()
        .with_context(|| format!("No session for {}", args.folder.display()))?;
    let report = TriageReport::new(session, summary.as_ref(), args.dry_run);

    match args.format() {
        OutputFormat::Text => TextOutput::stdout().write_report(&report, !args.quiet)?,
        OutputFormat::Json => JsonOutput::stdout().write_report(&report, args.pretty)?,
        OutputFormat::Jsonl => JsonOutput::stdout().write_lines(&report)?,
    }

    let failures = report.failure_count();
    info!(
        "Sorted {} images: {} blurry, {failures} failed",
        report.total, report.blurry
    );

    Ok(AutoResult {
        total: report.total,
        blurry: report.blurry,
        failures,
        exit_code: if failures > 0 {
            ExitCode::PartialFailure
        } else {
            ExitCode::Success
        },
    })
}

/// Waits for the copy batch and returns its summary.
pub(super) fn wait_realized(owner: &mut SessionOwner) -> Result<RealizationSummary> {
    owner
        .wait_idle()
        .into_iter()
        .find_map(|update| match update {
            OwnerUpdate::Realized { summary } => Some(summary),
            _ => None,
        })
        .context("Copy batch ended without a summary")
}
