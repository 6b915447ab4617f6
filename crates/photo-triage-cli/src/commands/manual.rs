//! Manual command - tag images one by one, then copy them into folders.

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use photo_triage_adapters::filesystem_services;
use photo_triage_core::domain::{CategoryNames, TriageError};
use photo_triage_core::ports::{AlwaysConfirm, Confirmation};
use photo_triage_core::session::OwnerUpdate;
use photo_triage_core::{ClassificationSession, SessionOwner, SessionSettings, TriageMode};
use tracing::{debug, info};

use super::auto::wait_realized;
use super::{category_names, ExitCode};
use crate::config::AppConfig;
use crate::output::{Command, LinePrompt, ProgressBar, TextOutput, TriageReport, HELP};

/// Arguments for manual review.
#[derive(Args, Clone)]
pub struct ManualArgs {
    /// Folder holding the photos
    pub folder: PathBuf,

    /// Copy as soon as every image is tagged, without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Category folder names (populated by `with_config`, not from CLI).
    #[arg(skip)]
    categories: Option<CategoryNames>,
}

impl ManualArgs {
    /// Apply configuration file values.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.categories = Some(category_names(config));
        args
    }
}

/// Result of running the manual command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct ManualResult {
    /// True if files were copied.
    pub realized: bool,
    /// Copies that failed.
    pub failures: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the manual command, reading operator commands from stdin.
pub fn run(args: &ManualArgs) -> Result<ManualResult> {
    run_with(args, &LinePrompt::stdin())
}

/// Run the manual command against any line reader.
pub fn run_with<R: BufRead>(args: &ManualArgs, prompt: &LinePrompt<R>) -> Result<ManualResult> {
    info!("Reviewing {} manually", args.folder.display());

    let settings = SessionSettings {
        categories: args.categories.clone().unwrap_or_default(),
        ..SessionSettings::default()
    };
    let progress = ProgressBar::new(false, std::io::stderr().is_terminal());
    let mut owner = SessionOwner::new(filesystem_services(), settings, None)
        .context("Cannot start triage session")?
        .with_progress(Arc::new(progress));

    owner.select_folder(&args.folder, TriageMode::Manual);
    for update in owner.wait_idle() {
        if let OwnerUpdate::SelectionFailed { error, .. } = update {
            return Err(error).with_context(|| format!("Cannot review {}", args.folder.display()));
        }
    }

    let confirmation: &dyn Confirmation = if args.yes { &AlwaysConfirm } else { prompt };
    let session = owner
        .session_mut()
        .with_context(|| format!("No session for {}", args.folder.display()))?;
    eprintln!("{} images to review ({HELP})", session.assets().len());
    show_current(session);

    if !review(session, prompt, confirmation)? {
        eprintln!("Quit without copying");
        return Ok(ManualResult {
            realized: false,
            failures: 0,
            exit_code: ExitCode::Success,
        });
    }

    owner.start_realization().context("Cannot copy files")?;
    let summary = wait_realized(&mut owner)?;
    let session = owner
        .session()
        .with_context(|| format!("No session for {}", args.folder.display()))?;
    let report = TriageReport::new(session, Some(&summary), false);
    TextOutput::stdout().write_report(&report, false)?;

    let failures = report.failure_count();
    Ok(ManualResult {
        realized: true,
        failures,
        exit_code: if failures > 0 {
            ExitCode::PartialFailure
        } else {
            ExitCode::Success
        },
    })
}

/// Runs the command loop. Returns true when the operator chose to copy.
fn review<R: BufRead>(
    session: &mut ClassificationSession,
    prompt: &LinePrompt<R>,
    confirmation: &dyn Confirmation,
) -> Result<bool> {
    loop {
        match prompt.read_command() {
            Command::Tag(disposition) => {
                let name = session
                    .current_asset()
                    .map(|a| a.file_name().to_string())
                    .unwrap_or_default();
                let outcome = session.tag(disposition)?;
                eprintln!("{name}: {disposition}");
                if outcome.batch_complete {
                    let question =
                        format!("All {} images tagged. Copy into folders now?", session.assets().len());
                    if confirmation.confirm(&question) {
                        return Ok(true);
                    }
                    debug!("Copy declined, continuing review");
                }
                show_current(session);
            }
            Command::Next => {
                session.advance()?;
                show_current(session);
            }
            Command::Previous => {
                session.retreat()?;
                show_current(session);
            }
            Command::Status => show_status(session),
            Command::Finish => match session.realization_plan() {
                Ok(_) => return Ok(true),
                Err(TriageError::Untagged { remaining }) => {
                    eprintln!("{remaining} image(s) still untagged");
                }
                Err(e) => return Err(e.into()),
            },
            Command::Quit => return Ok(false),
            Command::Help => eprintln!("{HELP}"),
        }
    }
}

fn show_current(session: &ClassificationSession) {
    if let (Some(index), Some(asset)) = (session.current_index(), session.current_asset()) {
        eprintln!(
            "[{}/{}] {} ({})",
            index + 1,
            session.assets().len(),
            asset.path.display(),
            session.disposition(asset.id())
        );
    }
}

fn show_status(session: &ClassificationSession) {
    show_current(session);
    let dispositions = session.dispositions();
    eprintln!(
        "{} untagged of {}",
        dispositions.undecided(),
        dispositions.len()
    );
}
