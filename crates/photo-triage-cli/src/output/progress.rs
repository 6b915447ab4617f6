//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use photo_triage_core::{ProgressEvent, ProgressSink};

/// Progress bar adapter for CLI output.
///
/// One bar is reused for every batch; `Started` resets its length and label.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise only warnings
    #[must_use]
    pub fn new(quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = show_bar.then(|| {
            let bar = IndicatifBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} {msg:8} [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { phase, total } => {
                if let Some(bar) = &self.bar {
                    bar.reset();
                    bar.set_length(total as u64);
                    bar.set_message(phase.to_string());
                }
            }
            ProgressEvent::Advanced { completed, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(completed as u64);
                }
            }
            ProgressEvent::Skipped { path, reason, .. } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    bar.suspend(|| eprintln!("WARN: Skipping {path}: {reason}"));
                } else {
                    eprintln!("WARN: Skipping {path}: {reason}");
                }
            }
            ProgressEvent::Finished {
                phase,
                completed,
                failed,
            } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!(
                        "Done {phase}: {completed} ok, {failed} failed"
                    ));
                }
            }
        }
    }
}
