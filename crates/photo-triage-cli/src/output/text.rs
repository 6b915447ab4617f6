//! Plain-text report for terminals.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;

use super::report::TriageReport;

/// Writes a human-readable report.
pub struct TextOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextOutput {
    /// Creates a new text output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new text output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes the per-image table followed by the totals.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_report(&self, report: &TriageReport, list_images: bool) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        render(&mut *writer, report, list_images)?;
        writer.flush()?;
        Ok(())
    }
}

fn render(w: &mut dyn Write, report: &TriageReport, list_images: bool) -> io::Result<()> {
    if list_images {
        for image in &report.images {
            let name = image
                .path
                .file_name()
                .map_or_else(|| image.path.display().to_string(), |n| n.to_string_lossy().into_owned());
            match (&image.error, image.score) {
                (Some(error), _) => writeln!(w, "{name:<32} {:>10}  unreadable: {error}", "-")?,
                (None, Some(score)) => {
                    writeln!(w, "{name:<32} {score:>10.2}  {}", image.disposition)?;
                }
                (None, None) => writeln!(w, "{name:<32} {:>10}  {}", "-", image.disposition)?,
            }
        }
    }

    if let Some(threshold) = report.threshold {
        let lock = if report.threshold_locked { " (locked)" } else { "" };
        writeln!(w, "Threshold: {threshold}{lock}")?;
        writeln!(w, "There were {} blurry images", report.blurry)?;
    }

    match &report.copied {
        None if report.dry_run => writeln!(w, "Dry run: no files copied")?,
        None => {}
        Some(copied) => {
            let counts: Vec<_> = copied
                .folders
                .iter()
                .map(|(folder, count)| format!("{folder} {count}"))
                .collect();
            if counts.is_empty() {
                writeln!(w, "Copied: nothing")?;
            } else {
                writeln!(w, "Copied: {}", counts.join(", "))?;
            }
            for failure in &copied.failures {
                writeln!(w, "Failed: {}: {}", failure.path.display(), failure.reason)?;
            }
            for path in &copied.excluded {
                writeln!(w, "Not copied (unreadable): {}", path.display())?;
            }
        }
    }
    Ok(())
}
