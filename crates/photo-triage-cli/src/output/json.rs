//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;

use super::report::TriageReport;

/// Writes reports as one JSON document or as JSON Lines.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes the whole report as one JSON object.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_report(&self, report: &TriageReport, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }

    /// Writes one line per image, then a summary line without the image list.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_lines(&self, report: &TriageReport) -> Result<()> {
        let summary = TriageReport {
            images: Vec::new(),
            ..report.clone()
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        for image in &report.images {
            writeln!(writer, "{}", serde_json::to_string(image)?)?;
        }
        let line = serde_json::json!({ "summary": summary });
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
