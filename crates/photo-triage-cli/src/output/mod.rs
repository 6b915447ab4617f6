//! Output formatting and operator input for the CLI.

mod json;
mod progress;
mod prompt;
mod report;
mod text;

pub use json::JsonOutput;
pub use progress::ProgressBar;
pub use prompt::{Command, LinePrompt, HELP};
pub use report::TriageReport;
pub use text::TextOutput;
