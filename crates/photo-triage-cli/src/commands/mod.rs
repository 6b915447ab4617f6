//! CLI command definitions and handlers.

pub mod auto;
pub mod manual;

use clap::{Parser, Subcommand};
use photo_triage_core::domain::CategoryNames;

use crate::config::AppConfig;

/// Photo Triage - Sort a folder of photos into Keep, Discard and Maybe
#[derive(Parser)]
#[command(name = "photo-triage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score every image for sharpness and split into Keep and Discard
    Auto(auto::AutoArgs),
    /// Review images one by one and tag them Keep, Discard or Maybe
    Manual(manual::ManualArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Everything was sorted.
    Success = 0,
    /// Finished, but some images could not be scored or copied.
    PartialFailure = 1,
    /// The command could not run.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Category folder names from config, falling back to the defaults.
fn category_names(config: &AppConfig) -> CategoryNames {
    config.folders.names()
}
