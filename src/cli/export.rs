//! Export subcommand for the taskdeck CLI
//!
//! Exports all task data to JSON (round-trippable) or CSV (one-way,
//! tasks only).

use clap::Args;
use std::path::PathBuf;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// Full snapshot, re-importable
    #[default]
    Json,
    /// Task table only, for spreadsheets
    Csv,
}

/// Arguments for the export subcommand
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Force gzip compression (auto-detected from .gz extension otherwise)
    #[arg(long)]
    pub gzip: bool,
}

impl ExportArgs {
    /// Determine if output should be compressed based on args and filename.
    /// CSV output is never compressed.
    pub fn should_compress(&self) -> bool {
        if self.format == ExportFormat::Csv {
            return false;
        }
        if self.gzip {
            return true;
        }
        self.output
            .as_ref()
            .is_some_and(|path| path.extension().is_some_and(|ext| ext == "gz"))
    }
}
