//! Import subcommand for the taskdeck CLI
//!
//! Imports task data from a JSON export file back into the store.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the import subcommand
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the export file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Validate the file and report what would change, without importing
    #[arg(long)]
    pub dry_run: bool,

    /// Merge mode: add entities with new ids, keep existing ones untouched
    ///
    /// By default, import replaces all data with the file's contents.
    #[arg(long)]
    pub merge: bool,

    /// Skip the confirmation prompt in replace mode
    #[arg(long)]
    pub force: bool,
}

impl ImportArgs {
    /// Describe the import mode for logging
    pub fn import_mode(&self) -> &'static str {
        if self.dry_run {
            "dry-run"
        } else if self.merge {
            "merge"
        } else {
            "replace"
        }
    }
}
