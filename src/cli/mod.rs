//! CLI command definitions for taskdeck
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod export;
pub mod import;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use clap::{Args, Parser, Subcommand};
use export::ExportArgs;
use import::ImportArgs;
use std::path::PathBuf;

/// Personal task manager CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to storage file (overrides config)
    #[arg(short, long, global = true)]
    pub storage: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task
    Add(AddArgs),

    /// List tasks, filtered and sorted
    List(ListArgs),

    /// Show one task in full, subtasks included
    Show {
        /// Task id
        id: String,
    },

    /// Toggle a task between active and completed
    Done {
        /// Task id
        id: String,
    },

    /// Delete tasks (soft by default; archived tasks can be restored)
    Rm {
        /// Task ids
        ids: Vec<String>,

        /// Remove permanently instead of archiving
        #[arg(long)]
        permanent: bool,
    },

    /// Restore an archived task to active
    Restore {
        /// Task id
        id: String,
    },

    /// Set the manual order of tasks within their lists
    Reorder {
        /// Task ids in the desired order
        ids: Vec<String>,
    },

    /// Show all lists
    Lists,

    /// Add a list
    ListAdd {
        /// List name
        name: String,

        /// Display color
        #[arg(long, default_value = "#64748b")]
        color: String,
    },

    /// Delete a list; its tasks move to the inbox
    ListRm {
        /// List id
        id: String,
    },

    /// Show all tags
    Tags,

    /// Add a tag
    TagAdd {
        /// Tag name (unique, case-insensitive)
        name: String,

        /// Display color
        #[arg(long, default_value = "#ef4444")]
        color: String,
    },

    /// Delete a tag, removing it from every task
    TagRm {
        /// Tag id
        id: String,
    },

    /// Merge one tag into another and delete the source
    TagMerge {
        /// Tag id to fold in
        source: String,

        /// Tag id that survives
        target: String,
    },

    /// Add a subtask to a task
    SubAdd {
        /// Parent task id
        task_id: String,

        /// Subtask title
        title: String,
    },

    /// Toggle a subtask's completed flag
    SubDone {
        /// Parent task id
        task_id: String,

        /// Subtask id
        id: String,
    },

    /// Delete a subtask
    SubRm {
        /// Parent task id
        task_id: String,

        /// Subtask id
        id: String,
    },

    /// Export all data to JSON or CSV
    Export(ExportArgs),

    /// Import data from a JSON export file
    Import(ImportArgs),
}

/// Arguments for the add subcommand
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority: none, low, medium, high
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Due date as YYYY-MM-DD (local midnight)
    #[arg(long)]
    pub due: Option<String>,

    /// Target list id (default: inbox)
    #[arg(long)]
    pub list: Option<String>,

    /// Tag names; unknown names are ignored
    #[arg(short, long)]
    pub tag: Vec<String>,
}

/// Arguments for the list subcommand
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Statuses to include: active, completed, archived
    #[arg(long)]
    pub status: Vec<String>,

    /// Priorities to include: none, low, medium, high
    #[arg(short, long)]
    pub priority: Vec<String>,

    /// Due bucket: overdue, today, tomorrow, this_week, no_date, all
    #[arg(long)]
    pub due: Option<String>,

    /// Tag names; a task matches when it carries any of them
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Restrict to one list id
    #[arg(long)]
    pub list: Option<String>,

    /// Case-insensitive substring search in title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Sort order: due_date, priority, created_at, alphabetical, manual
    #[arg(long)]
    pub sort: Option<String>,

    /// Output format: markdown (default) or json
    #[arg(long, default_value = "markdown")]
    pub format: String,
}

/// Parse a YYYY-MM-DD due date into local-midnight epoch milliseconds.
pub fn parse_due(s: &str) -> anyhow::Result<i64> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{}', expected YYYY-MM-DD", s))?;
    let midnight = date.and_time(NaiveTime::MIN);
    let dt = Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| anyhow::anyhow!("date '{}' has no local midnight", s))?;
    Ok(dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_due_accepts_iso_dates() {
        let ms = parse_due("2025-03-10").unwrap();
        let back = Local.timestamp_millis_opt(ms).unwrap();
        assert_eq!(back.format("%Y-%m-%d %H:%M").to_string(), "2025-03-10 00:00");
    }

    #[test]
    fn parse_due_rejects_garbage() {
        assert!(parse_due("tomorrow").is_err());
        assert!(parse_due("2025-13-01").is_err());
    }
}
