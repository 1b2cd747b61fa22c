//! taskdeck
//!
//! A personal task manager CLI: tasks with subtasks, lists, tags,
//! filtering and sorting, JSON persistence, and export/import.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use taskdeck::cli::export::{ExportArgs, ExportFormat};
use taskdeck::cli::import::ImportArgs;
use taskdeck::cli::{AddArgs, Cli, Command, ListArgs, parse_due};
use taskdeck::config::Config;
use taskdeck::export::Snapshot;
use taskdeck::format;
use taskdeck::storage::Storage;
use taskdeck::store::Store;
use taskdeck::types::{
    CreateListInput, CreateTagInput, CreateTaskInput, DueDateFilter, FilterOptions, SortOrder,
    TaskPriority, TaskStatus,
};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    let config = Config::load(cli.config.as_deref())?;

    let storage_path = cli
        .storage
        .or(config.storage_path.clone())
        .unwrap_or_else(Storage::default_path);
    let storage = Storage::new(storage_path);

    let store = match storage.load()? {
        Some(collections) => Store::from_collections(collections),
        None => Store::new(),
    };

    match cli.command {
        Command::Add(args) => cmd_add(&store, &storage, args)?,
        Command::List(args) => cmd_list(&store, &config, args)?,
        Command::Show { id } => {
            let task = store
                .get_task(&id)
                .ok_or_else(|| anyhow::anyhow!("task not found: {}", id))?;
            let snapshot = store.snapshot();
            print!(
                "{}",
                format::format_task_markdown(&task, &snapshot.lists, &snapshot.tags)
            );
        }
        Command::Done { id } => {
            let task = store.toggle_task_status(&id)?;
            storage.save(&store.snapshot());
            println!("{}: {}", task.status.as_str(), task.title);
        }
        Command::Rm { ids, permanent } => {
            for id in &ids {
                store.delete_task(id, permanent)?;
            }
            storage.save(&store.snapshot());
            let verb = if permanent { "deleted" } else { "archived" };
            println!("{} {} task(s)", verb, ids.len());
        }
        Command::Restore { id } => {
            let task = store.restore_task(&id)?;
            storage.save(&store.snapshot());
            println!("restored: {}", task.title);
        }
        Command::Reorder { ids } => {
            store.reorder_tasks(&ids);
            storage.save(&store.snapshot());
        }
        Command::Lists => {
            print!("{}", format::format_lists_markdown(&store.get_lists()));
        }
        Command::ListAdd { name, color } => {
            let list = store.create_list(CreateListInput { name, color })?;
            storage.save(&store.snapshot());
            println!("created list {} ({})", list.name, list.id);
        }
        Command::ListRm { id } => {
            store.delete_list(&id)?;
            storage.save(&store.snapshot());
            println!("deleted list {}; its tasks moved to the inbox", id);
        }
        Command::Tags => {
            print!("{}", format::format_tags_markdown(&store.get_tags()));
        }
        Command::TagAdd { name, color } => {
            let tag = store.create_tag(CreateTagInput { name, color })?;
            storage.save(&store.snapshot());
            println!("created tag {} ({})", tag.name, tag.id);
        }
        Command::TagRm { id } => {
            store.delete_tag(&id)?;
            storage.save(&store.snapshot());
            println!("deleted tag {}", id);
        }
        Command::TagMerge { source, target } => {
            let tag = store.merge_tags(&source, &target)?;
            storage.save(&store.snapshot());
            println!("merged {} into {}", source, tag.name);
        }
        Command::SubAdd { task_id, title } => {
            let subtask = store.add_subtask(&task_id, &title)?;
            storage.save(&store.snapshot());
            println!("added subtask {} ({})", subtask.title, subtask.id);
        }
        Command::SubDone { task_id, id } => {
            let subtask = store.toggle_subtask(&task_id, &id)?;
            storage.save(&store.snapshot());
            let state = if subtask.completed { "done" } else { "not done" };
            println!("{}: {}", state, subtask.title);
        }
        Command::SubRm { task_id, id } => {
            store.delete_subtask(&task_id, &id)?;
            storage.save(&store.snapshot());
            println!("deleted subtask {}", id);
        }
        Command::Export(args) => cmd_export(&store, args)?,
        Command::Import(args) => cmd_import(&store, &storage, args)?,
    }

    Ok(())
}

fn cmd_add(store: &Store, storage: &Storage, args: AddArgs) -> Result<()> {
    let priority = args
        .priority
        .as_deref()
        .map(|s| {
            TaskPriority::from_str(s)
                .ok_or_else(|| anyhow::anyhow!("unknown priority '{}'", s))
        })
        .transpose()?;
    let due_date = args.due.as_deref().map(parse_due).transpose()?;
    let tags = resolve_tag_names(store, &args.tag);

    let task = store.create_task(CreateTaskInput {
        title: args.title,
        description: args.description,
        priority,
        due_date,
        list_id: args.list,
        tags,
    })?;
    storage.save(&store.snapshot());
    println!("created task {} ({})", task.title, task.id);
    Ok(())
}

fn cmd_list(store: &Store, config: &Config, args: ListArgs) -> Result<()> {
    let mut status = Vec::new();
    for s in &args.status {
        status.push(
            TaskStatus::from_str(s).ok_or_else(|| anyhow::anyhow!("unknown status '{}'", s))?,
        );
    }
    // Archived tasks stay hidden unless asked for.
    if status.is_empty() {
        status = vec![TaskStatus::Active, TaskStatus::Completed];
    }

    let mut priority = Vec::new();
    for p in &args.priority {
        priority.push(
            TaskPriority::from_str(p)
                .ok_or_else(|| anyhow::anyhow!("unknown priority '{}'", p))?,
        );
    }

    let due_date = args
        .due
        .as_deref()
        .map(|s| {
            DueDateFilter::from_str(s)
                .ok_or_else(|| anyhow::anyhow!("unknown due bucket '{}'", s))
        })
        .transpose()?;

    let sort = match args.sort.as_deref() {
        Some(s) => Some(
            SortOrder::from_str(s).ok_or_else(|| anyhow::anyhow!("unknown sort order '{}'", s))?,
        ),
        None => config.default_sort,
    };

    let filters = FilterOptions {
        status,
        priority,
        due_date,
        tags: resolve_tag_names(store, &args.tag),
        list_id: args.list,
        search_query: args.search,
    };

    let output = format::OutputFormat::from_str(&args.format)
        .ok_or_else(|| anyhow::anyhow!("unknown output format '{}'", args.format))?;

    let tasks = store.query_tasks(Some(&filters), sort);
    match output {
        format::OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
        format::OutputFormat::Markdown => print!(
            "{}",
            format::format_tasks_markdown(&tasks, &store.get_lists())
        ),
    }
    Ok(())
}

/// Map tag names (case-insensitive) to tag ids, warning on unknown names.
fn resolve_tag_names(store: &Store, names: &[String]) -> Vec<String> {
    let tags = store.get_tags();
    let mut ids = Vec::new();
    for name in names {
        let lower = name.to_lowercase();
        match tags.iter().find(|t| t.name.to_lowercase() == lower) {
            Some(tag) => ids.push(tag.id.clone()),
            None => warn!(name = %name, "Unknown tag name, ignoring"),
        }
    }
    ids
}

fn cmd_export(store: &Store, args: ExportArgs) -> Result<()> {
    let snapshot = Snapshot::new(&store.snapshot());

    match args.format {
        ExportFormat::Json => match &args.output {
            Some(path) => {
                snapshot.write_file(path, args.should_compress())?;
                info!(path = %path.display(), "Export written");
            }
            None => println!("{}", snapshot.to_json_pretty()?),
        },
        ExportFormat::Csv => {
            let csv = snapshot.to_csv();
            match &args.output {
                Some(path) => {
                    std::fs::write(path, csv)?;
                    info!(path = %path.display(), "Export written");
                }
                None => print!("{}", csv),
            }
        }
    }
    Ok(())
}

fn cmd_import(store: &Store, storage: &Storage, args: ImportArgs) -> Result<()> {
    let snapshot = Snapshot::from_file(&args.file)?;
    info!(
        mode = args.import_mode(),
        tasks = snapshot.tasks.len(),
        lists = snapshot.lists.len(),
        tags = snapshot.tags.len(),
        "Import file parsed"
    );

    if args.dry_run {
        println!(
            "would import {} task(s), {} list(s), {} tag(s) in {} mode",
            snapshot.tasks.len(),
            snapshot.lists.len(),
            snapshot.tags.len(),
            args.import_mode()
        );
        return Ok(());
    }

    if args.merge {
        let (tasks, lists, tags) = store.merge_all(snapshot.into_collections());
        storage.save(&store.snapshot());
        println!("merged {} task(s), {} list(s), {} tag(s)", tasks, lists, tags);
        return Ok(());
    }

    if !args.force {
        print!("This will replace all existing data. Continue? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("aborted");
            return Ok(());
        }
    }

    store.replace_all(snapshot.into_collections());
    storage.save(&store.snapshot());
    println!("import complete");
    Ok(())
}
