//! Output formatting for the command line.

use crate::types::{List, Tag, Task, TaskPriority, TaskStatus};
use chrono::{Local, TimeZone};
use std::collections::HashMap;

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// First eight characters of an id, cut on a char boundary. Imported ids
/// are arbitrary strings, not necessarily ASCII UUIDs.
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn format_date(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => ms.to_string(),
    }
}

/// Format a single task as markdown, with its subtasks as a checklist.
pub fn format_task_markdown(task: &Task, lists: &[List], tags: &[Tag]) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Task: {}\n", task.title));
    md.push_str(&format!("- **id**: `{}`\n", task.id));
    md.push_str(&format!("- **status**: {}\n", task.status.as_str()));
    md.push_str(&format!("- **priority**: {}\n", task.priority.as_str()));

    if let Some(due) = task.due_date {
        md.push_str(&format!("- **due**: {}\n", format_date(due)));
    }

    if let Some(ref list_id) = task.list_id {
        let name = lists
            .iter()
            .find(|l| &l.id == list_id)
            .map(|l| l.name.as_str())
            .unwrap_or(list_id.as_str());
        md.push_str(&format!("- **list**: {}\n", name));
    }

    if !task.tags.is_empty() {
        let names: Vec<&str> = task
            .tags
            .iter()
            .map(|id| {
                tags.iter()
                    .find(|t| &t.id == id)
                    .map(|t| t.name.as_str())
                    .unwrap_or(id.as_str())
            })
            .collect();
        md.push_str(&format!("- **tags**: {}\n", names.join(", ")));
    }

    if let Some(completed) = task.completed_at {
        md.push_str(&format!("- **completed**: {}\n", format_date(completed)));
    }

    if let Some(ref desc) = task.description {
        md.push_str("\n### Description\n");
        md.push_str(desc);
        md.push('\n');
    }

    if !task.subtasks.is_empty() {
        md.push_str("\n### Subtasks\n");
        let mut subtasks: Vec<_> = task.subtasks.iter().collect();
        subtasks.sort_by_key(|s| s.position);
        for subtask in subtasks {
            let mark = if subtask.completed { "x" } else { " " };
            md.push_str(&format!("- [{}] {}\n", mark, subtask.title));
        }
    }

    md
}

/// Format a list of tasks as markdown, grouped by list.
pub fn format_tasks_markdown(tasks: &[Task], lists: &[List]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Tasks ({})\n\n", tasks.len()));

    // Group tasks by list, lists in display order, stray list ids last.
    let mut by_list: HashMap<Option<&str>, Vec<&Task>> = HashMap::new();
    for task in tasks {
        by_list
            .entry(task.list_id.as_deref())
            .or_default()
            .push(task);
    }

    let mut ordered: Vec<&List> = lists.iter().collect();
    ordered.sort_by_key(|l| l.position);
    for list in ordered {
        if let Some(group) = by_list.remove(&Some(list.id.as_str())) {
            md.push_str(&format!("## {}\n\n", list.name));
            for task in group {
                md.push_str(&format_task_short(task));
            }
            md.push('\n');
        }
    }

    let mut strays: Vec<(Option<&str>, Vec<&Task>)> = by_list.into_iter().collect();
    strays.sort_by_key(|(id, _)| id.map(str::to_string));
    for (list_id, group) in strays {
        md.push_str(&format!("## {}\n\n", list_id.unwrap_or("(no list)")));
        for task in group {
            md.push_str(&format_task_short(task));
        }
        md.push('\n');
    }

    md
}

/// Format a task in short form for lists.
fn format_task_short(task: &Task) -> String {
    let done = match task.status {
        TaskStatus::Completed => "[x] ",
        TaskStatus::Active => "[ ] ",
        TaskStatus::Archived => "[~] ",
    };

    let priority_marker = match task.priority {
        TaskPriority::High => "!!! ",
        _ => "",
    };

    let due = task
        .due_date
        .map(|ms| format!(" (due {})", format_date(ms)))
        .unwrap_or_default();

    let subtasks = if task.subtasks.is_empty() {
        String::new()
    } else {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        format!(" [{}/{}]", done, task.subtasks.len())
    };

    format!(
        "- {}{}{} `{}`{}{}\n",
        done,
        priority_marker,
        task.title,
        short_id(&task.id),
        due,
        subtasks,
    )
}

/// Format all lists as markdown.
pub fn format_lists_markdown(lists: &[List]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Lists ({})\n\n", lists.len()));
    for list in lists {
        let default = if list.is_default { " (default)" } else { "" };
        md.push_str(&format!(
            "- {} `{}` {}{}\n",
            list.name, list.id, list.color, default
        ));
    }
    md
}

/// Format all tags as markdown.
pub fn format_tags_markdown(tags: &[Tag]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Tags ({})\n\n", tags.len()));
    for tag in tags {
        md.push_str(&format!("- {} `{}` {}\n", tag.name, tag.id, tag.color));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::{CreateTaskInput, UpdateTaskInput};

    #[test]
    fn short_form_marks_priority_and_completion() {
        let store = Store::new();
        let task = store
            .create_task(CreateTaskInput {
                title: "Ship it".to_string(),
                priority: Some(TaskPriority::High),
                ..Default::default()
            })
            .unwrap();
        store.add_subtask(&task.id, "Pack").unwrap();
        let task = store.get_task(&task.id).unwrap();

        let line = format_task_short(&task);
        assert!(line.starts_with("- [ ] !!! Ship it"));
        assert!(line.contains("[0/1]"));
    }

    #[test]
    fn short_id_respects_char_boundaries() {
        assert_eq!(short_id("0199a7e4-aaaa"), "0199a7e4");
        assert_eq!(short_id("short"), "short");
        // A multi-byte character straddling the cut must not split.
        assert_eq!(short_id("aufgabe-ä-eins"), "aufgabe-");
        assert_eq!(short_id("日本語の識別子です"), "日本語の識別子で");
    }

    #[test]
    fn output_format_parses_known_names() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("MD"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn grouped_listing_uses_list_names() {
        let store = Store::new();
        store
            .create_task(CreateTaskInput {
                title: "One".to_string(),
                ..Default::default()
            })
            .unwrap();
        let snapshot = store.snapshot();

        let md = format_tasks_markdown(&snapshot.tasks, &snapshot.lists);
        assert!(md.starts_with("# Tasks (1)"));
        assert!(md.contains("## Inbox"));
    }

    #[test]
    fn detail_includes_subtask_checklist() {
        let store = Store::new();
        let task = store
            .create_task(CreateTaskInput {
                title: "Parent".to_string(),
                ..Default::default()
            })
            .unwrap();
        store.add_subtask(&task.id, "Step").unwrap();
        let sub = store.add_subtask(&task.id, "Done step").unwrap();
        store.toggle_subtask(&task.id, &sub.id).unwrap();
        store
            .update_task(
                &task.id,
                UpdateTaskInput {
                    description: Some(Some("Notes".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();
        let task = store.get_task(&task.id).unwrap();
        let snapshot = store.snapshot();

        let md = format_task_markdown(&task, &snapshot.lists, &snapshot.tags);
        assert!(md.contains("## Task: Parent"));
        assert!(md.contains("- [ ] Step"));
        assert!(md.contains("- [x] Done step"));
        assert!(md.contains("### Description"));
    }
}
