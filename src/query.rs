//! Query facade: filter, then sort, without touching the input collection.

use crate::filter::filter_tasks;
use crate::sort::sort_tasks;
use crate::types::{FilterOptions, SortOrder, Task};
use chrono::{DateTime, Local};

/// Produce a filtered, sorted view of the given tasks.
///
/// The input is copied before filtering and sorting. An absent filter
/// returns all tasks; an absent sort order leaves the filtered sequence in
/// input order.
pub fn query(
    tasks: &[Task],
    filters: Option<&FilterOptions>,
    order: Option<SortOrder>,
    now: DateTime<Local>,
) -> Vec<Task> {
    let mut view = match filters {
        Some(filters) => filter_tasks(tasks, filters, now),
        None => tasks.to_vec(),
    };

    if let Some(order) = order {
        sort_tasks(&mut view, order);
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskPriority, TaskStatus};
    use chrono::TimeZone;

    fn task(id: &str, title: &str, priority: TaskPriority) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Active,
            priority,
            due_date: None,
            list_id: Some("inbox".to_string()),
            position: 0,
            created_at: 0,
            updated_at: 0,
            completed_at: None,
            deleted_at: None,
            tags: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    #[test]
    fn filters_then_sorts_without_mutating_input() {
        let tasks = vec![
            task("a", "A", TaskPriority::Low),
            task("b", "B", TaskPriority::High),
            task("c", "C", TaskPriority::Medium),
        ];
        let original = tasks.clone();
        let now = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

        let filters = FilterOptions {
            priority: vec![TaskPriority::High, TaskPriority::Medium],
            ..Default::default()
        };
        let view = query(&tasks, Some(&filters), Some(SortOrder::Priority), now);

        let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(tasks, original);
    }

    #[test]
    fn absent_filter_and_order_returns_input_unchanged() {
        let tasks = vec![
            task("a", "Z", TaskPriority::None),
            task("b", "A", TaskPriority::High),
        ];
        let now = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

        let view = query(&tasks, None, None, now);
        assert_eq!(view, tasks);
    }
}
