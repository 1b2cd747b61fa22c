//! Sort engine: stable ordering of task views.

use crate::types::{SortOrder, Task};
use std::cmp::Ordering;

/// Sort tasks in place by the requested order.
///
/// All orders are stable: ties keep their input order, so applying the same
/// order twice is a no-op. `alphabetical` compares titles byte-wise and
/// case-sensitively; a locale-aware collation would also satisfy the
/// contract but is deliberately not pulled in.
pub fn sort_tasks(tasks: &mut [Task], order: SortOrder) {
    match order {
        SortOrder::DueDate => tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            // Undated tasks sort after all dated ones.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(&y),
        }),
        SortOrder::Priority => tasks.sort_by_key(|t| t.priority.rank()),
        SortOrder::CreatedAt => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Alphabetical => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        SortOrder::Manual => tasks.sort_by_key(|t| t.position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskPriority, TaskStatus};

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Active,
            priority: TaskPriority::None,
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

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn due_date_ascending_with_undated_last() {
        let mut a = task("a", "A");
        a.due_date = Some(200);
        let mut b = task("b", "B");
        b.due_date = Some(100);
        let c = task("c", "C");
        let d = task("d", "D");
        let mut tasks = vec![a, c, b, d];

        sort_tasks(&mut tasks, SortOrder::DueDate);
        // Undated keep their relative input order at the end.
        assert_eq!(ids(&tasks), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn priority_high_first() {
        let mut tasks = vec![task("n", "N"), task("h", "H"), task("m", "M"), task("l", "L")];
        tasks[1].priority = TaskPriority::High;
        tasks[2].priority = TaskPriority::Medium;
        tasks[3].priority = TaskPriority::Low;

        sort_tasks(&mut tasks, SortOrder::Priority);
        assert_eq!(ids(&tasks), vec!["h", "m", "l", "n"]);
    }

    #[test]
    fn created_at_most_recent_first() {
        let mut tasks = vec![task("old", "Old"), task("new", "New")];
        tasks[0].created_at = 1_000;
        tasks[1].created_at = 2_000;

        sort_tasks(&mut tasks, SortOrder::CreatedAt);
        assert_eq!(ids(&tasks), vec!["new", "old"]);
    }

    #[test]
    fn alphabetical_is_case_sensitive() {
        let mut tasks = vec![task("1", "banana"), task("2", "Apple"), task("3", "apple")];

        sort_tasks(&mut tasks, SortOrder::Alphabetical);
        // Uppercase sorts before lowercase in byte-wise ordering.
        assert_eq!(ids(&tasks), vec!["2", "3", "1"]);
    }

    #[test]
    fn manual_uses_position() {
        let mut tasks = vec![task("a", "A"), task("b", "B"), task("c", "C")];
        tasks[0].position = 2;
        tasks[1].position = 0;
        tasks[2].position = 1;

        sort_tasks(&mut tasks, SortOrder::Manual);
        assert_eq!(ids(&tasks), vec!["b", "c", "a"]);
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let mut tasks = vec![task("a", "Same"), task("b", "Same"), task("c", "Same")];
        tasks[0].due_date = Some(100);
        tasks[1].due_date = Some(100);

        for order in [
            SortOrder::DueDate,
            SortOrder::Priority,
            SortOrder::CreatedAt,
            SortOrder::Alphabetical,
            SortOrder::Manual,
        ] {
            let mut once = tasks.clone();
            sort_tasks(&mut once, order);
            let mut twice = once.clone();
            sort_tasks(&mut twice, order);
            assert_eq!(ids(&once), ids(&twice), "order {:?} not idempotent", order);
        }
    }
}
