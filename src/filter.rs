//! Filter engine: pure selection of tasks against a set of criteria.
//!
//! Distinct dimensions combine with logical AND; values within one
//! multi-valued dimension combine with OR. Due-date buckets are computed
//! against the supplied clock so callers (and tests) control "today".

use crate::types::{DueDateFilter, FilterOptions, Task};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Local-midnight boundaries in epoch milliseconds, derived from `now`.
#[derive(Debug, Clone, Copy)]
struct DayBounds {
    today: i64,
    tomorrow: i64,
    day_after: i64,
    week: i64,
}

fn local_midnight_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.timestamp_millis(),
        // Midnight skipped by a DST transition; fall back to UTC.
        None => Utc.from_utc_datetime(&midnight).timestamp_millis(),
    }
}

fn day_bounds(now: DateTime<Local>) -> DayBounds {
    let date = now.date_naive();
    let at = |days: u64| {
        local_midnight_ms(date.checked_add_days(Days::new(days)).unwrap_or(date))
    };
    DayBounds {
        today: at(0),
        tomorrow: at(1),
        day_after: at(2),
        week: at(7),
    }
}

fn matches_due_date(task: &Task, filter: DueDateFilter, bounds: DayBounds) -> bool {
    match filter {
        DueDateFilter::All => true,
        DueDateFilter::NoDate => task.due_date.is_none(),
        DueDateFilter::Overdue => task.due_date.is_some_and(|due| due < bounds.today),
        DueDateFilter::Today => task
            .due_date
            .is_some_and(|due| due >= bounds.today && due < bounds.tomorrow),
        DueDateFilter::Tomorrow => task
            .due_date
            .is_some_and(|due| due >= bounds.tomorrow && due < bounds.day_after),
        DueDateFilter::ThisWeek => task
            .due_date
            .is_some_and(|due| due >= bounds.today && due < bounds.week),
    }
}

fn matches(task: &Task, filters: &FilterOptions, bounds: DayBounds) -> bool {
    if !filters.status.is_empty() && !filters.status.contains(&task.status) {
        return false;
    }

    if !filters.priority.is_empty() && !filters.priority.contains(&task.priority) {
        return false;
    }

    if let Some(ref list_id) = filters.list_id {
        if task.list_id.as_deref() != Some(list_id.as_str()) {
            return false;
        }
    }

    if !filters.tags.is_empty() && !task.tags.iter().any(|tag| filters.tags.contains(tag)) {
        return false;
    }

    if let Some(ref query) = filters.search_query {
        let query = query.to_lowercase();
        let in_title = task.title.to_lowercase().contains(&query);
        let in_description = task
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&query));
        if !in_title && !in_description {
            return false;
        }
    }

    if let Some(due_filter) = filters.due_date {
        if !matches_due_date(task, due_filter, bounds) {
            return false;
        }
    }

    true
}

/// Select the tasks matching every supplied dimension, preserving input order.
///
/// An empty `FilterOptions` returns the full input unchanged.
pub fn filter_tasks(tasks: &[Task], filters: &FilterOptions, now: DateTime<Local>) -> Vec<Task> {
    if filters.is_empty() {
        return tasks.to_vec();
    }

    let bounds = day_bounds(now);
    tasks
        .iter()
        .filter(|task| matches(task, filters, bounds))
        .cloned()
        .collect()
}
