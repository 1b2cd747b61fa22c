//! Integration tests for querying: filters and sort orders applied to a
//! populated store, plus export/import round trips.

use chrono::{Local, TimeZone};
use taskdeck::export::Snapshot;
use taskdeck::query::query;
use taskdeck::store::Store;
use taskdeck::types::{
    CreateTagInput, CreateTaskInput, DueDateFilter, FilterOptions, SortOrder, TaskPriority,
    TaskStatus, UpdateTaskInput,
};

/// Helper to create a store with a spread of tasks.
fn setup_store() -> Store {
    let store = Store::new();
    let tag = store
        .create_tag(CreateTagInput {
            name: "errand".to_string(),
            color: "#22c55e".to_string(),
        })
        .unwrap();

    store
        .create_task(CreateTaskInput {
            title: "Buy groceries".to_string(),
            description: Some("milk, eggs".to_string()),
            priority: Some(TaskPriority::High),
            tags: vec![tag.id],
            ..Default::default()
        })
        .unwrap();
    store
        .create_task(CreateTaskInput {
            title: "Write report".to_string(),
            priority: Some(TaskPriority::Medium),
            ..Default::default()
        })
        .unwrap();
    let done = store
        .create_task(CreateTaskInput {
            title: "Water plants".to_string(),
            ..Default::default()
        })
        .unwrap();
    store.toggle_task_status(&done.id).unwrap();
    store
}

fn titles(store: &Store, filters: &FilterOptions, sort: Option<SortOrder>) -> Vec<String> {
    let now = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    query(&store.get_tasks(), Some(filters), sort, now)
        .into_iter()
        .map(|t| t.title)
        .collect()
}

#[test]
fn status_and_priority_filters_compose() {
    let store = setup_store();

    let filters = FilterOptions {
        status: vec![TaskStatus::Active],
        ..Default::default()
    };
    assert_eq!(
        titles(&store, &filters, None),
        vec!["Buy groceries", "Write report"]
    );

    let filters = FilterOptions {
        status: vec![TaskStatus::Active],
        priority: vec![TaskPriority::High],
        ..Default::default()
    };
    assert_eq!(titles(&store, &filters, None), vec!["Buy groceries"]);
}

#[test]
fn search_reaches_descriptions() {
    let store = setup_store();
    let filters = FilterOptions {
        search_query: Some("EGGS".to_string()),
        ..Default::default()
    };
    assert_eq!(titles(&store, &filters, None), vec!["Buy groceries"]);
}

#[test]
fn tag_filter_uses_tag_ids() {
    let store = setup_store();
    let tag_id = store.get_tags()[0].id.clone();
    let filters = FilterOptions {
        tags: vec![tag_id],
        ..Default::default()
    };
    assert_eq!(titles(&store, &filters, None), vec!["Buy groceries"]);
}

#[test]
fn priority_sort_after_filtering() {
    let store = setup_store();
    let filters = FilterOptions {
        status: vec![TaskStatus::Active, TaskStatus::Completed],
        ..Default::default()
    };
    assert_eq!(
        titles(&store, &filters, Some(SortOrder::Priority)),
        vec!["Buy groceries", "Write report", "Water plants"]
    );
    assert_eq!(
        titles(&store, &filters, Some(SortOrder::Alphabetical)),
        vec!["Buy groceries", "Water plants", "Write report"]
    );
}

#[test]
fn due_buckets_against_a_fixed_clock() {
    let store = Store::new();
    let now = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    let today_ms = Local
        .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
        .unwrap()
        .timestamp_millis();
    let yesterday_ms = Local
        .with_ymd_and_hms(2025, 3, 9, 9, 0, 0)
        .unwrap()
        .timestamp_millis();

    let today = store
        .create_task(CreateTaskInput {
            title: "Due today".to_string(),
            due_date: Some(today_ms),
            ..Default::default()
        })
        .unwrap();
    store
        .create_task(CreateTaskInput {
            title: "Overdue".to_string(),
            due_date: Some(yesterday_ms),
            ..Default::default()
        })
        .unwrap();
    store
        .create_task(CreateTaskInput {
            title: "Undated".to_string(),
            ..Default::default()
        })
        .unwrap();

    let bucket = |b: DueDateFilter| {
        let filters = FilterOptions {
            due_date: Some(b),
            ..Default::default()
        };
        query(&store.get_tasks(), Some(&filters), None, now)
            .into_iter()
            .map(|t| t.title)
            .collect::<Vec<_>>()
    };

    assert_eq!(bucket(DueDateFilter::Today), vec!["Due today"]);
    assert_eq!(bucket(DueDateFilter::Overdue), vec!["Overdue"]);
    assert_eq!(bucket(DueDateFilter::NoDate), vec!["Undated"]);
    assert_eq!(bucket(DueDateFilter::All).len(), 3);

    // The bucket reads the due date, not the status.
    store.toggle_task_status(&today.id).unwrap();
    assert_eq!(bucket(DueDateFilter::Today), vec!["Due today"]);
}

#[test]
fn export_import_replace_roundtrip() {
    let store = setup_store();
    let original = store.snapshot();
    let json = Snapshot::new(&original).to_json_pretty().unwrap();

    let restored = Store::from_collections(Snapshot::from_json(&json).unwrap().into_collections());
    let copy = restored.snapshot();
    assert_eq!(copy.tasks, original.tasks);
    assert_eq!(copy.lists, original.lists);
    assert_eq!(copy.tags, original.tags);
}

#[test]
fn export_import_merge_keeps_existing_entities() {
    let store = setup_store();
    let exported = Snapshot::new(&store.snapshot());

    // Rename a task locally, then merge the old export back in.
    let id = store.get_tasks()[0].id.clone();
    store
        .update_task(
            &id,
            UpdateTaskInput {
                title: Some("Renamed locally".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let (tasks, lists, tags) = store.merge_all(exported.into_collections());
    assert_eq!((tasks, lists, tags), (0, 0, 0));
    assert_eq!(store.get_task(&id).unwrap().title, "Renamed locally");
}
