//! In-memory store for the task, list, and tag collections.
//!
//! All mutations run synchronously against one owned set of collections,
//! guarded by a mutex so there is a single logical writer at a time. Every
//! operation validates before it writes: a failure leaves the collections in
//! their prior state.

pub mod lists;
pub mod subtasks;
pub mod tags;
pub mod tasks;

use crate::types::{List, Subtask, Tag, Task};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Id of the bootstrap inbox list, the default target for new tasks.
pub const INBOX_LIST_ID: &str = "inbox";

/// The owned entity collections. Acts as the single source of truth that
/// the persistence and export boundaries serialize from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collections {
    pub tasks: Vec<Task>,
    pub lists: Vec<List>,
    pub tags: Vec<Tag>,
}

/// Store handle wrapping the collections.
#[derive(Clone)]
pub struct Store {
    data: Arc<Mutex<Collections>>,
}

impl Store {
    /// Create an empty store seeded with the default lists.
    pub fn new() -> Self {
        let now = now_ms();
        let collections = Collections {
            tasks: Vec::new(),
            lists: default_lists(now),
            tags: Vec::new(),
        };
        Self {
            data: Arc::new(Mutex::new(collections)),
        }
    }

    /// Create a store from previously persisted collections.
    ///
    /// Missing default lists are re-seeded so the bootstrap invariant holds
    /// regardless of what the loaded document contained.
    pub fn from_collections(mut collections: Collections) -> Self {
        ensure_default_lists(&mut collections);
        Self {
            data: Arc::new(Mutex::new(collections)),
        }
    }

    /// Execute a function with shared access to the collections.
    pub(crate) fn with_data<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Collections) -> T,
    {
        let data = self.data.lock().unwrap();
        f(&data)
    }

    /// Execute a function with exclusive access to the collections.
    pub(crate) fn with_data_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Collections) -> T,
    {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    /// Clone the full collection state, for persistence and export.
    pub fn snapshot(&self) -> Collections {
        self.with_data(|data| data.clone())
    }

    /// Replace the collection state wholesale (import in replace mode).
    pub fn replace_all(&self, mut collections: Collections) {
        ensure_default_lists(&mut collections);
        self.with_data_mut(|data| *data = collections);
    }

    /// Add entities whose ids are not already present (import in merge
    /// mode). Returns the number of tasks, lists, and tags added.
    pub fn merge_all(&self, incoming: Collections) -> (usize, usize, usize) {
        self.with_data_mut(|data| {
            let mut added = (0, 0, 0);
            for task in incoming.tasks {
                if !data.tasks.iter().any(|t| t.id == task.id) {
                    data.tasks.push(task);
                    added.0 += 1;
                }
            }
            for list in incoming.lists {
                if !data.lists.iter().any(|l| l.id == list.id) {
                    data.lists.push(list);
                    added.1 += 1;
                }
            }
            for tag in incoming.tags {
                if !data.tags.iter().any(|t| t.id == tag.id) {
                    data.tags.push(tag);
                    added.2 += 1;
                }
            }
            added
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh entity id.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// The fixed bootstrap lists: inbox, today, upcoming.
fn default_lists(now: i64) -> Vec<List> {
    let seed = |id: &str, name: &str, color: &str, position: i64| List {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        position,
        is_default: true,
        created_at: now,
        updated_at: now,
    };
    vec![
        seed(INBOX_LIST_ID, "Inbox", "#3b82f6", 0),
        seed("today", "Today", "#10b981", 1),
        seed("upcoming", "Upcoming", "#f59e0b", 2),
    ]
}

fn ensure_default_lists(collections: &mut Collections) {
    let now = now_ms();
    for default in default_lists(now) {
        if !collections.lists.iter().any(|l| l.id == default.id) {
            let position = collections
                .lists
                .iter()
                .map(|l| l.position)
                .max()
                .map_or(default.position, |max| max + 1);
            collections.lists.push(List {
                position,
                ..default
            });
        }
    }
}

/// Entities carrying a manual position within a sibling group.
pub(crate) trait Positioned {
    fn entity_id(&self) -> &str;
    fn position(&self) -> i64;
    fn set_position(&mut self, position: i64, now: i64);
}

impl Positioned for List {
    fn entity_id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> i64 {
        self.position
    }
    fn set_position(&mut self, position: i64, now: i64) {
        self.position = position;
        self.updated_at = now;
    }
}

impl Positioned for Subtask {
    fn entity_id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> i64 {
        self.position
    }
    fn set_position(&mut self, position: i64, now: i64) {
        self.position = position;
        self.updated_at = now;
    }
}

/// Renumber one sibling group: ids from `ordered_ids` that exist in the
/// group take positions 0..n in the requested order, then the omitted
/// members follow in their previous relative order. Positions end up
/// contiguous; unknown ids are ignored.
pub(crate) fn reorder_group<T: Positioned>(items: &mut [T], ordered_ids: &[String], now: i64) {
    let mut order: Vec<usize> = Vec::with_capacity(items.len());
    for id in ordered_ids {
        if let Some(idx) = items.iter().position(|item| item.entity_id() == id) {
            if !order.contains(&idx) {
                order.push(idx);
            }
        }
    }

    let mut omitted: Vec<usize> = (0..items.len()).filter(|i| !order.contains(i)).collect();
    omitted.sort_by_key(|&i| items[i].position());
    order.extend(omitted);

    for (pos, idx) in order.into_iter().enumerate() {
        let pos = pos as i64;
        if items[idx].position() != pos {
            items[idx].set_position(pos, now);
        }
    }
}
