//! List mutations and views.

use super::{INBOX_LIST_ID, Store, new_id, now_ms, reorder_group};
use crate::error::{StoreError, StoreResult};
use crate::types::{CreateListInput, List, UpdateListInput, validate_title};
use tracing::debug;

impl Store {
    /// Create a user list at the end of the display order.
    pub fn create_list(&self, input: CreateListInput) -> StoreResult<List> {
        validate_title("name", &input.name)?;

        self.with_data_mut(|data| {
            let now = now_ms();
            let position = data
                .lists
                .iter()
                .map(|l| l.position)
                .max()
                .map_or(0, |max| max + 1);

            let list = List {
                id: new_id(),
                name: input.name,
                color: input.color,
                position,
                is_default: false,
                created_at: now,
                updated_at: now,
            };

            debug!(list_id = %list.id, name = %list.name, "List created");
            data.lists.push(list.clone());
            Ok(list)
        })
    }

    /// Get a list by id.
    pub fn get_list(&self, list_id: &str) -> Option<List> {
        self.with_data(|data| data.lists.iter().find(|l| l.id == list_id).cloned())
    }

    /// Get all lists in display order.
    pub fn get_lists(&self) -> Vec<List> {
        self.with_data(|data| {
            let mut lists = data.lists.clone();
            lists.sort_by_key(|l| l.position);
            lists
        })
    }

    /// Merge partial fields into a list. Default lists accept position
    /// changes only.
    pub fn update_list(&self, list_id: &str, input: UpdateListInput) -> StoreResult<List> {
        if let Some(ref name) = input.name {
            validate_title("name", name)?;
        }

        self.with_data_mut(|data| {
            let list = data
                .lists
                .iter_mut()
                .find(|l| l.id == list_id)
                .ok_or_else(|| StoreError::list_not_found(list_id))?;

            if list.is_default && (input.name.is_some() || input.color.is_some()) {
                return Err(StoreError::conflict(format!(
                    "list {} is a default list and cannot be renamed or recolored",
                    list_id
                )));
            }

            if let Some(name) = input.name {
                list.name = name;
            }
            if let Some(color) = input.color {
                list.color = color;
            }
            if let Some(position) = input.position {
                list.position = position;
            }
            list.updated_at = now_ms();
            Ok(list.clone())
        })
    }

    /// Delete a user list. Its tasks move to the inbox, appended after the
    /// inbox's existing tasks in their previous relative order.
    pub fn delete_list(&self, list_id: &str) -> StoreResult<()> {
        self.with_data_mut(|data| {
            let idx = data
                .lists
                .iter()
                .position(|l| l.id == list_id)
                .ok_or_else(|| StoreError::list_not_found(list_id))?;

            if data.lists[idx].is_default {
                return Err(StoreError::conflict(format!(
                    "list {} is a default list and cannot be deleted",
                    list_id
                )));
            }

            data.lists.remove(idx);

            let now = now_ms();
            let mut next = data
                .tasks
                .iter()
                .filter(|t| t.list_id.as_deref() == Some(INBOX_LIST_ID))
                .map(|t| t.position)
                .max()
                .map_or(0, |max| max + 1);

            let mut orphaned: Vec<usize> = data
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.list_id.as_deref() == Some(list_id))
                .map(|(i, _)| i)
                .collect();
            orphaned.sort_by_key(|&i| data.tasks[i].position);

            let moved = orphaned.len();
            for i in orphaned {
                let task = &mut data.tasks[i];
                task.list_id = Some(INBOX_LIST_ID.to_string());
                task.position = next;
                task.updated_at = now;
                next += 1;
            }

            debug!(list_id, moved, "List deleted, tasks moved to inbox");
            Ok(())
        })
    }

    /// Renumber list positions from the given id sequence. Requested ids
    /// come first in order, the rest follow in their previous relative
    /// order; unknown ids are ignored.
    pub fn reorder_lists(&self, ordered_ids: &[String]) {
        self.with_data_mut(|data| {
            reorder_group(&mut data.lists, ordered_ids, now_ms());
        })
    }
}
