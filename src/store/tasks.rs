//! Task mutations and views.

use super::{INBOX_LIST_ID, Store, new_id, now_ms};
use crate::error::{StoreError, StoreResult};
use crate::query;
use crate::types::{
    CreateTaskInput, FilterOptions, SortOrder, Task, TaskStatus, UpdateTaskInput,
    validate_description, validate_title,
};
use chrono::Local;
use tracing::debug;

impl Store {
    /// Create a new task in the target list (inbox when omitted).
    ///
    /// The task starts active at the end of its list's manual order.
    /// Unknown tag ids in the input are silently dropped.
    pub fn create_task(&self, input: CreateTaskInput) -> StoreResult<Task> {
        validate_title("title", &input.title)?;
        validate_description(input.description.as_deref())?;

        self.with_data_mut(|data| {
            let now = now_ms();
            let list_id = input
                .list_id
                .clone()
                .unwrap_or_else(|| INBOX_LIST_ID.to_string());

            let position = data
                .tasks
                .iter()
                .filter(|t| t.list_id.as_deref() == Some(list_id.as_str()))
                .map(|t| t.position)
                .max()
                .map_or(0, |max| max + 1);

            let tags = input
                .tags
                .iter()
                .filter(|id| data.tags.iter().any(|tag| &tag.id == *id))
                .cloned()
                .collect();

            let task = Task {
                id: new_id(),
                title: input.title.clone(),
                description: input.description.clone(),
                status: TaskStatus::Active,
                priority: input.priority.unwrap_or_default(),
                due_date: input.due_date,
                list_id: Some(list_id),
                position,
                created_at: now,
                updated_at: now,
                completed_at: None,
                deleted_at: None,
                tags,
                subtasks: Vec::new(),
            };

            debug!(task_id = %task.id, list_id = ?task.list_id, "Task created");
            data.tasks.push(task.clone());
            Ok(task)
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: &str) -> Option<Task> {
        self.with_data(|data| data.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    /// Get all tasks, including archived ones, in collection order.
    pub fn get_tasks(&self) -> Vec<Task> {
        self.with_data(|data| data.tasks.clone())
    }

    /// Produce a filtered, sorted view of the task collection.
    pub fn query_tasks(
        &self,
        filters: Option<&FilterOptions>,
        order: Option<SortOrder>,
    ) -> Vec<Task> {
        self.with_data(|data| query::query(&data.tasks, filters, order, Local::now()))
    }

    /// Merge partial fields into a task.
    ///
    /// Status may only flip between active and completed here; archiving and
    /// restoring go through [`Store::delete_task`] / [`Store::restore_task`].
    /// The first transition to completed stamps `completed_at`; a transition
    /// back to active clears it.
    pub fn update_task(&self, task_id: &str, input: UpdateTaskInput) -> StoreResult<Task> {
        if let Some(ref title) = input.title {
            validate_title("title", title)?;
        }
        if let Some(ref description) = input.description {
            validate_description(description.as_deref())?;
        }

        self.with_data_mut(|data| {
            let idx = data
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;

            let current = &data.tasks[idx];
            let new_status = input.status.unwrap_or(current.status);
            if new_status != current.status {
                match (current.status, new_status) {
                    (TaskStatus::Active, TaskStatus::Completed)
                    | (TaskStatus::Completed, TaskStatus::Active) => {}
                    (TaskStatus::Archived, _) => {
                        return Err(StoreError::conflict(format!(
                            "task {} is archived; restore it before changing its status",
                            task_id
                        )));
                    }
                    (_, TaskStatus::Archived) => {
                        return Err(StoreError::conflict(
                            "archiving goes through delete, not update",
                        ));
                    }
                    _ => unreachable!("status pairs are covered above"),
                }
            }

            let now = now_ms();
            let resolved_tags = input.tags.map(|ids| {
                ids.into_iter()
                    .filter(|id| data.tags.iter().any(|tag| &tag.id == id))
                    .collect::<Vec<_>>()
            });

            let task = &mut data.tasks[idx];

            let completed_at = match (task.status, new_status) {
                // Stamped once; later completing updates never overwrite it.
                (TaskStatus::Active, TaskStatus::Completed) => {
                    Some(task.completed_at.unwrap_or(now))
                }
                (TaskStatus::Completed, TaskStatus::Active) => None,
                _ => task.completed_at,
            };

            if let Some(title) = input.title {
                task.title = title;
            }
            if let Some(description) = input.description {
                task.description = description;
            }
            if let Some(priority) = input.priority {
                task.priority = priority;
            }
            if let Some(due_date) = input.due_date {
                task.due_date = due_date;
            }
            if let Some(list_id) = input.list_id {
                task.list_id = Some(list_id);
            }
            if let Some(position) = input.position {
                task.position = position;
            }
            if let Some(tags) = resolved_tags {
                task.tags = tags;
            }
            task.status = new_status;
            task.completed_at = completed_at;
            task.updated_at = now;

            Ok(task.clone())
        })
    }

    /// Delete a task: soft by default (archived, restorable), permanently
    /// with `permanent = true` (subtasks go with the task).
    pub fn delete_task(&self, task_id: &str, permanent: bool) -> StoreResult<()> {
        self.with_data_mut(|data| {
            let idx = data
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;

            if permanent {
                data.tasks.remove(idx);
                debug!(task_id, "Task permanently deleted");
            } else {
                let task = &mut data.tasks[idx];
                task.deleted_at = Some(now_ms());
                task.status = TaskStatus::Archived;
                debug!(task_id, "Task archived");
            }
            Ok(())
        })
    }

    /// Restore a soft-deleted task to active.
    pub fn restore_task(&self, task_id: &str) -> StoreResult<Task> {
        self.with_data_mut(|data| {
            let task = data
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;

            if task.status != TaskStatus::Archived {
                return Err(StoreError::conflict(format!(
                    "task {} is not archived",
                    task_id
                )));
            }

            task.deleted_at = None;
            task.completed_at = None;
            task.status = TaskStatus::Active;
            task.updated_at = now_ms();
            Ok(task.clone())
        })
    }

    /// Flip a task between active and completed. Archived tasks are not
    /// toggled; restore them first.
    pub fn toggle_task_status(&self, task_id: &str) -> StoreResult<Task> {
        self.with_data_mut(|data| {
            let task = data
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;

            let now = now_ms();
            match task.status {
                TaskStatus::Active => {
                    task.status = TaskStatus::Completed;
                    task.completed_at = Some(now);
                }
                TaskStatus::Completed => {
                    task.status = TaskStatus::Active;
                    task.completed_at = None;
                }
                TaskStatus::Archived => {
                    return Err(StoreError::conflict(format!(
                        "task {} is archived; restore it before toggling",
                        task_id
                    )));
                }
            }
            task.updated_at = now;
            Ok(task.clone())
        })
    }

    /// Permanently remove all matching tasks. Missing ids are ignored.
    /// Returns the number of tasks removed.
    pub fn bulk_delete_tasks(&self, task_ids: &[String]) -> usize {
        self.with_data_mut(|data| {
            let before = data.tasks.len();
            data.tasks.retain(|t| !task_ids.contains(&t.id));
            let removed = before - data.tasks.len();
            if removed > 0 {
                debug!(removed, "Bulk delete removed tasks");
            }
            removed
        })
    }

    /// Renumber manual positions from the given id sequence.
    ///
    /// Positions are per list: within every list touched by the request, the
    /// requested ids come first in the given order, then the list's
    /// remaining tasks in their previous relative order, numbered 0..n.
    /// Ids not present in the collection are ignored; lists with no
    /// requested id are left untouched.
    pub fn reorder_tasks(&self, ordered_ids: &[String]) {
        self.with_data_mut(|data| {
            let now = now_ms();

            // Lists touched by the request, in first-seen order.
            let mut groups: Vec<Option<String>> = Vec::new();
            for id in ordered_ids {
                if let Some(task) = data.tasks.iter().find(|t| &t.id == id) {
                    if !groups.contains(&task.list_id) {
                        groups.push(task.list_id.clone());
                    }
                }
            }

            for list_id in groups {
                let mut order: Vec<usize> = Vec::new();
                for id in ordered_ids {
                    let found = data
                        .tasks
                        .iter()
                        .position(|t| &t.id == id && t.list_id == list_id);
                    if let Some(idx) = found {
                        if !order.contains(&idx) {
                            order.push(idx);
                        }
                    }
                }

                let mut omitted: Vec<usize> = data
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(i, t)| t.list_id == list_id && !order.contains(i))
                    .map(|(i, _)| i)
                    .collect();
                omitted.sort_by_key(|&i| data.tasks[i].position);
                order.extend(omitted);

                for (pos, idx) in order.into_iter().enumerate() {
                    let pos = pos as i64;
                    let task = &mut data.tasks[idx];
                    if task.position != pos {
                        task.position = pos;
                        task.updated_at = now;
                    }
                }
            }
        })
    }
}
