//! Subtask mutations and views. Subtasks live inline in their parent task;
//! every mutation here also refreshes the parent's `updated_at`.
//!
//! All operations are parent-scoped: a missing task id fails before the
//! subtask id is even looked at.

use super::{Store, new_id, now_ms, reorder_group};
use crate::error::{StoreError, StoreResult};
use crate::types::{Subtask, Task, UpdateSubtaskInput, validate_title};

fn parent<'a>(tasks: &'a mut [Task], task_id: &str) -> StoreResult<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| StoreError::task_not_found(task_id))
}

fn subtask_index(task: &Task, subtask_id: &str) -> StoreResult<usize> {
    task.subtasks
        .iter()
        .position(|s| s.id == subtask_id)
        .ok_or_else(|| StoreError::subtask_not_found(subtask_id))
}

impl Store {
    /// Append a subtask to the end of a task's checklist.
    pub fn add_subtask(&self, task_id: &str, title: &str) -> StoreResult<Subtask> {
        validate_title("title", title)?;

        self.with_data_mut(|data| {
            let task = parent(&mut data.tasks, task_id)?;

            let now = now_ms();
            let position = task
                .subtasks
                .iter()
                .map(|s| s.position)
                .max()
                .map_or(0, |max| max + 1);

            let subtask = Subtask {
                id: new_id(),
                task_id: task_id.to_string(),
                title: title.to_string(),
                completed: false,
                position,
                created_at: now,
                updated_at: now,
            };
            task.subtasks.push(subtask.clone());
            task.updated_at = now;
            Ok(subtask)
        })
    }

    /// Get a task's subtasks, sorted by position.
    pub fn get_subtasks(&self, task_id: &str) -> StoreResult<Vec<Subtask>> {
        self.with_data(|data| {
            let task = data
                .tasks
                .iter()
                .find(|t| t.id == task_id)
                .ok_or_else(|| StoreError::task_not_found(task_id))?;

            let mut subtasks = task.subtasks.clone();
            subtasks.sort_by_key(|s| s.position);
            Ok(subtasks)
        })
    }

    /// Merge partial fields into a subtask of the given task.
    pub fn update_subtask(
        &self,
        task_id: &str,
        subtask_id: &str,
        input: UpdateSubtaskInput,
    ) -> StoreResult<Subtask> {
        if let Some(ref title) = input.title {
            validate_title("title", title)?;
        }

        self.with_data_mut(|data| {
            let task = parent(&mut data.tasks, task_id)?;
            let si = subtask_index(task, subtask_id)?;

            let now = now_ms();
            let subtask = &mut task.subtasks[si];
            if let Some(title) = input.title {
                subtask.title = title;
            }
            if let Some(completed) = input.completed {
                subtask.completed = completed;
            }
            if let Some(position) = input.position {
                subtask.position = position;
            }
            subtask.updated_at = now;
            let subtask = subtask.clone();
            task.updated_at = now;
            Ok(subtask)
        })
    }

    /// Flip a subtask's completed flag.
    pub fn toggle_subtask(&self, task_id: &str, subtask_id: &str) -> StoreResult<Subtask> {
        self.with_data_mut(|data| {
            let task = parent(&mut data.tasks, task_id)?;
            let si = subtask_index(task, subtask_id)?;

            let now = now_ms();
            let subtask = &mut task.subtasks[si];
            subtask.completed = !subtask.completed;
            subtask.updated_at = now;
            let subtask = subtask.clone();
            task.updated_at = now;
            Ok(subtask)
        })
    }

    /// Remove a subtask from its parent.
    pub fn delete_subtask(&self, task_id: &str, subtask_id: &str) -> StoreResult<()> {
        self.with_data_mut(|data| {
            let task = parent(&mut data.tasks, task_id)?;
            let si = subtask_index(task, subtask_id)?;

            task.subtasks.remove(si);
            task.updated_at = now_ms();
            Ok(())
        })
    }

    /// Renumber a task's subtasks from the given id sequence. Requested ids
    /// come first in order, omitted ones follow in their previous relative
    /// order; unknown ids are ignored.
    pub fn reorder_subtasks(&self, task_id: &str, ordered_ids: &[String]) -> StoreResult<()> {
        self.with_data_mut(|data| {
            let task = parent(&mut data.tasks, task_id)?;

            let now = now_ms();
            reorder_group(&mut task.subtasks, ordered_ids, now);
            task.updated_at = now;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;
    use crate::types::CreateTaskInput;

    fn parent_task(store: &Store) -> Task {
        store
            .create_task(CreateTaskInput {
                title: "Parent".to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn add_appends_and_touches_parent() {
        let store = Store::new();
        let task = parent_task(&store);

        let first = store.add_subtask(&task.id, "Step one").unwrap();
        let second = store.add_subtask(&task.id, "Step two").unwrap();
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert!(!first.completed);

        let task = store.get_task(&task.id).unwrap();
        assert_eq!(task.subtasks.len(), 2);
    }

    #[test]
    fn get_subtasks_is_sorted_by_position() {
        let store = Store::new();
        let task = parent_task(&store);
        let a = store.add_subtask(&task.id, "a").unwrap();
        let b = store.add_subtask(&task.id, "b").unwrap();

        store.reorder_subtasks(&task.id, &[b.id.clone()]).unwrap();

        let ids: Vec<String> = store
            .get_subtasks(&task.id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);

        let err = store.get_subtasks("missing").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Task,
                ..
            }
        ));
    }

    #[test]
    fn toggle_flips_completed() {
        let store = Store::new();
        let task = parent_task(&store);
        let subtask = store.add_subtask(&task.id, "Step").unwrap();

        assert!(store.toggle_subtask(&task.id, &subtask.id).unwrap().completed);
        assert!(!store.toggle_subtask(&task.id, &subtask.id).unwrap().completed);
    }

    #[test]
    fn missing_parent_fails_before_missing_subtask() {
        let store = Store::new();
        let task = parent_task(&store);
        let subtask = store.add_subtask(&task.id, "Step").unwrap();

        // Parent id is checked first, even when the subtask id exists elsewhere.
        for err in [
            store.toggle_subtask("missing", &subtask.id).unwrap_err(),
            store.delete_subtask("missing", &subtask.id).unwrap_err(),
            store
                .update_subtask("missing", &subtask.id, UpdateSubtaskInput::default())
                .unwrap_err(),
        ] {
            assert!(matches!(
                err,
                StoreError::NotFound {
                    kind: EntityKind::Task,
                    ..
                }
            ));
        }

        // A present parent with an unknown subtask id names the subtask.
        let err = store.toggle_subtask(&task.id, "missing").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Subtask,
                ..
            }
        ));
    }

    #[test]
    fn delete_removes_only_the_target() {
        let store = Store::new();
        let task = parent_task(&store);
        let keep = store.add_subtask(&task.id, "Keep").unwrap();
        let drop = store.add_subtask(&task.id, "Drop").unwrap();

        store.delete_subtask(&task.id, &drop.id).unwrap();
        let reloaded = store.get_task(&task.id).unwrap();
        assert_eq!(reloaded.subtasks.len(), 1);
        assert_eq!(reloaded.subtasks[0].id, keep.id);

        let err = store.delete_subtask(&task.id, &drop.id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Subtask,
                ..
            }
        ));
    }

    #[test]
    fn reorder_is_scoped_to_the_parent() {
        let store = Store::new();
        let task = parent_task(&store);
        let other = parent_task(&store);
        let a = store.add_subtask(&task.id, "a").unwrap();
        let b = store.add_subtask(&task.id, "b").unwrap();
        let elsewhere = store.add_subtask(&other.id, "elsewhere").unwrap();

        store
            .reorder_subtasks(&task.id, &[b.id.clone(), elsewhere.id.clone()])
            .unwrap();

        let task = store.get_task(&task.id).unwrap();
        let by_id = |id: &str| task.subtasks.iter().find(|s| s.id == id).unwrap().position;
        assert_eq!(by_id(&b.id), 0);
        assert_eq!(by_id(&a.id), 1);
        let other = store.get_task(&other.id).unwrap();
        assert_eq!(other.subtasks[0].position, 0);
    }
}
