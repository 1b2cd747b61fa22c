//! Tag mutations and views.

use super::{Store, new_id, now_ms};
use crate::error::{StoreError, StoreResult};
use crate::types::{CreateTagInput, Tag, UpdateTagInput, validate_title};
use tracing::debug;

fn name_taken(tags: &[Tag], name: &str, exclude_id: Option<&str>) -> bool {
    let lower = name.to_lowercase();
    tags.iter()
        .filter(|t| exclude_id != Some(t.id.as_str()))
        .any(|t| t.name.to_lowercase() == lower)
}

impl Store {
    /// Create a tag. Names are unique case-insensitively.
    pub fn create_tag(&self, input: CreateTagInput) -> StoreResult<Tag> {
        validate_title("name", &input.name)?;

        self.with_data_mut(|data| {
            if name_taken(&data.tags, &input.name, None) {
                return Err(StoreError::name_conflict(input.name));
            }

            let now = now_ms();
            let tag = Tag {
                id: new_id(),
                name: input.name,
                color: input.color,
                created_at: now,
                updated_at: now,
            };

            debug!(tag_id = %tag.id, name = %tag.name, "Tag created");
            data.tags.push(tag.clone());
            Ok(tag)
        })
    }

    /// Get a tag by id.
    pub fn get_tag(&self, tag_id: &str) -> Option<Tag> {
        self.with_data(|data| data.tags.iter().find(|t| t.id == tag_id).cloned())
    }

    /// Get all tags, sorted by name (case-insensitive).
    pub fn get_tags(&self) -> Vec<Tag> {
        self.with_data(|data| {
            let mut tags = data.tags.clone();
            tags.sort_by_key(|t| t.name.to_lowercase());
            tags
        })
    }

    /// Merge partial fields into a tag. Renames keep the case-insensitive
    /// uniqueness rule; changing only the casing of a tag's own name is
    /// allowed.
    pub fn update_tag(&self, tag_id: &str, input: UpdateTagInput) -> StoreResult<Tag> {
        if let Some(ref name) = input.name {
            validate_title("name", name)?;
        }

        self.with_data_mut(|data| {
            let idx = data
                .tags
                .iter()
                .position(|t| t.id == tag_id)
                .ok_or_else(|| StoreError::tag_not_found(tag_id))?;
            if let Some(ref name) = input.name {
                if name_taken(&data.tags, name, Some(tag_id)) {
                    return Err(StoreError::name_conflict(name.clone()));
                }
            }

            let tag = &mut data.tags[idx];
            if let Some(name) = input.name {
                tag.name = name;
            }
            if let Some(color) = input.color {
                tag.color = color;
            }
            tag.updated_at = now_ms();
            Ok(tag.clone())
        })
    }

    /// Delete a tag and strip its id from every task referencing it.
    pub fn delete_tag(&self, tag_id: &str) -> StoreResult<()> {
        self.with_data_mut(|data| {
            let idx = data
                .tags
                .iter()
                .position(|t| t.id == tag_id)
                .ok_or_else(|| StoreError::tag_not_found(tag_id))?;
            data.tags.remove(idx);

            let now = now_ms();
            let mut stripped = 0;
            for task in &mut data.tasks {
                if task.tags.iter().any(|id| id == tag_id) {
                    task.tags.retain(|id| id != tag_id);
                    task.updated_at = now;
                    stripped += 1;
                }
            }

            debug!(tag_id, stripped, "Tag deleted");
            Ok(())
        })
    }

    /// Fold one tag into another: every task referencing the source ends up
    /// referencing the target exactly once, then the source is removed.
    pub fn merge_tags(&self, source_id: &str, target_id: &str) -> StoreResult<Tag> {
        self.with_data_mut(|data| {
            if source_id == target_id {
                return Err(StoreError::conflict("cannot merge a tag into itself"));
            }
            if !data.tags.iter().any(|t| t.id == source_id) {
                return Err(StoreError::tag_not_found(source_id));
            }
            let target = data
                .tags
                .iter()
                .find(|t| t.id == target_id)
                .cloned()
                .ok_or_else(|| StoreError::tag_not_found(target_id))?;

            let now = now_ms();
            for task in &mut data.tasks {
                if task.tags.iter().any(|id| id == source_id) {
                    task.tags.retain(|id| id != source_id);
                    if !task.tags.iter().any(|id| id == target_id) {
                        task.tags.push(target_id.to_string());
                    }
                    task.updated_at = now;
                }
            }
            data.tags.retain(|t| t.id != source_id);

            debug!(source_id, target_id, "Tags merged");
            Ok(target)
        })
    }
}
