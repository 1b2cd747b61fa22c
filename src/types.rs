//! Core entity types for the taskdeck engine.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a task, subtask, or list title.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a task description.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Lifecycle state of a task.
///
/// `active <-> completed` via toggle/update, `active|completed -> archived`
/// via soft delete, `archived -> active` via restore. There is no direct
/// `archived -> completed` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Completed,
    Archived,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
            TaskStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TaskStatus::Active),
            "completed" => Some(TaskStatus::Completed),
            "archived" => Some(TaskStatus::Archived),
            _ => None,
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Sort rank: high sorts first, none sorts last.
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
            TaskPriority::None => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::None => "none",
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(TaskPriority::None),
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// A unit of work. Owns its subtasks; references its list and tags by id.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<i64>,
    pub list_id: Option<String>,
    /// Manual display order within the task's list.
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Set on the first transition to completed; cleared on restore and on
    /// a completed -> active transition.
    pub completed_at: Option<i64>,
    /// Soft-delete marker. Set together with status = archived.
    pub deleted_at: Option<i64>,
    /// Tag ids. Weak references into the tag collection.
    pub tags: Vec<String>,
    pub subtasks: Vec<Subtask>,
}

/// A checklist item owned by exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    /// Order within the parent task.
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A named bucket for tasks. Default lists are seeded at store creation and
/// reject name/color changes and deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Display order among all lists.
    pub position: i64,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A user-defined label. Names are unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Due-date bucket, evaluated against the local midnight-to-midnight day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateFilter {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    NoDate,
    All,
}

impl DueDateFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overdue" => Some(DueDateFilter::Overdue),
            "today" => Some(DueDateFilter::Today),
            "tomorrow" => Some(DueDateFilter::Tomorrow),
            "this_week" => Some(DueDateFilter::ThisWeek),
            "no_date" => Some(DueDateFilter::NoDate),
            "all" => Some(DueDateFilter::All),
            _ => None,
        }
    }
}

/// Filter criteria for querying tasks.
///
/// Dimensions combine with AND; multi-valued dimensions match with OR.
/// An empty vec or `None` leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub status: Vec<TaskStatus>,
    #[serde(default)]
    pub priority: Vec<TaskPriority>,
    pub due_date: Option<DueDateFilter>,
    /// Tag ids; a task matches when its tag set intersects this set.
    #[serde(default)]
    pub tags: Vec<String>,
    pub list_id: Option<String>,
    /// Case-insensitive substring match against title or description.
    pub search_query: Option<String>,
}

impl FilterOptions {
    /// True when no dimension constrains the result.
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.priority.is_empty()
            && self.due_date.is_none()
            && self.tags.is_empty()
            && self.list_id.is_none()
            && self.search_query.is_none()
    }
}

/// Sort order for task views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    DueDate,
    Priority,
    CreatedAt,
    Alphabetical,
    Manual,
}

impl SortOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "due_date" => Some(SortOrder::DueDate),
            "priority" => Some(SortOrder::Priority),
            "created_at" => Some(SortOrder::CreatedAt),
            "alphabetical" => Some(SortOrder::Alphabetical),
            "manual" => Some(SortOrder::Manual),
            _ => None,
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<i64>,
    /// Defaults to the inbox list when omitted.
    pub list_id: Option<String>,
    /// Tag ids; unknown ids are silently dropped.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a task. `None` leaves a field untouched; the
/// double-option fields distinguish "leave" from "clear".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<i64>>,
    pub list_id: Option<String>,
    pub position: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// Input for creating a list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListInput {
    pub name: String,
    pub color: String,
}

/// Partial update for a list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub position: Option<i64>,
}

/// Input for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagInput {
    pub name: String,
    pub color: String,
}

/// Partial update for a tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTagInput {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Partial update for a subtask.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubtaskInput {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub position: Option<i64>,
}

/// Validate a title-like field (task/subtask title, list/tag name).
pub fn validate_title(field: &'static str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    if value.chars().count() > MAX_TITLE_LEN {
        return Err(StoreError::validation(
            field,
            format!("must be at most {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(())
}

/// Validate an optional description.
pub fn validate_description(value: Option<&str>) -> StoreResult<()> {
    if let Some(desc) = value {
        if desc.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(StoreError::validation(
                "description",
                format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
            ));
        }
    }
    Ok(())
}
