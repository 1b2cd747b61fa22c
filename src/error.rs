//! Typed errors for store mutations and import validation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Entity kinds, used to qualify not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Subtask,
    List,
    Tag,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Task => "task",
            EntityKind::Subtask => "subtask",
            EntityKind::List => "list",
            EntityKind::Tag => "tag",
        };
        write!(f, "{}", s)
    }
}

/// Failure reported by a store operation.
///
/// Every failure is synchronous and leaves the collections in their prior
/// state; there are no retryable errors in the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("validation failed for {field}: {reason}")]
    ValidationFailed { field: &'static str, reason: String },

    #[error("{0}")]
    Conflict(String),

    #[error("a tag named '{name}' already exists")]
    NameConflict { name: String },
}

impl StoreError {
    // Convenience constructors

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::not_found(EntityKind::Task, id)
    }

    pub fn subtask_not_found(id: impl Into<String>) -> Self {
        Self::not_found(EntityKind::Subtask, id)
    }

    pub fn list_not_found(id: impl Into<String>) -> Self {
        Self::not_found(EntityKind::List, id)
    }

    pub fn tag_not_found(id: impl Into<String>) -> Self {
        Self::not_found(EntityKind::Tag, id)
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::ValidationFailed {
            field,
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        StoreError::Conflict(reason.into())
    }

    pub fn name_conflict(name: impl Into<String>) -> Self {
        StoreError::NameConflict { name: name.into() }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
