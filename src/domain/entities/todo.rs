//! To-do item entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-assigned document id, unique within one user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Item status. Only `active` is ever written; anything else read back is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TodoStatus {
    #[default]
    Active,
    Other(String),
}

impl TodoStatus {
    const ACTIVE: &'static str = "active";

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => Self::ACTIVE,
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for TodoStatus {
    fn from(value: &str) -> Self {
        if value == Self::ACTIVE {
            Self::Active
        } else {
            Self::Other(value.to_string())
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A to-do item as last fetched from the remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    id: TodoId,
    text: String,
    status: TodoStatus,
    created_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    #[must_use]
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>, status: TodoStatus) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            status,
            created_at: None,
        }
    }

    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn status(&self) -> &TodoStatus {
        &self.status
    }

    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Insert payload for a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    pub status: TodoStatus,
}

impl NewTodo {
    /// Creates an active item with the given text.
    #[must_use]
    pub fn active(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: TodoStatus::Active,
        }
    }
}
