//! Data models for tick
//!
//! Defines the core data structures: Todo and Category. Both double as
//! wire types for the remote API, so deserialization is lenient about
//! fields the server omits on some endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category a todo can be filed under
///
/// Todos carry a category *by value*: editing a todo records the category
/// title as typed, and renaming a category on the server does not reach
/// back into todos that were saved earlier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier, assigned by the server (0 until then)
    #[serde(default)]
    pub id: i64,
    /// Display title; also the deduplicating key for suggestions
    #[serde(default)]
    pub title: String,
    /// User that first created this category
    #[serde(default)]
    pub created_user_id: i64,
}

impl Category {
    /// Create a category value from a title (no server identity yet)
    pub fn named(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            created_user_id: 0,
        }
    }

    /// Whether this is the empty, unassigned category
    pub fn is_unassigned(&self) -> bool {
        self.title.is_empty()
    }
}

/// A single todo item
///
/// The create endpoint returns the new id under the key `todo_id` and
/// omits the remaining fields; the alias and defaults below let one model
/// cover that shape as well as the full one from the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    /// Unique identifier, assigned by the server; 0 marks a local draft.
    /// Stable for the lifetime of the entity once assigned.
    #[serde(alias = "todo_id")]
    pub id: i64,
    /// Display title (non-empty once persisted)
    pub title: String,
    /// Whether the todo has been checked off
    #[serde(default)]
    pub completed: bool,
    /// When the server created this todo
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// User that owns this todo
    #[serde(default)]
    pub owner_id: i64,
    /// Category value this todo was last saved with
    #[serde(default)]
    pub category: Category,
}

impl Todo {
    /// Create a local draft with the given title
    ///
    /// Drafts have no server identity and the unassigned category; the
    /// server's response, not the draft, is what ends up in the mirror.
    pub fn draft(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
            owner_id: 0,
            category: Category::default(),
        }
    }

    /// Whether this todo has been persisted by the server yet
    pub fn is_draft(&self) -> bool {
        self.id == 0
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the category by value
    pub fn set_category(&mut self, title: impl Into<String>) {
        self.category = Category::named(title);
    }
}
