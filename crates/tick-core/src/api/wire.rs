//! Wire types for the todo service API
//!
//! Request bodies and response envelopes. The server wraps collections
//! in an object and serializes empty ones as `null`, so the envelopes
//! use `Option` and callers default to empty.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Todo};

/// Body for `/login` and `/register`
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
    /// Only sent when given; the server tolerates its absence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

/// Successful auth response
#[derive(Debug, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

/// Structured error body on non-success responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body for creating a todo
#[derive(Debug, Serialize)]
pub struct NewTodo<'a> {
    pub title: &'a str,
}

/// Body for sharing a todo with another user
#[derive(Debug, Serialize)]
pub struct ShareRequest<'a> {
    pub username: &'a str,
    pub id: i64,
}

/// Envelope of the todo list endpoint (`todos` is null when empty)
#[derive(Debug, Deserialize)]
pub struct TodoPage {
    #[serde(default)]
    pub todos: Option<Vec<Todo>>,
}

/// Envelope of the category list endpoint
#[derive(Debug, Deserialize)]
pub struct CategoryPage {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

/// Envelope of the update endpoint
#[derive(Debug, Deserialize)]
pub struct TodoBody {
    pub todo: Todo,
}
