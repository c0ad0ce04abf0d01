//! Remote store access
//!
//! The `RemoteStore` trait is the seam between the sync engine and the
//! transport: the engine only ever sees these operations, so tests can
//! substitute an in-memory implementation for the HTTP one.

mod http;
pub(crate) mod wire;

pub use http::HttpStore;

use crate::error::ClientResult;
use crate::models::{Category, Todo};

/// Operations the remote authoritative store provides
///
/// Every method is a single request/response round trip. Mutations
/// return the server's authoritative value; callers reconcile their
/// local state from that, never from the request they sent.
///
/// Implementations are used through generics, never as trait objects,
/// and the whole client runs on a single task, so the returned futures
/// carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Exchange credentials for a bearer token
    async fn login(&self, username: &str, password: &str) -> ClientResult<String>;

    /// Create an account and get a bearer token for it
    async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<String>;

    /// Ask the server whether the held token is still accepted
    ///
    /// `Ok(false)` means the server answered and refused; `Err` means it
    /// could not be asked at all.
    async fn check_token(&self) -> ClientResult<bool>;

    /// Fetch the full todo collection, in server order
    async fn fetch_todos(&self) -> ClientResult<Vec<Todo>>;

    /// Fetch the full category collection
    async fn fetch_categories(&self) -> ClientResult<Vec<Category>>;

    /// Create a todo with the given title; returns the persisted entry
    async fn create_todo(&self, title: &str) -> ClientResult<Todo>;

    /// Send the full value of a todo; returns the stored entry
    async fn update_todo(&self, todo: &Todo) -> ClientResult<Todo>;

    /// Delete a todo by id
    async fn delete_todo(&self, id: i64) -> ClientResult<()>;

    /// Share one todo with another user
    async fn share_todo(&self, username: &str, id: i64) -> ClientResult<()>;
}
