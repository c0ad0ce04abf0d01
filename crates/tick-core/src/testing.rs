//! In-memory remote store for engine tests
//!
//! Plays the server side of the contract, with injectable failures per
//! operation, so reconciliation logic can be exercised without a
//! network.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use reqwest::StatusCode;

use crate::api::RemoteStore;
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, Todo};

/// Build a persisted todo for seeding test state
pub fn todo(id: i64, title: &str, completed: bool) -> Todo {
    Todo {
        id,
        completed,
        ..Todo::draft(title)
    }
}

fn refused(message: &str) -> ClientError {
    ClientError::Rejected {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    }
}

/// Fake remote store with injectable failures
#[derive(Default)]
pub struct FakeStore {
    pub todos: Mutex<Vec<Todo>>,
    pub categories: Mutex<Vec<Category>>,
    pub next_id: Mutex<i64>,
    pub token_valid: Mutex<bool>,
    pub check_unreachable: Mutex<bool>,
    pub fail_fetch: Mutex<bool>,
    pub fail_create: Mutex<bool>,
    pub fail_update: Mutex<bool>,
    pub failing_deletes: Mutex<BTreeSet<i64>>,
    pub failing_shares: Mutex<BTreeSet<i64>>,
    pub shares: Mutex<Vec<(String, i64)>>,
    check_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            token_valid: Mutex::new(true),
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    /// A store pre-seeded with server-side todos
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let store = Self::new();
        *store.next_id.lock().unwrap() = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        *store.todos.lock().unwrap() = todos;
        store
    }

    /// The server-side todo collection as it stands
    pub fn server_todos(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }

    /// How often the token check was asked
    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    /// How often a create reached the server
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl RemoteStore for FakeStore {
    async fn login(&self, username: &str, _password: &str) -> ClientResult<String> {
        Ok(format!("token-{}", username))
    }

    async fn register(
        &self,
        username: &str,
        _password: &str,
        _email: Option<&str>,
    ) -> ClientResult<String> {
        Ok(format!("token-{}", username))
    }

    async fn check_token(&self) -> ClientResult<bool> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        if *self.check_unreachable.lock().unwrap() {
            return Err(refused("server unreachable"));
        }
        Ok(*self.token_valid.lock().unwrap())
    }

    async fn fetch_todos(&self) -> ClientResult<Vec<Todo>> {
        if *self.fail_fetch.lock().unwrap() {
            return Err(refused("Could not retrieve todos"));
        }
        Ok(self.todos.lock().unwrap().clone())
    }

    async fn fetch_categories(&self) -> ClientResult<Vec<Category>> {
        if *self.fail_fetch.lock().unwrap() {
            return Err(refused("Could not retrieve categories"));
        }
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_todo(&self, title: &str) -> ClientResult<Todo> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_create.lock().unwrap() {
            return Err(refused("Could not create todo"));
        }

        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = *next;
            *next += 1;
            id
        };
        let created = Todo {
            id,
            owner_id: 7,
            ..Todo::draft(title)
        };
        self.todos.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_todo(&self, todo: &Todo) -> ClientResult<Todo> {
        if *self.fail_update.lock().unwrap() {
            return Err(refused("Could not update todo"));
        }

        let mut todos = self.todos.lock().unwrap();
        if let Some(entry) = todos.iter_mut().find(|t| t.id == todo.id) {
            *entry = todo.clone();
        }
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: i64) -> ClientResult<()> {
        if self.failing_deletes.lock().unwrap().contains(&id) {
            return Err(refused("Could not delete todo"));
        }
        self.todos.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn share_todo(&self, username: &str, id: i64) -> ClientResult<()> {
        if self.failing_shares.lock().unwrap().contains(&id) {
            return Err(refused("Could not retrieve shareUser"));
        }
        self.shares.lock().unwrap().push((username.to_string(), id));
        Ok(())
    }
}
