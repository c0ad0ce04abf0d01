//! HTTP implementation of the remote store
//!
//! One reqwest client per store, bearer-token authenticated from the
//! session slot. Non-success responses are mapped onto the error
//! taxonomy: a structured `{error}` body becomes a server rejection
//! with its message intact, anything else a bare status failure.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::wire::{
    CategoryPage, Credentials, ErrorBody, NewTodo, ShareRequest, TodoBody, TodoPage, TokenBody,
};
use super::RemoteStore;
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, Todo};
use crate::session::Session;

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// Remote store reached over HTTP
pub struct HttpStore {
    base: String,
    http: Client,
    session: Session,
}

impl HttpStore {
    /// Create a store client for the given base URL
    pub fn new(base_url: &str, session: Session) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .user_agent(concat!("tick/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Attach the bearer token, failing before the network if none is held
    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::Unauthenticated)?;
        Ok(request.bearer_auth(token))
    }

    /// Decode a successful response body, or map the failure
    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        Err(Self::rejection(status, response).await)
    }

    /// Check a response for success, discarding the body
    async fn ack(response: Response) -> ClientResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::rejection(status, response).await)
    }

    async fn rejection(status: StatusCode, response: Response) -> ClientError {
        match response.json::<ErrorBody>().await {
            Ok(body) => {
                warn!(%status, error = %body.error, "server rejected request");
                ClientError::Rejected {
                    status,
                    message: body.error,
                }
            }
            Err(_) => {
                warn!(%status, "server returned a bare failure status");
                ClientError::Status(status)
            }
        }
    }
}

impl RemoteStore for HttpStore {
    async fn login(&self, username: &str, password: &str) -> ClientResult<String> {
        debug!(username, "logging in");
        let response = self
            .http
            .post(self.url("/login"))
            .json(&Credentials {
                username,
                password,
                email: None,
            })
            .send()
            .await?;

        let body: TokenBody = Self::decode(response).await?;
        Ok(body.token)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<String> {
        debug!(username, "registering");
        let response = self
            .http
            .post(self.url("/register"))
            .json(&Credentials {
                username,
                password,
                email,
            })
            .send()
            .await?;

        let body: TokenBody = Self::decode(response).await?;
        Ok(body.token)
    }

    async fn check_token(&self) -> ClientResult<bool> {
        let request = self.authorized(self.http.get(self.url("/auth/check-token")))?;
        let response = request.send().await?;
        // Any non-success status means the token is no longer accepted
        Ok(response.status().is_success())
    }

    async fn fetch_todos(&self) -> ClientResult<Vec<Todo>> {
        let request = self.authorized(self.http.get(self.url("/auth/todos")))?;
        let page: TodoPage = Self::decode(request.send().await?).await?;
        // The server serializes an empty collection as null
        Ok(page.todos.unwrap_or_default())
    }

    async fn fetch_categories(&self) -> ClientResult<Vec<Category>> {
        let request = self.authorized(self.http.get(self.url("/auth/categories")))?;
        let page: CategoryPage = Self::decode(request.send().await?).await?;
        Ok(page.categories.unwrap_or_default())
    }

    async fn create_todo(&self, title: &str) -> ClientResult<Todo> {
        debug!(title, "creating todo");
        let request = self.authorized(self.http.post(self.url("/auth/todo/create")))?;
        let response = request.json(&NewTodo { title }).send().await?;
        // The reply carries the new id as todo_id and no category; the
        // model's lenient shape fills in the defaults
        Self::decode(response).await
    }

    async fn update_todo(&self, todo: &Todo) -> ClientResult<Todo> {
        debug!(id = todo.id, "updating todo");
        let request =
            self.authorized(self.http.put(self.url(&format!("/auth/todo/{}", todo.id))))?;
        let body: TodoBody = Self::decode(request.json(todo).send().await?).await?;
        Ok(body.todo)
    }

    async fn delete_todo(&self, id: i64) -> ClientResult<()> {
        debug!(id, "deleting todo");
        let request =
            self.authorized(self.http.delete(self.url(&format!("/auth/todo/{}", id))))?;
        Self::ack(request.send().await?).await
    }

    async fn share_todo(&self, username: &str, id: i64) -> ClientResult<()> {
        debug!(username, id, "sharing todo");
        let request = self.authorized(self.http.post(self.url("/auth/share")))?;
        let response = request.json(&ShareRequest { username, id }).send().await?;
        Self::ack(response).await
    }
}
