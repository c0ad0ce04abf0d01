//! Error handling for client operations
//!
//! Provides typed errors for every operation against the remote store,
//! from local validation through transport failures to reconciliation
//! misses.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during a client operation
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally before any request was sent
    #[error("{0}")]
    Invalid(String),

    /// Network-level failure: unreachable host, timeout, or an
    /// unreadable response body
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status with no structured body
    #[error("Server returned {0}")]
    Status(StatusCode),

    /// Non-success status with a structured error body; the server's
    /// message is shown to the user verbatim
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// The entry a server response should reconcile into is gone from
    /// the local mirror (it lost a race with a delete)
    #[error("No todo with id {id} in the list")]
    Missing { id: i64 },

    /// No credential is held for a request that needs one
    #[error("Not logged in")]
    Unauthenticated,
}

impl ClientError {
    /// Create a local validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        ClientError::Invalid(message.into())
    }

    /// Whether this failure means the credential is missing or refused
    ///
    /// Drives the re-login hint in the CLI.
    pub fn is_auth(&self) -> bool {
        match self {
            ClientError::Unauthenticated => true,
            ClientError::Status(status) | ClientError::Rejected { status, .. } => {
                *status == StatusCode::UNAUTHORIZED
            }
            _ => false,
        }
    }

    /// Whether the failure never left the process (no round trip made)
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Invalid(_) | ClientError::Missing { .. } | ClientError::Unauthenticated
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
