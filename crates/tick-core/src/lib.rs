//! Tick Core Library
//!
//! This crate provides the client-side engine for tick, a command-line
//! client for a shared todo service.
//!
//! # Architecture
//!
//! The remote API is the source of truth. The client keeps an in-memory
//! mirror of the remote collections and reconciles it from server
//! responses after every mutation; it never trusts a locally guessed
//! value beyond display.
//!
//! # Quick Start
//!
//! ```text
//! let session = Session::with_path(config.token_path())?;
//! let store = HttpStore::new(&config.api_url, session.clone())?;
//!
//! let mut board = Board::new(store);
//! board.load().await?;
//! board.create("buy milk").await?;
//! ```
//!
//! # Modules
//!
//! - `board`: local mirror of the remote collections (main entry point)
//! - `selection`: todos marked for a batch share
//! - `guard`: one-shot credential check gating the command surfaces
//! - `api`: remote store contract and its HTTP implementation
//! - `session`: the bearer-token slot
//! - `models`: todo and category data structures
//! - `config`: application configuration

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod selection;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpStore, RemoteStore};
pub use board::Board;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use guard::{Access, GuardState, Region, SessionGuard};
pub use models::{Category, Todo};
pub use selection::Selection;
pub use session::Session;
