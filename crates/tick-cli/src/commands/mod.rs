//! CLI command handlers

pub mod auth;
pub mod config;
pub mod share;
pub mod status;
pub mod todo;

use anyhow::{bail, Result};

use tick_core::{Access, Board, HttpStore, Session, SessionGuard};

/// Resolve the guard and load the board for a protected command
///
/// The credential is validated before anything is fetched; a missing or
/// refused credential fails with a re-login hint instead of showing any
/// data.
pub async fn open_board(store: HttpStore, session: &Session) -> Result<Board<HttpStore>> {
    let mut guard = SessionGuard::new();
    let state = guard.resolve(&store, session).await;

    if state.protected_access() != Access::Allow {
        bail!("Not logged in (or the session expired). Run `tick login <username>` first.");
    }

    let mut board = Board::new(store);
    board.load().await?;
    Ok(board)
}
