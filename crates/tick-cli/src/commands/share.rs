//! Share command handler

use anyhow::Result;

use tick_core::{HttpStore, Session};

use crate::commands::open_board;
use crate::output::Output;

/// Share the given todos with another user
///
/// The ids go through the selection first, so anything that vanished
/// between load and share is caught by id before a request goes out.
pub async fn share(
    store: HttpStore,
    session: &Session,
    username: String,
    ids: Vec<i64>,
    output: &Output,
) -> Result<()> {
    let mut board = open_board(store, session).await?;

    for id in ids {
        if !board.selection().contains(id) {
            board.toggle_selected(id)?;
        }
    }

    let shared = board.share_selected(&username).await?;

    output.success(&format!("Shared {} todo(s) with {}", shared, username));
    Ok(())
}
