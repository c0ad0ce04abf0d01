//! Todo command handlers

use anyhow::{bail, Result};

use tick_core::{HttpStore, Session, Todo};

use crate::commands::open_board;
use crate::output::Output;

/// List todos, optionally filtered by completion state
pub async fn list(
    store: HttpStore,
    session: &Session,
    pending: bool,
    done: bool,
    output: &Output,
) -> Result<()> {
    let board = open_board(store, session).await?;

    let todos: Vec<Todo> = board
        .todos()
        .iter()
        .filter(|t| {
            if pending {
                !t.completed
            } else if done {
                t.completed
            } else {
                true
            }
        })
        .cloned()
        .collect();

    output.print_todos(&todos);
    Ok(())
}

/// Add a new todo
pub async fn add(
    store: HttpStore,
    session: &Session,
    title: Vec<String>,
    output: &Output,
) -> Result<()> {
    let title = title.join(" ");
    let mut board = open_board(store, session).await?;

    let todo = board.create(&title).await?;

    output.success(&format!("Added todo {}", todo.id));
    output.print_todo(&todo);
    Ok(())
}

/// Toggle completion for a todo
pub async fn done(store: HttpStore, session: &Session, id: i64, output: &Output) -> Result<()> {
    let mut board = open_board(store, session).await?;

    board.toggle(id).await?;

    match board.todos().iter().find(|t| t.id == id) {
        Some(todo) => {
            let state = if todo.completed { "done" } else { "open" };
            output.success(&format!("Todo {} is now {}", id, state));
        }
        // The update was reconciled away (deleted elsewhere mid-flight)
        None => output.message(board.last_error().unwrap_or("Todo is gone")),
    }
    Ok(())
}

/// Change a todo's title or category
pub async fn edit(
    store: HttpStore,
    session: &Session,
    id: i64,
    title: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    if title.is_none() && category.is_none() {
        bail!("Nothing to change. Pass --title and/or --category.");
    }

    let mut board = open_board(store, session).await?;

    board.edit(id, title.as_deref(), category.as_deref()).await?;

    match board.todos().iter().find(|t| t.id == id) {
        Some(todo) => {
            output.success("Todo updated");
            output.print_todo(todo);
        }
        None => output.message(board.last_error().unwrap_or("Todo is gone")),
    }
    Ok(())
}

/// Delete every completed todo
pub async fn clear(store: HttpStore, session: &Session, output: &Output) -> Result<()> {
    let mut board = open_board(store, session).await?;

    let deleted = board.clear_completed().await?;

    if deleted == 0 {
        output.message("Nothing completed to delete.");
    } else {
        output.success(&format!("Deleted {} completed todo(s)", deleted));
    }
    Ok(())
}

/// List known categories
pub async fn categories(store: HttpStore, session: &Session, output: &Output) -> Result<()> {
    let board = open_board(store, session).await?;
    output.print_categories(board.categories());
    Ok(())
}
