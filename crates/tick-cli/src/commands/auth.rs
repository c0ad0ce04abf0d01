//! Login, registration, and logout

use anyhow::{bail, Result};

use tick_core::{Access, HttpStore, Region, RemoteStore, Session, SessionGuard};

use crate::output::Output;

/// Log in and store the session token
pub async fn login(
    store: &HttpStore,
    session: &Session,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    ensure_logged_out(store, session).await?;

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let token = store.login(&username, &password).await?;
    session.store(&token)?;

    output.success(&format!("Logged in as {}", username));
    Ok(())
}

/// Create an account and store the session token
pub async fn register(
    store: &HttpStore,
    session: &Session,
    username: String,
    password: Option<String>,
    email: Option<String>,
    output: &Output,
) -> Result<()> {
    ensure_logged_out(store, session).await?;

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let token = store.register(&username, &password, email.as_deref()).await?;
    session.store(&token)?;

    output.success(&format!("Registered {} and logged in", username));
    Ok(())
}

/// Drop the stored session token
pub fn logout(session: &Session, output: &Output) -> Result<()> {
    if !session.is_authenticated() {
        output.message("No session to log out of.");
        return Ok(());
    }

    session.clear();
    output.success("Logged out");
    Ok(())
}

/// Turn already-authenticated users away from the auth commands
///
/// A stale token is cleared by the guard on the way, so a failed check
/// leaves the user free to log in again.
async fn ensure_logged_out(store: &HttpStore, session: &Session) -> Result<()> {
    let mut guard = SessionGuard::new();
    let state = guard.resolve(store, session).await;

    if state.auth_access() == Access::Redirect(Region::Protected) {
        bail!("Already logged in. Run `tick logout` first.");
    }
    Ok(())
}

/// Prompt for a password on stdin
fn prompt_password() -> Result<String> {
    use std::io::{self, Write};

    print!("Password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}
