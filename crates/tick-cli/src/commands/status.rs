//! Status command handler

use anyhow::Result;

use tick_core::{Config, GuardState, HttpStore, Session, SessionGuard};

use crate::output::{Output, OutputFormat};

/// Show connection and session status
pub async fn show(
    config: &Config,
    store: HttpStore,
    session: &Session,
    output: &Output,
) -> Result<()> {
    let mut guard = SessionGuard::new();
    let state = guard.resolve(&store, session).await;
    let authenticated = state == GuardState::Valid;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "token_file": config.token_path(),
                    "authenticated": authenticated
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", if authenticated { "valid" } else { "invalid" });
        }
        OutputFormat::Human => {
            println!("Tick Status");
            println!("===========");
            println!();
            println!("Server:");
            println!("  URL: {}", config.api_url);
            println!();
            println!("Session:");
            println!("  Token file: {}", config.token_path().display());
            println!(
                "  Status:     {}",
                if authenticated { "valid" } else { "not logged in" }
            );
        }
    }

    Ok(())
}
