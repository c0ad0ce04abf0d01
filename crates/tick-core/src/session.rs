//! Session credential slot
//!
//! A single process-wide slot for the bearer token. The slot is passed
//! explicitly to whatever needs it (API client, guard, commands) rather
//! than read from ambient global state, and may be backed by a token
//! file so the credential survives between invocations.
//!
//! Lifecycle: absent → present (login/register) → absent (logout or
//! detected invalidity).

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use tracing::debug;

/// Shared handle to the credential slot
///
/// Cloning the handle shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    token: Option<String>,
    path: Option<PathBuf>,
}

impl Session {
    /// An in-memory slot with no persistence
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A slot backed by a token file; loads any existing token
    pub fn with_path(path: PathBuf) -> Result<Self> {
        let token = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read token file: {:?}", path))?;
            let raw = raw.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        } else {
            None
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(Slot {
                token,
                path: Some(path),
            })),
        })
    }

    /// The held token, if any
    pub fn token(&self) -> Option<String> {
        self.slot().token.clone()
    }

    /// Whether a token is currently held
    pub fn is_authenticated(&self) -> bool {
        self.slot().token.is_some()
    }

    /// Store a token, persisting it when the slot is file-backed
    pub fn store(&self, token: &str) -> Result<()> {
        let mut slot = self.slot();
        slot.token = Some(token.to_string());

        if let Some(ref path) = slot.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
            }
            fs::write(path, token)
                .with_context(|| format!("Failed to write token file: {:?}", path))?;
        }

        debug!("credential stored");
        Ok(())
    }

    /// Drop the token and remove the backing file
    pub fn clear(&self) {
        let mut slot = self.slot();
        slot.token = None;

        if let Some(ref path) = slot.path {
            if path.exists() {
                fs::remove_file(path).ok();
            }
        }

        debug!("credential cleared");
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
