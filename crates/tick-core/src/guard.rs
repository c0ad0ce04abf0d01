//! Session-gated access
//!
//! A one-shot asynchronous credential check deciding which of the two
//! command surfaces the user may reach: the authenticated todo board, or
//! login/registration. The check settles exactly once per guard; nothing
//! is rendered while it is pending, so stale credentials never flash
//! protected content.

use tracing::{debug, warn};

use crate::api::RemoteStore;
use crate::session::Session;

/// Outcome of the credential check
///
/// `Pending` allows a single forward transition to one of the two
/// terminal states; a settled guard never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// Check not yet performed
    #[default]
    Pending,
    /// The server accepted the credential
    Valid,
    /// Credential missing, refused, or the server was unreachable
    Invalid,
}

/// The two mutually exclusive command surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Authenticated surface: the todo board
    Protected,
    /// Unauthenticated surface: login and registration
    Auth,
}

/// What a region should do for a given guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Check still pending: show nothing yet
    Wait,
    /// This region may be entered
    Allow,
    /// Send the user to the other region
    Redirect(Region),
}

impl GuardState {
    /// Decision for the authenticated surface
    pub fn protected_access(self) -> Access {
        match self {
            GuardState::Pending => Access::Wait,
            GuardState::Valid => Access::Allow,
            GuardState::Invalid => Access::Redirect(Region::Auth),
        }
    }

    /// Decision for the login/registration surface
    pub fn auth_access(self) -> Access {
        match self {
            GuardState::Pending => Access::Wait,
            GuardState::Valid => Access::Redirect(Region::Protected),
            GuardState::Invalid => Access::Allow,
        }
    }
}

/// One-shot guard over the session credential
#[derive(Debug, Default)]
pub struct SessionGuard {
    state: GuardState,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state without triggering a check
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Validate the held credential, settling the guard
    ///
    /// The remote check runs at most once: later calls return the
    /// settled state without another round trip. A missing credential
    /// settles `Invalid` without asking the server, and an unreachable
    /// server counts as invalid. Any invalid outcome clears the
    /// credential slot, so the stale token is never offered again.
    pub async fn resolve<S: RemoteStore>(&mut self, store: &S, session: &Session) -> GuardState {
        if self.state != GuardState::Pending {
            return self.state;
        }

        let valid = if session.token().is_none() {
            debug!("no credential held");
            false
        } else {
            match store.check_token().await {
                Ok(valid) => valid,
                Err(err) => {
                    warn!(%err, "credential check could not reach the server");
                    false
                }
            }
        };

        if !valid {
            session.clear();
        }

        self.state = if valid {
            GuardState::Valid
        } else {
            GuardState::Invalid
        };
        debug!(state = ?self.state, "guard settled");
        self.state
    }
}
