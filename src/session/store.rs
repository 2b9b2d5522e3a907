//! Session state machine
//!
//! The store starts `Unknown`, becomes `Ready` once [`SessionStore::initialize`]
//! has looked for a persisted credential, and then moves between
//! authenticated and unauthenticated through login and logout. Every
//! committed change is published on a watch channel, so subscribers observe
//! it as soon as the call that made it returns.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::TokenSource;
use crate::crypto::SecureString;
use crate::error::{FinGridError, FinGridResult};
use crate::storage::SecretStore;

/// What subscribers see of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStatus {
    /// Whether the persisted credential has been looked at yet
    pub is_ready: bool,
    /// Whether a credential is held
    pub is_authenticated: bool,
}

/// Coarse state of the session machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Ready { authenticated: bool },
}

impl From<SessionStatus> for SessionState {
    fn from(status: SessionStatus) -> Self {
        if status.is_ready {
            Self::Ready {
                authenticated: status.is_authenticated,
            }
        } else {
            Self::Unknown
        }
    }
}

/// Owner of the process's single session
pub struct SessionStore {
    secrets: Arc<dyn SecretStore>,
    token: Mutex<Option<SecureString>>,
    status: watch::Sender<SessionStatus>,
}

impl SessionStore {
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        let (status, _) = watch::channel(SessionStatus::default());
        Self {
            secrets,
            token: Mutex::new(None),
            status,
        }
    }

    /// Current status snapshot
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn state(&self) -> SessionState {
        self.status().into()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// The credential held by this session, if any
    pub fn token(&self) -> Option<SecureString> {
        self.token_slot().clone()
    }

    /// Read the persisted credential and become ready
    ///
    /// A read failure counts as "no credential": the session ends up ready and
    /// unauthenticated instead of failing.
    pub fn initialize(&self) -> SessionStatus {
        let credential = match self.secrets.read() {
            Ok(credential) => credential.filter(|c| !c.is_blank()),
            Err(e) => {
                warn!(error = %e, "could not read session credential, starting signed out");
                None
            }
        };

        let authenticated = credential.is_some();
        *self.token_slot() = credential;
        self.publish(authenticated);
        info!(authenticated, "session initialized");
        self.status()
    }

    /// Persist `token` and mark the session authenticated
    ///
    /// Nothing changes if the credential cannot be written.
    pub fn login(&self, token: impl Into<SecureString>) -> FinGridResult<()> {
        let token = token.into();
        if token.is_blank() {
            return Err(FinGridError::Validation(
                "Session token cannot be empty".into(),
            ));
        }

        self.secrets.write(&token)?;

        *self.token_slot() = Some(token);
        self.publish(true);
        info!("session authenticated");
        Ok(())
    }

    /// Clear the persisted credential and mark the session signed out
    ///
    /// The session is signed out even when clearing the credential fails; the
    /// error is still returned so the caller can report it.
    pub fn logout(&self) -> FinGridResult<()> {
        let cleared = self.secrets.delete();

        *self.token_slot() = None;
        self.publish(false);

        match &cleared {
            Ok(()) => info!("session signed out"),
            Err(e) => warn!(error = %e, "signed out but the stored credential was not removed"),
        }
        cleared
    }

    fn publish(&self, authenticated: bool) {
        self.status.send_replace(SessionStatus {
            is_ready: true,
            is_authenticated: authenticated,
        });
    }

    fn token_slot(&self) -> MutexGuard<'_, Option<SecureString>> {
        // The slot only ever holds a plain value, so a poisoned lock is still usable
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<SecureString> {
        self.token()
    }
}
