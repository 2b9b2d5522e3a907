//! Auth service
//!
//! Sign-in and sign-up on top of the auth endpoints and the session store.
//! Form checks run before anything is sent.

use tracing::info;

use crate::api::{AuthApi, LedgerApi, LoginRequest, RegisterRequest};
use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::crypto::SecureString;
use crate::error::{FinGridError, FinGridResult};
use crate::ledger::LedgerAggregator;
use crate::session::SessionStore;

/// How a sign-up ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The backend issued a token and the session is authenticated
    SignedIn,
    /// The account exists but the user still has to log in
    LoginRequired,
}

/// Service for authentication flows
pub struct AuthService<'a, A: AuthApi + ?Sized> {
    api: &'a A,
    session: &'a SessionStore,
    audit: Option<&'a AuditLogger>,
}

impl<'a, A: AuthApi + ?Sized> AuthService<'a, A> {
    pub fn new(api: &'a A, session: &'a SessionStore) -> Self {
        Self {
            api,
            session,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Sign in and persist the issued token
    pub async fn login(&self, email: &str, password: &SecureString) -> FinGridResult<()> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(FinGridError::Validation(
                "Email and password are required".into(),
            ));
        }

        let response = self
            .api
            .login(&LoginRequest {
                email,
                password: password.as_str(),
                remember_me: true,
            })
            .await?;

        let token = match response.token {
            Some(token) if response.is_auth_successful && !token.trim().is_empty() => token,
            _ => {
                return Err(FinGridError::AuthRejected(
                    response
                        .error_message
                        .unwrap_or_else(|| "Invalid email or password".into()),
                ))
            }
        };

        self.session.login(token)?;
        info!("signed in");
        self.record(Operation::Login, email);
        Ok(())
    }

    /// Create an account; signs in right away when the backend issues a token
    pub async fn register(
        &self,
        email: &str,
        password: &SecureString,
        password_confirm: &SecureString,
    ) -> FinGridResult<RegisterOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() || password_confirm.is_empty() {
            return Err(FinGridError::Validation("All fields are required".into()));
        }
        if password != password_confirm {
            return Err(FinGridError::Validation("Passwords do not match".into()));
        }

        let response = self
            .api
            .register(&RegisterRequest {
                email,
                password: password.as_str(),
                password_confirm: password_confirm.as_str(),
            })
            .await?;
        self.record(Operation::Register, email);

        match response.token.filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                self.session.login(token)?;
                info!("registered and signed in");
                Ok(RegisterOutcome::SignedIn)
            }
            None => {
                info!("registered, login required");
                Ok(RegisterOutcome::LoginRequired)
            }
        }
    }

    /// Sign out and drop the ledger view
    ///
    /// The session ends even if the stored credential could not be removed;
    /// that failure is still returned.
    pub fn logout<L: LedgerApi + ?Sized>(&self, ledger: &LedgerAggregator<L>) -> FinGridResult<()> {
        let cleared = self.session.logout();
        ledger.clear();
        self.record(Operation::Logout, "");
        cleared
    }

    fn record(&self, operation: Operation, email: &str) {
        if let Some(audit) = self.audit {
            let email = Some(email).filter(|e| !e.is_empty());
            audit.record(&AuditEntry::session(operation, email));
        }
    }
}
