//! Shared state for CLI commands
//!
//! Every command runs against one [`AppContext`]: the session restored from
//! the credential file, the HTTP client and the ledger built on top of it.

use std::sync::Arc;

use crate::api::{HttpClient, TokenSource};
use crate::audit::AuditLogger;
use crate::config::paths::FinGridPaths;
use crate::config::settings::Settings;
use crate::error::{FinGridError, FinGridResult};
use crate::ledger::{LedgerAggregator, LedgerSnapshot, RefreshOutcome};
use crate::session::{decide, RouteGroup, SessionStore, Verdict};
use crate::storage::{EncryptedFileStore, SecretStore};

pub struct AppContext {
    pub paths: FinGridPaths,
    pub settings: Settings,
    pub session: Arc<SessionStore>,
    pub ledger: LedgerAggregator<HttpClient>,
    pub audit: AuditLogger,
}

impl AppContext {
    /// Wire everything up and restore the stored session
    pub fn open(paths: FinGridPaths, settings: Settings) -> FinGridResult<Self> {
        paths.ensure_directories()?;

        let secrets: Arc<dyn SecretStore> = Arc::new(EncryptedFileStore::new(
            paths.credential_file(),
            paths.device_secret_file(),
            settings.key_params.clone(),
        ));
        let session = Arc::new(SessionStore::new(secrets));
        session.initialize();

        let tokens: Arc<dyn TokenSource> = Arc::clone(&session) as _;
        let client = Arc::new(HttpClient::from_settings(&settings, tokens)?);

        let ledger = LedgerAggregator::new(client, settings.failure_policy);
        let audit = AuditLogger::new(paths.audit_log());

        Ok(Self {
            paths,
            settings,
            session,
            ledger,
            audit,
        })
    }

    pub fn api(&self) -> &HttpClient {
        self.ledger.api()
    }

    pub fn currency(&self) -> &str {
        &self.settings.currency_symbol
    }

    /// Run the route guard for the screen a command stands in for
    pub fn require_route(&self, route: RouteGroup) -> FinGridResult<()> {
        let status = self.session.status();
        match decide(status.is_ready, status.is_authenticated, route) {
            Verdict::Allow => Ok(()),
            Verdict::Redirect(RouteGroup::Login) => Err(FinGridError::AuthRejected(
                "Not signed in. Run 'fingrid login' first.".into(),
            )),
            Verdict::Redirect(_) => Err(FinGridError::Validation(
                "Already signed in. Run 'fingrid logout' first.".into(),
            )),
            Verdict::Suspend => Err(FinGridError::Storage(
                "Session could not be restored".into(),
            )),
        }
    }

    /// The current ledger view, refreshed from the backend
    pub async fn load_snapshot(&self) -> FinGridResult<Arc<LedgerSnapshot>> {
        match self.ledger.refresh().await? {
            RefreshOutcome::Applied(snapshot) => Ok(snapshot),
            RefreshOutcome::Stale { .. } => self.ledger.snapshot().ok_or_else(|| {
                FinGridError::Network("Ledger refresh was superseded, try again".into())
            }),
        }
    }
}
