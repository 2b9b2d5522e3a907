//! reqwest implementation of the backend API
//!
//! The bearer credential comes from the in-memory session on every request,
//! so a login or logout takes effect on the next call without rebuilding the
//! client. A signed-out session never sends a header, whatever is left on disk.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::wire::{
    check_payload, ApiErrorResponse, BankSyncResponse, CheckPayload, LoginRequest, LoginResponse,
    ManualTransactionRequest, NewCategoryRequest, RegisterRequest, RegisterResponse,
};
use super::{AuthApi, LedgerApi, TokenSource};
use crate::config::Settings;
use crate::crypto::SecureString;
use crate::error::{FinGridError, FinGridResult};
use crate::models::{Account, AccountId, BudgetSummary, Category, CategorySpend, TransactionRecord};

const SUMMARY: &str = "/Budget/summary";
const ACCOUNTS: &str = "/Bank/accounts";
const HISTORY: &str = "/Budget/history";
const ANALYTICS: &str = "/Budget/analytics";
const MANUAL_TRANSACTION: &str = "/Budget/manual-transaction";
const CATEGORIES: &str = "/Budget/categories";
const BANK_SYNC: &str = "/Bank/sync";
const TOGGLE_INCLUSION: &str = "/Bank/accounts/{accountId}/toggle-inclusion";
const LOGIN: &str = "/Account/login";
const REGISTER: &str = "/Account/register";

/// Longest slice of an unparsed error body quoted in an error message
const ERROR_BODY_PREVIEW: usize = 200;

/// HTTP client for the budget backend
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpClient {
    /// Create a client for `base_url` (e.g. "http://localhost:5053/api")
    ///
    /// Requests never time out unless `timeout` is given.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        tokens: Arc<dyn TokenSource>,
    ) -> FinGridResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FinGridError::Config(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn from_settings(settings: &Settings, tokens: Arc<dyn TokenSource>) -> FinGridResult<Self> {
        Self::new(
            &settings.api_base_url,
            settings.request_timeout_secs.map(Duration::from_secs),
            tokens,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Toggle endpoint for `account_id`, with the ID encoded as one path segment
    fn toggle_url(&self, account_id: &AccountId) -> FinGridResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            FinGridError::Config(format!("Invalid backend URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FinGridError::Config(format!("Backend URL '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["Bank", "accounts", account_id.as_str(), "toggle-inclusion"]);
        Ok(url)
    }

    /// Bearer header from the session credential, empty when there is none
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(credential) = self.tokens.bearer_token() {
            match HeaderValue::from_str(&format!("Bearer {}", credential.as_str())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("session credential is not a valid header value, skipping it"),
            }
        }
        headers
    }

    async fn get<T>(&self, endpoint: &'static str) -> FinGridResult<T>
    where
        T: DeserializeOwned + CheckPayload,
    {
        debug!(endpoint, "GET");
        let response = self
            .client
            .get(self.url(endpoint))
            .headers(self.auth_headers())
            .send()
            .await?;
        let payload = self.parse_response(endpoint, response).await?;
        check_payload(endpoint, payload)
    }

    async fn post<U, B, T>(&self, endpoint: &'static str, url: U, body: Option<&B>) -> FinGridResult<T>
    where
        U: reqwest::IntoUrl,
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(endpoint, "POST");
        let mut request = self.client.post(url).headers(self.auth_headers());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.parse_response(endpoint, response).await
    }

    async fn read_body(
        &self,
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> FinGridResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FinGridError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(ApiErrorResponse::into_message)
                .unwrap_or_else(|| {
                    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
                    if preview.trim().is_empty() {
                        status.to_string()
                    } else {
                        preview
                    }
                });
            debug!(endpoint, status = status.as_u16(), "request failed");
            return Err(FinGridError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> FinGridResult<T> {
        let body = self.read_body(endpoint, response).await?;
        serde_json::from_str(&body).map_err(|e| FinGridError::InvalidPayload {
            endpoint,
            reason: e.to_string(),
        })
    }
}

/// Map a refusal of the supplied credentials to `AuthRejected`
fn auth_error(err: FinGridError) -> FinGridError {
    match err {
        FinGridError::Api { status, message } if status == 400 || status == 401 => {
            FinGridError::AuthRejected(message)
        }
        other => other,
    }
}

#[async_trait]
impl LedgerApi for HttpClient {
    async fn fetch_summary(&self) -> FinGridResult<BudgetSummary> {
        self.get(SUMMARY).await
    }

    async fn fetch_accounts(&self) -> FinGridResult<Vec<Account>> {
        self.get(ACCOUNTS).await
    }

    async fn fetch_history(&self) -> FinGridResult<Vec<TransactionRecord>> {
        self.get(HISTORY).await
    }

    async fn fetch_analytics(&self) -> FinGridResult<Vec<CategorySpend>> {
        self.get(ANALYTICS).await
    }

    async fn add_manual_transaction(
        &self,
        request: &ManualTransactionRequest,
    ) -> FinGridResult<TransactionRecord> {
        let record = self
            .post(MANUAL_TRANSACTION, self.url(MANUAL_TRANSACTION), Some(request))
            .await?;
        check_payload(MANUAL_TRANSACTION, record)
    }

    async fn add_category(&self, request: &NewCategoryRequest) -> FinGridResult<Category> {
        let category = self
            .post(CATEGORIES, self.url(CATEGORIES), Some(request))
            .await?;
        check_payload(CATEGORIES, category)
    }

    async fn sync_bank(&self, bank_token: &SecureString) -> FinGridResult<BankSyncResponse> {
        self.post(BANK_SYNC, self.url(BANK_SYNC), Some(bank_token.as_str()))
            .await
    }

    async fn toggle_inclusion(&self, account_id: &AccountId) -> FinGridResult<Account> {
        let url = self.toggle_url(account_id)?;
        let account = self.post::<_, (), _>(TOGGLE_INCLUSION, url, None).await?;
        check_payload(TOGGLE_INCLUSION, account)
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, request: &LoginRequest<'_>) -> FinGridResult<LoginResponse> {
        self.post(LOGIN, self.url(LOGIN), Some(request))
            .await
            .map_err(auth_error)
    }

    async fn register(&self, request: &RegisterRequest<'_>) -> FinGridResult<RegisterResponse> {
        let response = self
            .client
            .post(self.url(REGISTER))
            .json(request)
            .send()
            .await?;
        let body = self.read_body(REGISTER, response).await.map_err(auth_error)?;
        if body.trim().is_empty() {
            return Ok(RegisterResponse::default());
        }
        serde_json::from_str(&body).map_err(|e| FinGridError::InvalidPayload {
            endpoint: REGISTER,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::storage::{MemorySecretStore, SecretStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts reads and can refuse to delete
    struct CountingStore {
        inner: MemorySecretStore,
        reads: AtomicUsize,
        fail_delete: bool,
    }

    impl CountingStore {
        fn new(fail_delete: bool) -> Self {
            Self {
                inner: MemorySecretStore::new(),
                reads: AtomicUsize::new(0),
                fail_delete,
            }
        }
    }

    impl SecretStore for CountingStore {
        fn read(&self) -> FinGridResult<Option<SecureString>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read()
        }
        fn write(&self, credential: &SecureString) -> FinGridResult<()> {
            self.inner.write(credential)
        }
        fn delete(&self) -> FinGridResult<()> {
            if self.fail_delete {
                return Err(FinGridError::Storage("read-only volume".into()));
            }
            self.inner.delete()
        }
    }

    fn client_for(session: &Arc<SessionStore>) -> HttpClient {
        HttpClient::new("http://localhost:5053/api", None, Arc::clone(session) as Arc<dyn TokenSource>)
            .unwrap()
    }

    fn session_over(secrets: Arc<dyn SecretStore>) -> Arc<SessionStore> {
        let session = Arc::new(SessionStore::new(secrets));
        session.initialize();
        session
    }

    #[test]
    fn test_base_url_is_normalized() {
        let session = session_over(Arc::new(MemorySecretStore::new()));
        let client = HttpClient::new(
            "http://localhost:5053/api/",
            None,
            session as Arc<dyn TokenSource>,
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5053/api");
        assert_eq!(client.url(SUMMARY), "http://localhost:5053/api/Budget/summary");
    }

    #[test]
    fn test_bearer_header_from_restored_session() {
        let session = session_over(Arc::new(MemorySecretStore::with_credential("tok-A")));
        let headers = client_for(&session).auth_headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-A");
    }

    #[test]
    fn test_no_header_without_credential() {
        let session = session_over(Arc::new(MemorySecretStore::new()));
        assert!(client_for(&session).auth_headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_header_follows_login_and_logout() {
        let session = session_over(Arc::new(MemorySecretStore::new()));
        let client = client_for(&session);

        session.login("tok-B").unwrap();
        assert_eq!(client.auth_headers().get(AUTHORIZATION).unwrap(), "Bearer tok-B");

        session.logout().unwrap();
        assert!(client.auth_headers().is_empty());
    }

    #[test]
    fn test_no_header_after_logout_that_left_credential_on_disk() {
        let store = Arc::new(CountingStore::new(true));
        let session = session_over(Arc::clone(&store) as Arc<dyn SecretStore>);
        let client = client_for(&session);

        session.login("tok-A").unwrap();
        assert!(session.logout().is_err());

        assert!(store.inner.read().unwrap().is_some());
        assert!(!session.status().is_authenticated);
        assert!(client.auth_headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_requests_do_not_read_the_secret_store() {
        let store = Arc::new(CountingStore::new(false));
        store.inner.write(&SecureString::new("tok-A".to_string())).unwrap();
        let session = session_over(Arc::clone(&store) as Arc<dyn SecretStore>);
        let client = client_for(&session);

        for _ in 0..5 {
            assert!(client.auth_headers().contains_key(AUTHORIZATION));
        }
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_toggle_url_encodes_account_id() {
        let session = session_over(Arc::new(MemorySecretStore::new()));
        let client = client_for(&session);

        let url = client.toggle_url(&AccountId::new("u7Tq")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5053/api/Bank/accounts/u7Tq/toggle-inclusion"
        );

        let url = client.toggle_url(&AccountId::new("a/b?c#d")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5053/api/Bank/accounts/a%2Fb%3Fc%23d/toggle-inclusion"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_toggle_url_rejects_unusable_base() {
        let session = session_over(Arc::new(MemorySecretStore::new()));
        let client =
            HttpClient::new("mailto:someone", None, session as Arc<dyn TokenSource>).unwrap();
        assert!(matches!(
            client.toggle_url(&AccountId::new("a")),
            Err(FinGridError::Config(_))
        ));
    }

    #[test]
    fn test_auth_error_mapping() {
        let rejected = auth_error(FinGridError::Api {
            status: 401,
            message: "Invalid Authentication".into(),
        });
        assert!(matches!(rejected, FinGridError::AuthRejected(_)));

        let outage = auth_error(FinGridError::Api {
            status: 503,
            message: "down".into(),
        });
        assert!(matches!(outage, FinGridError::Api { status: 503, .. }));
    }
}
