//! CRM HTTP client

pub mod auth;
pub mod dashboard;
pub mod error;
mod refresh;
pub mod response;
pub mod session;
pub mod transaction;
pub mod ui;

use crm_core::ClientSettings;
use crm_core::settings::{DEFAULT_API_PREFIX, DEFAULT_LOGIN_PATH, DEFAULT_REFRESH_PATH};
use error::{BuildError, RequestError};
use reqwest::{Client, ClientBuilder, StatusCode, header};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::types::{ApiRequest, ApiResponse, RequestMethod};
use session::{MemoryTokenStore, Session, TokenStore};
use ui::{
    BusyGuard, BusyIndicator, LoggingNavigator, Navigator, NoopBusyIndicator, Notifier, Severity,
    TracingNotifier,
};

/// Title of every error notification raised by the client
pub const ERROR_TITLE: &str = "Error";

/// Message shown when no response could be obtained
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Authenticated CRM API client
///
/// Every call sends the stored access token as a bearer credential. A 401
/// triggers one token refresh and one replay of the same request; if the
/// refresh fails the session is cleared and the browser is sent to the login
/// page. Concurrent calls refresh independently.
#[derive(Clone)]
pub struct CrmClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    refresh_path: String,
    login_path: String,
    session: Session,
    busy: Arc<dyn BusyIndicator>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl CrmClient {
    /// Create a new client with default collaborators and an in-memory session
    ///
    /// # Errors
    ///
    /// Fails when the base URL is empty or the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>) -> Result<Self, BuildError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> CrmClientBuilder {
        CrmClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session holding the credential pair and cached user
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Path the browser is sent to when authorization cannot be recovered
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Absolute URL of an API endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            self.api_prefix,
            endpoint.trim_start_matches('/')
        )
    }

    fn refresh_url(&self) -> String {
        format!("{}{}", self.base_url, self.refresh_path)
    }

    /// Execute a request, refreshing the access token once on 401
    ///
    /// # Errors
    ///
    /// Every error has already been surfaced through the [`Notifier`] (or, for
    /// [`RequestError::AuthExpired`], by navigating to the login page).
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        let body = request.body()?;
        debug!(method = %request.method, endpoint = %request.endpoint, "Dispatching API request");

        let response = self.attempt(&request, body.as_deref(), true).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return self.decode(response).await;
        }

        warn!(
            method = %request.method,
            endpoint = %request.endpoint,
            "Access token rejected, refreshing"
        );
        if let Err(err) = self.refresh_access_token().await {
            warn!(error = %err, login_path = %self.login_path, "Session cannot be recovered");
            self.navigator.redirect_to(&self.login_path);
            return Err(RequestError::AuthExpired);
        }

        let retry = self.attempt(&request, body.as_deref(), true).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            // Surface the server's message, but never refresh a second time.
            let _ = self.decode(retry).await;
            warn!(
                method = %request.method,
                endpoint = %request.endpoint,
                "Refreshed token rejected"
            );
            self.navigator.redirect_to(&self.login_path);
            return Err(RequestError::AuthExpired);
        }

        self.decode(retry).await
    }

    /// Execute a request without credentials or refresh handling
    pub(crate) async fn execute_public(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse, RequestError> {
        let body = request.body()?;
        debug!(
            method = %request.method,
            endpoint = %request.endpoint,
            "Dispatching public API request"
        );

        let response = self.attempt(&request, body.as_deref(), false).await?;
        self.decode(response).await
    }

    /// Execute `method` against `endpoint` with an optional JSON payload
    ///
    /// # Errors
    ///
    /// See [`CrmClient::execute`]
    pub async fn request(
        &self,
        endpoint: &str,
        method: RequestMethod,
        payload: Option<JsonValue>,
    ) -> Result<ApiResponse, RequestError> {
        let mut request = ApiRequest::new(endpoint, method);
        request.payload = payload;
        self.execute(request).await
    }

    /// GET an endpoint
    ///
    /// # Errors
    ///
    /// See [`CrmClient::execute`]
    pub async fn get(&self, endpoint: &str) -> Result<ApiResponse, RequestError> {
        self.execute(ApiRequest::get(endpoint)).await
    }

    /// POST a JSON payload
    ///
    /// # Errors
    ///
    /// Fails when the payload does not serialize, otherwise see
    /// [`CrmClient::execute`]
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<ApiResponse, RequestError> {
        self.execute(ApiRequest::new(endpoint, RequestMethod::Post).with_json(payload)?)
            .await
    }

    /// PUT a JSON payload
    ///
    /// # Errors
    ///
    /// Fails when the payload does not serialize, otherwise see
    /// [`CrmClient::execute`]
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<ApiResponse, RequestError> {
        self.execute(ApiRequest::new(endpoint, RequestMethod::Put).with_json(payload)?)
            .await
    }

    /// PATCH a JSON payload
    ///
    /// # Errors
    ///
    /// Fails when the payload does not serialize, otherwise see
    /// [`CrmClient::execute`]
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<ApiResponse, RequestError> {
        self.execute(ApiRequest::new(endpoint, RequestMethod::Patch).with_json(payload)?)
            .await
    }

    /// DELETE an endpoint
    ///
    /// # Errors
    ///
    /// See [`CrmClient::execute`]
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse, RequestError> {
        self.execute(ApiRequest::new(endpoint, RequestMethod::Delete))
            .await
    }

    /// One network round trip inside its own busy cycle
    async fn attempt(
        &self,
        request: &ApiRequest,
        body: Option<&str>,
        with_bearer: bool,
    ) -> Result<reqwest::Response, RequestError> {
        let busy = BusyGuard::begin(self.busy.as_ref());
        let result = self.send(request, body, with_bearer).await;
        busy.end();

        result.map_err(|err| self.network_failure(err))
    }

    async fn send(
        &self,
        request: &ApiRequest,
        body: Option<&str>,
        with_bearer: bool,
    ) -> reqwest::Result<reqwest::Response> {
        let mut builder = self
            .client
            .request(request.method.into(), self.endpoint_url(&request.endpoint))
            .header(header::CONTENT_TYPE, "application/json");

        if with_bearer {
            // Read at call time so a refresh by any caller is picked up.
            let token = self.session.access_token();
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.as_deref().unwrap_or("null")),
            );
        }

        if let Some(body) = body {
            builder = builder.body(body.to_owned());
        }

        builder.send().await
    }

    fn network_failure(&self, err: reqwest::Error) -> RequestError {
        error!(error = %err, "API request failed");
        self.notifier
            .notify(ERROR_TITLE, NETWORK_ERROR_MESSAGE, Severity::Error);
        RequestError::Network(err)
    }

    fn notify_error(&self, message: &str) {
        self.notifier.notify(ERROR_TITLE, message, Severity::Error);
    }
}

impl std::fmt::Debug for CrmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmClient")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CrmClient`]
#[derive(Default)]
pub struct CrmClientBuilder {
    base_url: Option<String>,
    api_prefix: Option<String>,
    refresh_path: Option<String>,
    login_path: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    busy: Option<Arc<dyn BusyIndicator>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl CrmClientBuilder {
    /// Seed a builder from loaded settings
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let mut builder = Self::default()
            .base_url(&settings.base_url)
            .api_prefix(&settings.api_prefix)
            .refresh_path(&settings.refresh_path)
            .login_path(&settings.login_path)
            .user_agent(&settings.user_agent);

        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        builder
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the prefix endpoints are resolved under (default `/api/`)
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    /// Set the token refresh path (default `/api/token/refresh/`)
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Set the login page path (default `/login/`)
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set the request timeout (ignored on WASM)
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set where tokens and the cached user are persisted
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Set the loading indicator toggled around each network call
    pub fn busy_indicator(mut self, busy: Arc<dyn BusyIndicator>) -> Self {
        self.busy = Some(busy);
        self
    }

    /// Set the sink for user-visible error messages
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the navigator used for the login redirect
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Fails without a base URL, on a relative refresh or login path, or when
    /// the underlying HTTP client cannot be created
    pub fn build(self) -> Result<CrmClient, BuildError> {
        let base_url = self
            .base_url
            .ok_or_else(|| BuildError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let api_prefix = self
            .api_prefix
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        let refresh_path = self
            .refresh_path
            .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string());
        let login_path = self
            .login_path
            .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());

        for (name, value) in [
            ("api_prefix", &api_prefix),
            ("refresh_path", &refresh_path),
            ("login_path", &login_path),
        ] {
            if !value.starts_with('/') {
                return Err(BuildError::Configuration(format!(
                    "{name} must start with '/', got {value:?}"
                )));
            }
        }

        // Ensure the prefix ends with exactly one slash
        let api_prefix = format!("{}/", api_prefix.trim_end_matches('/'));

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| format!("crm-client/{}", env!("CARGO_PKG_VERSION"))),
        );

        let client = client_builder.build()?;

        let store = self
            .token_store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));

        Ok(CrmClient {
            client,
            base_url,
            api_prefix,
            refresh_path,
            login_path,
            session: Session::new(store),
            busy: self.busy.unwrap_or_else(|| Arc::new(NoopBusyIndicator)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            navigator: self.navigator.unwrap_or_else(|| Arc::new(LoggingNavigator)),
        })
    }
}
