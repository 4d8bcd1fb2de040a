//! LLMariner Files Rust API Client
//!
//! # Creating a new api client
//!
//! - [new](FilesClient::new) - create new client
//! - [with_config](FilesClient::with_config) - create client with custom configuration
//! - [with_client](FilesClient::with_client) - create client with configuration and custom reqwest client
//!
//! # Configuration
//!
//! - [get_config](FilesClient::get_config) - returns configuration
//!

use std::sync::Arc;

use tracing::debug;

use crate::{
    DEFAULT_ENDPOINT_URL, Result,
    auth::SecretApiKey,
    config::{DEFAULT_SERVICE_NAME, LLMFILES_URL_ENV},
    http_client::HttpClient,
    prelude::*,
};

/// Configuration for the Files client. Defines endpoint url, credentials,
/// validation limits, and other settings.
///
/// ```rust,no_run
/// use llmfiles::prelude::*;
/// # fn create_client() -> Result<FilesClient, FilesError> {
/// let config = ClientConfig::default()
///     .app_name("my-app")
///     .api_key(SecretApiKey::new("sk-..."));
/// let client = FilesClient::with_config(config)?;
/// # Ok(client)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base url for all Files HTTP/REST api requests.
    /// If not provided in config, url is determined by:
    /// * The environment variable LLMFILES_URL, if defined, or
    /// * "http://localhost:8080" `llmfiles::DEFAULT_ENDPOINT_URL`
    pub base_url: String,

    /// Application name, sent as the User-Agent header. In application code,
    /// you may want to use `env!("CARGO_BIN_NAME")` to use the executable
    /// name, defined at compile time.
    pub app_name: String,

    /// Limits for sanity checking.
    /// To upload files larger than 10MB, increase limits.upload_max_len.
    pub limits: ValidationLimits,

    /// Bearer token for the Authorization header. Defaults to the
    /// LLMARINER_API_KEY environment variable. None sends requests
    /// unauthenticated (standalone gateways accept this).
    pub api_key: Option<SecretApiKey>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: std::env::var(LLMFILES_URL_ENV)
                .unwrap_or(DEFAULT_ENDPOINT_URL.to_string()),
            app_name: DEFAULT_SERVICE_NAME.to_string(),
            limits: Default::default(),
            api_key: SecretApiKey::from_env(),
        }
    }
}

impl ClientConfig {
    /// Sets the app_name.
    pub fn app_name(self, app_name: &str) -> Self {
        ClientConfig {
            app_name: app_name.to_string(),
            ..self
        }
    }

    /// Sets the base url, overriding the environment default.
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..self
        }
    }

    pub fn limits(self, limits: ValidationLimits) -> Self {
        ClientConfig { limits, ..self }
    }

    /// Sets the api key explicitly (None disables authentication).
    pub fn api_key(self, api_key: impl Into<SecretApiKey>) -> Self {
        ClientConfig {
            api_key: Some(api_key.into()),
            ..self
        }
    }

    pub fn get_limits(&self) -> &ValidationLimits {
        &self.limits
    }
}

/// An ergonomic LLMariner Files API client in Rust.
pub struct FilesClient {
    pub(crate) client: Arc<HttpClient>,
    pub(crate) config: ClientConfig,
}

impl std::fmt::Debug for FilesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesClient")
            .field("config", &self.config)
            .finish()
    }
}

impl FilesClient {
    /// Creates a new client with default configuration.
    ///
    /// # Example
    /// ```rust,no_run
    /// use llmfiles::prelude::*;
    /// # fn create_client() -> Result<FilesClient, FilesError> {
    /// let client = FilesClient::new("my-app")?;
    /// # Ok(client)
    /// # }
    /// ```
    pub fn new(app_name: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default().app_name(app_name))
    }

    /// Creates a new client with the provided configuration.
    ///
    /// # Example
    /// ```rust,no_run
    /// use llmfiles::prelude::*;
    /// # fn create_client() -> Result<FilesClient, FilesError> {
    /// let config = ClientConfig::default().app_name("my-app");
    /// let client = FilesClient::with_config(config)?;
    /// # Ok(client)
    /// # }
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder().no_proxy();
        Self::with_client(client, config)
    }

    /// Creates a client from a `reqwest::ClientBuilder` and configuration.
    /// ClientBuilder can be customized with timeouts, proxies, dns servers, etc.
    ///
    /// # Example
    /// ```rust,no_run
    /// use llmfiles::prelude::*;
    /// # fn create_client() -> Result<FilesClient, FilesError> {
    /// let config = ClientConfig::default().app_name("my-app");
    /// let builder = reqwest::Client::builder().timeout(std::time::Duration::from_secs(10));
    /// let client = FilesClient::with_client(builder, config)?;
    /// # Ok(client)
    /// # }
    /// ```
    pub fn with_client(client: reqwest::ClientBuilder, config: ClientConfig) -> Result<Self> {
        debug!(url=?config.base_url, "new client");
        let client = HttpClient::new(
            client.user_agent(config.app_name.clone()),
            config.base_url.clone(),
            config.limits.clone(),
        )?;
        if let Some(key) = config.api_key.as_ref() {
            client.set_api_key(key);
        }
        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Returns the configuration.
    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sets (or replaces) the api key used for subsequent requests.
    pub fn set_api_key(&self, api_key: &SecretApiKey) {
        self.client.set_api_key(api_key);
    }

    /// Clears the api key. Subsequent requests are sent unauthenticated.
    pub fn clear_api_key(&self) {
        self.client.clear_api_key();
    }

    /// Returns true if an api key is configured.
    pub fn has_api_key(&self) -> bool {
        self.client.has_key()
    }
}
