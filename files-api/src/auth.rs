//! Bearer-token credentials for gateway requests
//!
//! The Files gateway sits behind an RBAC proxy in managed deployments and
//! expects an `Authorization: Bearer` header. In standalone mode no key is
//! required and requests are sent unauthenticated.
//!
//! - [set_api_key](crate::client::FilesClient::set_api_key)
//! - [clear_api_key](crate::client::FilesClient::clear_api_key)
//! - [has_api_key](crate::client::FilesClient::has_api_key)

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::LLMFILES_API_KEY_ENV;

/// An api key held in memory. The buffer is zeroed on drop, and the key
/// never appears in Debug output or logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretApiKey(String);

impl SecretApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Reads the key from the `LLMARINER_API_KEY` environment variable.
    /// Returns None if the variable is unset or empty.
    pub fn from_env() -> Option<Self> {
        std::env::var(LLMFILES_API_KEY_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds the Authorization header to an outgoing request.
    pub(crate) fn set_auth_header(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(&self.0)
    }
}

impl fmt::Debug for SecretApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretApiKey(MASKED)")
    }
}

impl From<&str> for SecretApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SecretApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
