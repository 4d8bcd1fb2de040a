//! Errors returned by `FilesClient`
//!
use snafu::prelude::*;

/// Errors returned by the llmfiles crate
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FilesError {
    // Http connection or timeout error
    #[snafu(display("HTTP error {method} url:{url}"))]
    Http {
        method: String,
        url: String,
        source: reqwest::Error,
    },

    /// The gateway responded with an error status.
    /// This error usually means the request was invalid, or there was an internal server error.
    #[snafu(display("Api Server reported error ({code}) {method} {url}: {message}"))]
    ApiError {
        code: u16,
        method: String,
        url: String,
        message: String,
    },

    /// Authorization error
    #[snafu(display("Authentication failed: {message}"))]
    Auth { message: String },

    /// Deserialization error. This means we didn't deserialize a server response correctly.
    /// If you see this error, please report it as a bug.
    #[snafu(display("Deserialization: {source}"))]
    Deserialization { source: serde_json::Error },

    /// Serialization error. unlikely to occur. If you see this error, please report it as a bug.
    #[snafu(display("Serialization: {source}"))]
    Serialization { source: serde_json::Error },

    /// Expected item was not found. Returned for any file lookup by id.
    #[snafu(display("{obj_type} {key} not found"))]
    NotFound { obj_type: String, key: String },

    /// Client is not authenticated.
    #[snafu(display("Client is not authenticated. Set an api key first."))]
    Unauthorized,

    /// Client is authenticated, but user does not have proper authorization
    #[snafu(display("Permission denied: User does not have permission to access the file(s)"))]
    Forbidden,

    /// Validation error: an internal parameter validation check failed.
    #[snafu(display("Validation error: {message}"))]
    Validation { message: String },

    /// Some other error occurred
    #[snafu(display("{message}"))]
    Other { message: String },
}
