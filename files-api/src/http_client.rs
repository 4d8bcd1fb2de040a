//! HttpClient used by FilesClient
//!
//! Responsible for
//!  - handling all HTTP api requests
//!  - rendering the URL and query string
//!  - serializing request bodies (json and multipart)
//!  - logging/tracing
//!  - mapping response status codes into FilesErrors
//!
//! Each call issues exactly one request. Recovery (retry, failover) is left
//! to the caller.

use std::{fmt, sync::Arc};

use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::{ClientBuilder, Method, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use snafu::prelude::*;
use tracing::{debug, error, trace};

use crate::{Result, auth::SecretApiKey, prelude::*};

#[derive(Clone, Default)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body.as_ref().map(|b| b.len()).unwrap_or(0))
            .finish()
    }
}

impl HttpRequest {
    /// Create a new request with an updated pagination cursor.
    /// This replaces any existing `after` query parameter.
    pub(crate) fn with_after(&self, after: &str) -> Self {
        let mut new_query: Vec<(String, String)> = self
            .query
            .iter()
            .filter(|(key, _)| key != "after")
            .cloned()
            .collect();
        new_query.push(("after".to_string(), after.to_string()));

        HttpRequest {
            method: self.method.clone(),
            path: self.path.clone(),
            query: new_query,
            body: self.body.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    pub client: reqwest::Client,

    /// Base URL for API requests (e.g., "http://localhost:8080")
    pub base_url: String,

    pub api_key: Arc<Mutex<Option<SecretApiKey>>>,

    limits: ValidationLimits,
}

impl HttpClient {
    pub fn new(builder: ClientBuilder, base_url: String, limits: ValidationLimits) -> Result<Self> {
        let client = builder.build().context(HttpSnafu {
            method: "client-init",
            url: "",
        })?;
        Ok(HttpClient {
            client,
            base_url,
            api_key: Arc::new(Mutex::new(None)),
            limits,
        })
    }

    /// Returns true if api_key has been initialized.
    pub fn has_key(&self) -> bool {
        self.api_key.lock().is_some()
    }

    /// Sets the API key for authenticated requests.
    pub fn set_api_key(&self, api_key: &SecretApiKey) {
        let mut write_key = self.api_key.lock();
        *write_key = Some(api_key.clone());
    }

    /// Clears the api key if set.
    pub fn clear_api_key(&self) {
        let mut write_key = self.api_key.lock();
        *write_key = None;
    }

    /// Makes a GET request and deserializes the json response.
    pub(crate) async fn get_request<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        let req = HttpRequest {
            method: Method::GET,
            path: path.into(),
            query,
            body: None,
        };
        self.send(req).await
    }

    /// Makes a DELETE request and deserializes the json response.
    pub(crate) async fn delete_request<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = HttpRequest {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body: None,
        };
        self.send(req).await
    }

    /// Makes a POST request with a JSON body.
    pub(crate) async fn post_request<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = HttpRequest {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(Bytes::from(
                serde_json::to_vec(body).context(SerializationSnafu)?,
            )),
        };
        self.send(req).await
    }

    /// Makes a POST request with a multipart form body (file upload).
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T> {
        let full_url = format!("{}{}", self.base_url, path);
        debug!("POST (multipart) {full_url}");
        let mut builder = self.client.post(&full_url).multipart(form);
        if let Some(key) = self.api_key.lock().as_ref() {
            builder = key.set_auth_header(builder);
        }
        let response = builder.send().await.context(HttpSnafu {
            method: "POST",
            url: path,
        })?;
        let body = read_response("POST", path, response).await?;
        deserialize_json(&body)
    }

    /// Makes a GET request and returns the raw response body.
    /// Used for file content downloads, where the body is not json.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        let req = HttpRequest {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        };
        self.send_raw(req).await
    }

    /// Sends a request and deserializes the json response body into T.
    pub(crate) async fn send<T: DeserializeOwned>(&self, req: HttpRequest) -> Result<T> {
        let body = self.send_raw(req).await?;
        deserialize_json(&body)
    }

    /// This function handles the http api requests (get, post, delete)
    /// - renders base_url + path + query
    /// - sets the Authorization header when an api key is configured
    /// - issues the request (exactly once)
    /// - maps http error codes into FilesErrors
    async fn send_raw(&self, req: HttpRequest) -> Result<Bytes> {
        // check for excessive request size or invalid query
        self.limits.validate_query(&req.query)?;
        if let Some(ref body) = req.body {
            self.limits
                .validate_body(body.len() as u64, &format!("http {} {}", &req.method, &req.path))?;
        }

        let full_url = format!("{}{}", self.base_url, req.path);
        let mut req_builder = self.client.request(req.method.clone(), &full_url);
        if !req.query.is_empty() {
            req_builder = req_builder.query(&req.query);
        }
        if let Some(key) = self.api_key.lock().as_ref() {
            req_builder = key.set_auth_header(req_builder);
        }
        if let Some(ref body) = req.body {
            req_builder = req_builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        // debug log (if tracing enabled)
        log_request(&req_builder, &req.body);

        let response = req_builder.send().await.map_err(|source| {
            error!(?source, ?req, "http");
            FilesError::Http {
                method: req.method.to_string(),
                url: req.path.clone(),
                source,
            }
        })?;
        read_response(req.method.as_str(), &req.path, response).await
    }
}

/// Maps the response status and reads the body.
/// Success responses return the raw body bytes; error statuses are
/// converted into the matching FilesError variant.
async fn read_response(method: &str, path: &str, response: reqwest::Response) -> Result<Bytes> {
    let code = response.status();
    match code {
        // 2xx, including 201 from the multipart upload route
        ok if ok.is_success() => {
            let body = response.bytes().await.context(HttpSnafu {
                method,
                url: path,
            })?;
            log_response(path, &body);
            Ok(body)
        }
        StatusCode::BAD_REQUEST /* 400 */ => {
            let message = response.text().await.unwrap_or("BadRequest".into());
            error!(?code, ?message, path, "http");
            Err(FilesError::Validation { message })
        }
        StatusCode::NOT_FOUND /* 404 */ |
        StatusCode::GONE /* 410 */ => {
            let message = response.text().await.unwrap_or("NotFound".into());
            error!(?code, ?message, path, "http");
            // the request builder fills in the id it was looking up
            Err(FilesError::NotFound {
                obj_type: "File".into(),
                key: "".into(),
            })
        }
        StatusCode::UNAUTHORIZED /* 401 */ => {
            // client is not authenticated
            let message = response.text().await.unwrap_or("Unauthorized".into());
            error!(?code, ?message, path, "http");
            Err(FilesError::Unauthorized)
        }
        StatusCode::FORBIDDEN /* 403 */ => {
            // client is authenticated, but does not have permission for the file
            let message = response.text().await.unwrap_or("Forbidden".into());
            error!(?code, ?message, path, "http");
            Err(FilesError::Forbidden)
        }
        _ => {
            let message = response.text().await.unwrap_or_default();
            error!(?code, path, message, "http");
            Err(FilesError::ApiError {
                code: code.as_u16(),
                method: method.to_string(),
                url: path.to_string(),
                message,
            })
        }
    }
}

// dump request
// requires RUST_LOG=llmfiles::http_json=trace
fn log_request(builder: &reqwest::RequestBuilder, body: &Option<Bytes>) {
    if tracing::enabled!(target: "llmfiles::http_json", tracing::Level::TRACE)
        && let Some(req) = builder.try_clone().and_then(|cloned| cloned.build().ok())
    {
        let method = req.method().as_str();
        let url = req.url();
        let body = body
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
            .unwrap_or_default();
        // Log method, url (including all query parameters), and body
        // don't log headers so we don't leak the api token
        trace!(target: "llmfiles::http_json", "{method} url={url} body={body}");
    }
}

// dump json response, for debugging
fn log_response(path: &str, body: &Bytes) {
    if tracing::enabled!(target: "llmfiles::http_json", tracing::Level::TRACE) {
        trace!(target: "llmfiles::http_json", "Response path={path} body={}",
            String::from_utf8_lossy(body)
        );
    }
}

// deserialize, reporting errors with 'serde_path_to_error', which provides
// detailed json path to the error
fn deserialize_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(value) => Ok(value),
        Err(err) => {
            error!("Deserialization failed at {}: {}", err.path(), err);
            Err(FilesError::Deserialization {
                source: err.into_inner(),
            })
        }
    }
}
