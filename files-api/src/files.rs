//! # Files
//!
//! This module provides a fluent builder API for the user-facing Files
//! endpoints: list, get, delete, upload, register-from-object-path, and
//! raw content download.
//!
//! ## File methods on FilesClient
//!
//! - [files](FilesClient::files) - list files
//! - [file](FilesClient::file) - get, delete, or download a single file
//! - [new_file](FilesClient::new_file) - upload a file (multipart)
//! - [new_file_from_object_path](FilesClient::new_file_from_object_path) -
//!   register a file already present in the object store
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmfiles::prelude::*;
//!
//! # async fn example(client: &FilesClient) -> Result<(), FilesError> {
//! // List fine-tuning files
//! let page = client.files().purpose(Purpose::FineTune).list().await?;
//!
//! // Get a specific file
//! let file = client.file("file-123").get().await?;
//!
//! // Download its content
//! let content = client.file(&file.id).content().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Request builders double as the wire request shapes: the fields set on a
//! builder are exactly the fields rendered into the query string or body.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    client::FilesClient,
    http_client::{HttpClient, HttpRequest},
    prelude::*,
};

/// Intended use of an uploaded file.
/// The service rejects uploads with any other purpose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Purpose {
    /// Training data for fine-tuning jobs
    FineTune,
    /// Attachments for assistants
    Assistants,
}

/// Sort direction for file listings. Files are ordered by creation time,
/// newest first by default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One stored file, as reported by the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct File {
    /// Unique file identifier
    #[serde(default)]
    pub id: String,

    /// Size of the file content in bytes
    #[serde(default, deserialize_with = "proto_i64")]
    pub bytes: i64,

    /// Creation time, seconds since the unix epoch
    #[serde(default, alias = "createdAt", deserialize_with = "proto_i64")]
    pub created_at: i64,

    /// Original filename supplied at upload
    #[serde(default)]
    pub filename: String,

    /// Object type marker, always "file"
    #[serde(default)]
    pub object: String,

    /// Intended use ("fine-tune" or "assistants")
    #[serde(default)]
    pub purpose: String,
}

impl File {
    /// Returns the creation time as a chrono timestamp,
    /// or None if `created_at` is out of range.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// Returns the purpose as a typed token, or None for values this
    /// client version doesn't know about.
    pub fn purpose_kind(&self) -> Option<Purpose> {
        self.purpose.parse().ok()
    }
}

/// Response to a file listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListFilesResponse {
    /// Object type marker, always "list"
    #[serde(default)]
    pub object: String,

    /// Files in this page
    #[serde(default)]
    pub data: Vec<File>,

    /// True if more files exist past the end of this page
    #[serde(default, alias = "hasMore")]
    pub has_more: bool,

    /// Total number of files matching the listing
    #[serde(default, deserialize_with = "proto_i64")]
    pub total: i64,
}

impl ListFilesResponse {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, File> {
        self.data.iter()
    }
}

/// Response to a file deletion.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteFileResponse {
    /// Id of the deleted file
    #[serde(default)]
    pub id: String,

    /// Object type marker, always "file"
    #[serde(default)]
    pub object: String,

    /// True if the file was deleted
    #[serde(default)]
    pub deleted: bool,
}

// Gateway int64 fields arrive as json strings (protojson convention); the
// multipart upload route marshals plain numbers. Accept both.
fn proto_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct I64Visitor;

    impl serde::de::Visitor<'_> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an integer, or a string containing an integer")
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> std::result::Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> std::result::Result<i64, E> {
            i64::try_from(value).map_err(E::custom)
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> std::result::Result<i64, E> {
            value.parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// Fills in the id on a NotFound error reported by the transport,
/// which doesn't know what was being looked up.
pub(crate) fn not_found_key(err: FilesError, id: &str) -> FilesError {
    match err {
        FilesError::NotFound { obj_type, .. } => FilesError::NotFound {
            obj_type,
            key: id.to_string(),
        },
        other => other,
    }
}

// ============================================================================
// BUILDER STRUCTS (public)
// ============================================================================

/// Request builder for listing files.
///
/// Obtained via [`FilesClient::files`].
#[derive(Debug)]
pub struct ListFilesRequest {
    client: Arc<HttpClient>,
    limits: ValidationLimits,
    purpose: Option<Purpose>,
    after: Option<String>,
    limit: Option<u32>,
    order: Option<SortOrder>,
}

impl ListFilesRequest {
    pub(crate) fn new(client: Arc<HttpClient>, limits: ValidationLimits) -> Self {
        Self {
            client,
            limits,
            purpose: None,
            after: None,
            limit: None,
            order: None,
        }
    }

    /// Restricts the listing to files with the given purpose.
    pub fn purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Starts the page after the file with this id (cursor pagination).
    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Sets the page size (1..=100).
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the sort direction (by creation time).
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Executes the list request.
    /// Unset fields are omitted from the query string.
    pub async fn list(self) -> Result<FilePage> {
        let mut query: Vec<(String, String)> = Vec::new();
        if let Some(purpose) = self.purpose {
            query.push(("purpose".to_string(), purpose.to_string()));
        }
        if let Some(after) = &self.after {
            self.limits.validate_id(after, "after")?;
            query.push(("after".to_string(), after.clone()));
        }
        if let Some(limit) = self.limit {
            self.limits.validate_page_limit(limit)?;
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order".to_string(), order.to_string()));
        }

        let req = HttpRequest {
            method: Method::GET,
            path: "/v1/files".to_string(),
            query,
            body: None,
        };
        let response: ListFilesResponse = self.client.send(req.clone()).await?;
        Ok(FilePage::new(response, self.client.clone(), req))
    }
}

/// Request builder for operating on a single file by id.
///
/// Obtained via [`FilesClient::file`].
#[derive(Debug)]
pub struct FileRequest {
    client: Arc<HttpClient>,
    limits: ValidationLimits,
    id: String,
}

impl FileRequest {
    pub(crate) fn new(
        client: Arc<HttpClient>,
        limits: ValidationLimits,
        id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            limits,
            id: id.into(),
        }
    }

    /// Retrieves the file metadata.
    pub async fn get(self) -> Result<File> {
        self.limits.validate_id(&self.id, "file")?;
        self.client
            .get_request(&format!("/v1/files/{}", self.id), Vec::new())
            .await
            .map_err(|err| not_found_key(err, &self.id))
    }

    /// Deletes the file.
    pub async fn delete(self) -> Result<DeleteFileResponse> {
        self.limits.validate_id(&self.id, "file")?;
        self.client
            .delete_request(&format!("/v1/files/{}", self.id))
            .await
            .map_err(|err| not_found_key(err, &self.id))
    }

    /// Downloads the raw file content.
    pub async fn content(self) -> Result<Bytes> {
        self.limits.validate_id(&self.id, "file")?;
        self.client
            .get_bytes(&format!("/v1/files/{}/content", self.id))
            .await
            .map_err(|err| not_found_key(err, &self.id))
    }
}

/// Request builder for uploading a file.
///
/// Obtained via [`FilesClient::new_file`].
#[derive(Debug)]
pub struct CreateFileRequest {
    client: Arc<HttpClient>,
    limits: ValidationLimits,
    filename: String,
    content: Bytes,
    purpose: Option<Purpose>,
}

impl CreateFileRequest {
    pub(crate) fn new(
        client: Arc<HttpClient>,
        limits: ValidationLimits,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            client,
            limits,
            filename: filename.into(),
            content: content.into(),
            purpose: None,
        }
    }

    /// Sets the purpose. Required: the service rejects uploads without one.
    pub fn purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Uploads the file as a multipart form with `purpose` and `file` parts.
    pub async fn create(self) -> Result<File> {
        self.limits.validate_filename(&self.filename, "upload")?;
        self.limits
            .validate_body(self.content.len() as u64, "upload")?;
        let Some(purpose) = self.purpose else {
            return ValidationSnafu {
                message: "purpose is required",
            }
            .fail();
        };

        let part = Part::bytes(self.content.to_vec()).file_name(self.filename.clone());
        let form = Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);
        self.client.post_multipart("/v1/files", form).await
    }
}

/// Request builder for registering a file that already exists in the
/// object store, without re-uploading its content.
///
/// Obtained via [`FilesClient::new_file_from_object_path`].
#[derive(Debug)]
pub struct CreateFileFromObjectPathRequest {
    client: Arc<HttpClient>,
    limits: ValidationLimits,
    object_path: String,
    purpose: Purpose,
}

#[derive(Debug, Serialize)]
struct CreateFromObjectPathBody<'a> {
    object_path: &'a str,
    purpose: Purpose,
}

impl CreateFileFromObjectPathRequest {
    pub(crate) fn new(
        client: Arc<HttpClient>,
        limits: ValidationLimits,
        object_path: impl Into<String>,
        purpose: Purpose,
    ) -> Self {
        Self {
            client,
            limits,
            object_path: object_path.into(),
            purpose,
        }
    }

    /// Executes the request.
    pub async fn create(self) -> Result<File> {
        self.limits
            .validate_object_path(&self.object_path, "create")?;
        let body = CreateFromObjectPathBody {
            object_path: &self.object_path,
            purpose: self.purpose,
        };
        self.client
            .post_request("/v1/files:createFromObjectPath", &body)
            .await
    }
}

// ============================================================================
// FILESCLIENT METHODS
// ============================================================================

impl FilesClient {
    /// Creates a request builder for listing files.
    pub fn files(&self) -> ListFilesRequest {
        ListFilesRequest::new(self.client.clone(), self.config.limits.clone())
    }

    /// Creates a request builder for getting, deleting, or downloading a
    /// single file.
    pub fn file(&self, id: impl Into<String>) -> FileRequest {
        FileRequest::new(self.client.clone(), self.config.limits.clone(), id)
    }

    /// Creates a request builder for uploading a file.
    pub fn new_file(
        &self,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> CreateFileRequest {
        CreateFileRequest::new(
            self.client.clone(),
            self.config.limits.clone(),
            filename,
            content,
        )
    }

    /// Creates a request builder for registering an object-store path as a
    /// file.
    pub fn new_file_from_object_path(
        &self,
        object_path: impl Into<String>,
        purpose: Purpose,
    ) -> CreateFileFromObjectPathRequest {
        CreateFileFromObjectPathRequest::new(
            self.client.clone(),
            self.config.limits.clone(),
            object_path,
            purpose,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
