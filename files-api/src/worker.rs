//! # Object-store path lookup
//!
//! Worker-plane and internal-plane facades of the Files service. Both
//! expose a single rpc, `GetFilePath`, which resolves a file id to its
//! location in the object store so that job runners can pull content
//! directly instead of proxying it through the gateway.
//!
//! Unlike the user-facing REST routes, these rpcs are exposed by the
//! gateway as generic POSTs on the fully-qualified rpc name.
//!
//! ## Methods on FilesClient
//!
//! - [worker_file_path](FilesClient::worker_file_path) - resolve via the worker service
//! - [internal_file_path](FilesClient::internal_file_path) - resolve via the internal service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmfiles::prelude::*;
//!
//! # async fn example(client: &FilesClient) -> Result<(), FilesError> {
//! let loc = client.worker_file_path("file-123").get().await?;
//! println!("s3 key: {}", loc.path);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    client::FilesClient,
    files::not_found_key,
    http_client::HttpClient,
    prelude::*,
};

/// Fully-qualified rpc service name of the worker-plane facade.
pub const WORKER_SERVICE: &str = "llmariner.files.server.v1.FilesWorkerService";

/// Fully-qualified rpc service name of the internal-plane facade.
pub const INTERNAL_SERVICE: &str = "llmariner.files.server.v1.FilesInternalService";

/// Worker-plane rpc namespace used by deployments predating the project
/// rename. Selected with [`FilePathRequest::legacy`].
pub const LEGACY_WORKER_SERVICE: &str = "llmoperator.files.server.v1.FilesWorkerService";

#[derive(Debug, Serialize)]
struct GetFilePathBody<'a> {
    id: &'a str,
}

/// Location of a file's content in the object store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetFilePathResponse {
    /// Object-store key of the file content
    #[serde(default)]
    pub path: String,

    /// Original filename supplied at upload
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plane {
    Worker,
    Internal,
}

/// Request builder for resolving a file id to its object-store path.
///
/// Obtained via [`FilesClient::worker_file_path`] or
/// [`FilesClient::internal_file_path`].
#[derive(Debug)]
pub struct FilePathRequest {
    client: Arc<HttpClient>,
    limits: ValidationLimits,
    id: String,
    plane: Plane,
    legacy: bool,
}

impl FilePathRequest {
    fn new(
        client: Arc<HttpClient>,
        limits: ValidationLimits,
        id: impl Into<String>,
        plane: Plane,
    ) -> Self {
        Self {
            client,
            limits,
            id: id.into(),
            plane,
            legacy: false,
        }
    }

    /// Uses the pre-rename rpc namespace.
    /// Only meaningful for the worker facade; the internal facade was
    /// introduced after the rename and ignores this setting.
    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Executes the lookup.
    pub async fn get(self) -> Result<GetFilePathResponse> {
        self.limits.validate_id(&self.id, "file")?;

        let service = match (self.plane, self.legacy) {
            (Plane::Worker, true) => LEGACY_WORKER_SERVICE,
            (Plane::Worker, false) => WORKER_SERVICE,
            (Plane::Internal, _) => INTERNAL_SERVICE,
        };
        let path = format!("/{service}/GetFilePath");
        self.client
            .post_request(&path, &GetFilePathBody { id: &self.id })
            .await
            .map_err(|err| not_found_key(err, &self.id))
    }
}

// ============================================================================
// FILESCLIENT METHODS
// ============================================================================

impl FilesClient {
    /// Creates a request builder for resolving a file's object-store path
    /// through the worker-plane service.
    pub fn worker_file_path(&self, id: impl Into<String>) -> FilePathRequest {
        FilePathRequest::new(
            self.client.clone(),
            self.config.limits.clone(),
            id,
            Plane::Worker,
        )
    }

    /// Creates a request builder for resolving a file's object-store path
    /// through the internal-plane service.
    pub fn internal_file_path(&self, id: impl Into<String>) -> FilePathRequest {
        FilePathRequest::new(
            self.client.clone(),
            self.config.limits.clone(),
            id,
            Plane::Internal,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
