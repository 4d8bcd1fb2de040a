/*
 * LLMariner Files rust api client
 * github.com/llmariner/files-rs
 *
 * SPDX-FileCopyrightText: 2025-2026 LLMariner Authors
 * SPDX-License-Identifier: Apache-2.0
 */
//! # LLMariner Files Rust API Client
//!
//! An ergonomic client for the LLMariner file-manager service, an
//! OpenAI-compatible Files API served through a gRPC gateway.
//!
//! ## Features
//!
//! - typed request builders for every Files endpoint
//! - cursor pagination with async Streams
//! - multipart file upload and raw content download
//! - worker and internal service facades (object-store path lookup)
//! - bearer token auth with zeroized key storage
//! - parameter validation
//! - companion cli tool (`fmr`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmfiles::prelude::*;
//! # async fn example() -> Result<(), FilesError> {
//!
//! // Initialize the client. Endpoint comes from LLMFILES_URL (or localhost),
//! // the api key from LLMARINER_API_KEY, unless set explicitly in the config.
//! let client = FilesClient::new("my-app")?;
//!
//! // Upload a training file
//! let file = client
//!     .new_file("train.jsonl", b"{\"prompt\":\"...\"}\n".to_vec())
//!     .purpose(Purpose::FineTune)
//!     .create()
//!     .await?;
//! println!("uploaded {} ({} bytes)", file.id, file.bytes);
//!
//! // List fine-tuning files
//! let page = client.files().purpose(Purpose::FineTune).list().await?;
//! for f in page.iter() {
//!     println!("{} {}", f.id, f.filename);
//! }
//!
//! // Fetch metadata, then delete
//! let f = client.file(&file.id).get().await?;
//! let gone = client.file(&f.id).delete().await?;
//! assert!(gone.deleted);
//! # Ok(())
//! # }
//! ```
//!
//! ## API Structure
//!
//! The API uses a fluent builder pattern. Methods on `FilesClient` return
//! request builders that are configured with chained method calls and then
//! executed with a terminal method like `get()`, `create()`, `delete()`,
//! `list()`, or `content()`.
//!
//! ```rust,no_run
//! use llmfiles::prelude::*;
//! # async fn example(client: &FilesClient) -> Result<(), FilesError> {
//!
//! // Get/Delete single item: client.file(id).get()/delete()
//! let file = client.file("file-123").get().await?;
//! client.file("file-123").delete().await?;
//!
//! // List with filters and cursor pagination
//! let page = client.files()
//!     .purpose(Purpose::Assistants)
//!     .limit(50)
//!     .order(SortOrder::Asc)
//!     .list().await?;
//!
//! // Register an object already present in the object store
//! let file = client
//!     .new_file_from_object_path("models/adapter.bin", Purpose::FineTune)
//!     .create().await?;
//!
//! // Resolve the object-store path (worker-plane endpoint)
//! let loc = client.worker_file_path(&file.id).get().await?;
//! println!("{} -> {}", loc.filename, loc.path);
//! # Ok(())
//! # }
//! ```
//!
//! ### Notes on API Design
//!
//! - Single-purpose value objects mirror the service schema; fields are
//!   plain data, created per call and discarded after use.
//! - The wire format uses proto field names (snake_case). Responses from
//!   older camelCase deployments are accepted transparently.
//! - All methods use a consistent builder flow: `files()`, `file(id)`,
//!   `new_file(..)`, `new_file_from_object_path(..)` + optional setters +
//!   terminal verbs.
//! - Parameters accept flexible input types via `Into<String>` where useful.
//! - Enums represent token types like [`Purpose`](files::Purpose) and
//!   [`SortOrder`](files::SortOrder).
//! - A single HTTP pipeline handles validation, logging, and serialization.
//!   Each call issues exactly one request; there are no retries, caches, or
//!   batching at this layer.
//! - Pagination uses [`FilePage`](paged::FilePage) with `into_stream()` and
//!   `collect_all()` helpers that follow the `after` cursor.
//!
#![allow(clippy::missing_errors_doc)] // pedantic
#![allow(clippy::missing_const_for_fn)] //  nursery function
#![allow(clippy::must_use_candidate)] // pedantic
#![warn(clippy::default_trait_access)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::future_not_send)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::literal_string_with_formatting_args)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::min_ident_chars)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::ref_option)]
#![warn(clippy::redundant_closure)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unnecessary_wraps)]
#![warn(clippy::unused_async)]

pub mod auth;
pub mod client;
pub mod error;
pub mod files;
mod http_client;
pub mod paged;
pub mod validation;
pub mod worker;

/// Result type alias using `FilesError` as the default error.
pub type Result<T, E = crate::error::FilesError> = std::result::Result<T, E>;

/// Prelude module - import (nearly) all the things with `use llmfiles::prelude::*;`
pub mod prelude {
    pub use super::DEFAULT_ENDPOINT_URL;
    // Error types
    pub use crate::error::*;
    pub use crate::{
        // Bearer token
        auth::SecretApiKey,
        client::{ClientConfig, FilesClient},
        // Files and file operations
        files::{DeleteFileResponse, File, ListFilesResponse, Purpose, SortOrder},
        // Pagination
        paged::FilePage,
        // Validation
        validation::ValidationLimits,
        // Object-store path lookup (worker/internal planes)
        worker::GetFilePathResponse,
    };
}

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default API endpoint (local gateway, standalone mode)
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8080";

pub(crate) mod config {
    /// Environment variable for default endpoint URL
    pub const LLMFILES_URL_ENV: &str = "LLMFILES_URL";

    /// Environment variable holding the api key
    pub const LLMFILES_API_KEY_ENV: &str = "LLMARINER_API_KEY";

    /// Default application name, used for the User-Agent header
    pub const DEFAULT_SERVICE_NAME: &str = "llmfiles";

    /// Maximum pagination page size accepted by the service
    pub const MAX_PAGE_LIMIT: u32 = 100;

    // Validation limits
    pub const VALIDATION_UPLOAD_MAX_LEN: u64 = 10 * 1024 * 1024;
    pub const VALIDATION_FILENAME_MAX_LEN: u32 = 512;
    pub const VALIDATION_ID_MAX_LEN: u32 = 128;
    pub const VALIDATION_OBJECT_PATH_MAX_LEN: u32 = 1024;
    pub const VALIDATION_MAX_QUERY_LEN: u32 = 4000;
}
