//! Validation functions
//!

use snafu::prelude::*;

use crate::{
    Result,
    config::{
        MAX_PAGE_LIMIT, VALIDATION_FILENAME_MAX_LEN, VALIDATION_ID_MAX_LEN,
        VALIDATION_MAX_QUERY_LEN, VALIDATION_OBJECT_PATH_MAX_LEN, VALIDATION_UPLOAD_MAX_LEN,
    },
    prelude::*,
};

/// Determine if a string is (probably) a file id, using syntactic checks.
/// Ids are generated server-side as uuids, but the check is deliberately
/// loose: any non-empty run of url-safe characters passes.
/// Does not check whether the apparent-id represents an actual file.
pub fn looks_like_file_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}

/// Validation limits for safety & sanity checking.
/// The objective is to catch requests that would be rejected by the gateway
/// anyway, or that might cause resource exhaustion, before any bytes go on
/// the wire. A too-strict limit may cause the program to fail with
/// legitimate inputs, so it may be preferable to err on the side of looser
/// limits. All limits can be adjusted at client creation time.
#[derive(Debug, Clone)]
pub struct ValidationLimits {
    /// max size of an uploaded file body in bytes
    pub upload_max_len: u64,

    /// max length of a filename in bytes
    pub filename_max_len: u64,

    /// max length of a file id
    pub id_max_len: u64,

    /// max length of an object-store path
    pub object_path_max_len: u64,

    /// max size of a query (total length of key=value params)
    pub max_query_len: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        ValidationLimits {
            // the gateway parses multipart forms with a 10 MiB memory cap
            upload_max_len: VALIDATION_UPLOAD_MAX_LEN,
            // max filename length (default: 512 bytes)
            filename_max_len: VALIDATION_FILENAME_MAX_LEN as u64,
            // max length of a file id (default: 128 B; server ids are uuids)
            id_max_len: VALIDATION_ID_MAX_LEN as u64,
            // max length of an object-store path (default: 1024 B)
            object_path_max_len: VALIDATION_OBJECT_PATH_MAX_LEN as u64,
            // max size of query string (approximate) (default: 4000 bytes)
            max_query_len: VALIDATION_MAX_QUERY_LEN as u64,
        }
    }
}

impl ValidationLimits {
    /// Checks a file id: not empty, length within range, url-safe characters.
    /// Ids are embedded in request paths, so anything else would produce a
    /// malformed URL.
    #[doc(hidden)]
    pub fn validate_id(&self, id: &str, description: &str) -> Result<()> {
        ensure!(
            !id.is_empty(),
            ValidationSnafu {
                message: format!("{description} id cannot be empty"),
            }
        );
        ensure!(
            id.len() <= self.id_max_len as usize,
            ValidationSnafu {
                message: format!(
                    "{description} id too long: {} bytes (max: {})",
                    id.len(),
                    self.id_max_len
                ),
            }
        );
        ensure!(
            looks_like_file_id(id),
            ValidationSnafu {
                message: format!("{description} not a valid file id"),
            }
        );
        Ok(())
    }

    #[doc(hidden)]
    pub fn validate_filename(&self, filename: &str, description: &str) -> Result<()> {
        ensure!(
            !filename.is_empty(),
            ValidationSnafu {
                message: format!("{description} filename cannot be empty"),
            }
        );
        ensure!(
            filename.len() <= self.filename_max_len as usize,
            ValidationSnafu {
                message: format!(
                    "{description} filename too long: {} bytes (max: {})",
                    filename.len(),
                    self.filename_max_len
                ),
            }
        );
        Ok(())
    }

    #[doc(hidden)]
    pub fn validate_object_path(&self, path: &str, description: &str) -> Result<()> {
        ensure!(
            !path.is_empty(),
            ValidationSnafu {
                message: format!("{description} object path cannot be empty"),
            }
        );
        ensure!(
            path.len() <= self.object_path_max_len as usize,
            ValidationSnafu {
                message: format!(
                    "{description} object path too long: {} bytes (max: {})",
                    path.len(),
                    self.object_path_max_len
                ),
            }
        );
        Ok(())
    }

    #[doc(hidden)]
    pub fn validate_body(&self, len: u64, description: &str) -> Result<()> {
        ensure!(
            len <= self.upload_max_len,
            ValidationSnafu {
                message: format!(
                    "{description} body too long: {len} bytes (max: {})",
                    self.upload_max_len
                ),
            }
        );
        Ok(())
    }

    #[doc(hidden)]
    pub fn validate_page_limit(&self, limit: u32) -> Result<()> {
        ensure!(
            (1..=MAX_PAGE_LIMIT).contains(&limit),
            ValidationSnafu {
                message: format!("page limit {limit} out of range (1..={MAX_PAGE_LIMIT})"),
            }
        );
        Ok(())
    }

    #[doc(hidden)]
    pub fn validate_query(&self, query: &[(String, String)]) -> Result<()> {
        let mut query_size = 0;
        for (key, val) in query.iter() {
            query_size += key.len() + val.len() + 1;
        }
        ensure!(
            query_size <= self.max_query_len as usize,
            ValidationSnafu {
                message: format!("query too long {query_size}")
            }
        );
        Ok(())
    }
}
