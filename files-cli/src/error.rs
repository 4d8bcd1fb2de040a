//! Exit-code mapping for scripted callers.

use llmfiles::prelude::FilesError;

/// Maps an error chain to a process exit code:
/// 2 = not found, 3 = invalid input, 4 = auth failure, 1 = anything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<FilesError>() {
        Some(FilesError::NotFound { .. }) => 2,
        Some(FilesError::Validation { .. }) => 3,
        Some(FilesError::Unauthorized | FilesError::Forbidden | FilesError::Auth { .. }) => 4,
        _ => 1,
    }
}
