//! Error handling for scimx-store
//!
//! Wraps scimx-core ScimError with store-specific helpers

use scimx_core::errors::{ScimError, ScimErrorKind};

/// Result type alias using ScimError
pub type Result<T> = std::result::Result<T, ScimError>;

/// Create a resource-not-found error
pub fn not_found(id: &str) -> ScimError {
    ScimError::new(ScimErrorKind::NotFound)
        .with_resource_id(id)
        .with_message(format!("resource '{}' does not exist", id))
}

/// Create a duplicate-id error for insert
pub fn duplicate_id(id: &str) -> ScimError {
    ScimError::new(ScimErrorKind::Conflict)
        .with_resource_id(id)
        .with_message(format!("resource '{}' already exists", id))
}

/// Create a version conflict error for a failed compare-and-swap
pub fn version_conflict(id: &str) -> ScimError {
    ScimError::new(ScimErrorKind::Conflict)
        .with_resource_id(id)
        .with_message(format!(
            "resource '{}' was modified concurrently; stored version no longer matches",
            id
        ))
}

/// Create a cancellation error for an aborted storage call
pub fn cancelled(op: &str) -> ScimError {
    ScimError::new(ScimErrorKind::Internal)
        .with_op(op)
        .with_message("request cancelled before storage call completed")
}

/// Create a poisoned-lock error
pub fn lock_poisoned(op: &str) -> ScimError {
    ScimError::new(ScimErrorKind::Internal)
        .with_op(op)
        .with_message("store lock poisoned by a panicked writer")
}
