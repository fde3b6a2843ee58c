//! Error types for the record store.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// User not found by ID.
    #[error("User not found: {id}")]
    UserNotFound {
        /// The ID that was looked up
        id: u64,
    },

    /// File not found by ID.
    #[error("File not found")]
    FileNotFound {
        /// The ID that was looked up
        id: u64,
    },

    /// A user with this name already exists.
    #[error("Username already exists")]
    UsernameTaken {
        /// The conflicting username
        username: String,
    },

    /// Another file already occupies this path.
    #[error("Path already exists: {path}")]
    PathTaken {
        /// The conflicting path
        path: String,
    },

    /// Unknown user or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("Password hashing failed: {reason}")]
    PasswordHash {
        /// Hasher error text
        reason: String,
    },
}

impl StoreError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UserNotFound { .. } | StoreError::FileNotFound { .. }
        )
    }

    /// Check if this error indicates a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::UsernameTaken { .. } | StoreError::PathTaken { .. }
        )
    }

    /// Check if this error is an authentication failure.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, StoreError::InvalidCredentials)
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
