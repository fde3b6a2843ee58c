//! Record storage for users, files and recently opened files.
//!
//! The [`Store`] trait is the repository the HTTP layer is handed at
//! startup; [`InMemoryStore`] is the only implementation. Records are keyed
//! by integers that count up from 1 per table and are never reused.

use async_trait::async_trait;

use crate::Result;

pub mod crypto;
pub mod errors;
mod in_memory;
pub mod types;

pub use errors::StoreError;
pub use in_memory::InMemoryStore;
pub use types::{File, FileKind, FileUpdate, NewFile, NewRecentFile, NewUser, RecentFile, User};

/// Repository of editor records.
///
/// All implementations must be `Send` and `Sync` so one instance can be
/// shared by every request handler.
#[async_trait]
pub trait Store: Send + Sync {
    /// Retrieves a user by ID.
    async fn user(&self, id: u64) -> Result<Option<User>>;

    /// Retrieves a user by exact username.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Creates a user. Fails with [`StoreError::UsernameTaken`] on duplicates.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Retrieves a file by ID.
    async fn file(&self, id: u64) -> Result<Option<File>>;

    /// All files owned by a user, in ID order.
    async fn files_by_user(&self, user_id: u64) -> Result<Vec<File>>;

    /// Creates a file. Fails with [`StoreError::PathTaken`] if the path is in use.
    async fn create_file(&self, file: NewFile) -> Result<File>;

    /// Merges `update` into an existing file.
    ///
    /// Fails with [`StoreError::FileNotFound`] if the file does not exist.
    async fn update_file(&self, id: u64, update: FileUpdate) -> Result<File>;

    /// Deletes a file. Deleting a missing file is not an error.
    async fn delete_file(&self, id: u64) -> Result<()>;

    /// Recently opened files for a user, most recent first.
    async fn recent_files_by_user(&self, user_id: u64) -> Result<Vec<RecentFile>>;

    /// Records that a user opened a file.
    ///
    /// If the pair is already recorded its `opened_at` is refreshed and the
    /// existing record (same ID) is returned.
    async fn add_recent_file(&self, recent: NewRecentFile) -> Result<RecentFile>;
}

/// Registers a user, hashing the password first.
pub async fn register_user(store: &dyn Store, username: &str, password: &str) -> Result<User> {
    if store.user_by_username(username).await?.is_some() {
        return Err(StoreError::UsernameTaken {
            username: username.to_string(),
        }
        .into());
    }
    let password_hash = crypto::hash_password(password)?;
    store
        .create_user(NewUser {
            username: username.to_string(),
            password_hash,
        })
        .await
}

/// Checks a username/password pair against the store.
pub async fn authenticate(store: &dyn Store, username: &str, password: &str) -> Result<User> {
    let user = store
        .user_by_username(username)
        .await?
        .ok_or(StoreError::InvalidCredentials)?;
    crypto::verify_password(password, &user.password_hash)?;
    Ok(user)
}
