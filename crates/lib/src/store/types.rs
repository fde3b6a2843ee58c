//! Records kept by the store and the payloads that create or change them.

use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    /// Argon2id PHC string; never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Input for [`Store::create_user`](super::Store::create_user).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Whether an explorer node is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

/// A node in a user's file explorer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub content: Option<String>,
    pub parent_id: Option<u64>,
    pub user_id: u64,
}

/// Input for [`Store::create_file`](super::Store::create_file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    pub user_id: u64,
}

/// Partial update for a file. Absent (or `null`) fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<FileKind>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

impl FileUpdate {
    pub(crate) fn apply(self, file: &mut File) {
        if let Some(name) = self.name {
            file.name = name;
        }
        if let Some(path) = self.path {
            file.path = path;
        }
        if let Some(kind) = self.kind {
            file.kind = kind;
        }
        if let Some(content) = self.content {
            file.content = Some(content);
        }
        if let Some(parent_id) = self.parent_id {
            file.parent_id = Some(parent_id);
        }
    }
}

/// A file a user opened, with when they last opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFile {
    pub id: u64,
    pub file_id: u64,
    pub user_id: u64,
    /// ISO-8601 capture time.
    pub opened_at: String,
}

/// Input for [`Store::add_recent_file`](super::Store::add_recent_file).
#[derive(Debug, Clone)]
pub struct NewRecentFile {
    pub file_id: u64,
    pub user_id: u64,
    pub opened_at: String,
}
