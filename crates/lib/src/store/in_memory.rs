use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::crypto::hash_password;
use super::types::*;
use super::{Store, StoreError};
use crate::Result;

/// All tables behind one lock so multi-table checks stay consistent.
#[derive(Debug)]
struct Tables {
    users: BTreeMap<u64, User>,
    files: BTreeMap<u64, File>,
    recent_files: BTreeMap<u64, RecentFile>,
    next_user_id: u64,
    next_file_id: u64,
    next_recent_file_id: u64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            files: BTreeMap::new(),
            recent_files: BTreeMap::new(),
            next_user_id: 1,
            next_file_id: 1,
            next_recent_file_id: 1,
        }
    }
}

impl Tables {
    fn insert_user(&mut self, new: NewUser) -> Result<User> {
        if self.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::UsernameTaken {
                username: new.username,
            }
            .into());
        }
        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User {
            id,
            username: new.username,
            password_hash: new.password_hash,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn insert_file(&mut self, new: NewFile) -> Result<File> {
        if self.files.values().any(|f| f.path == new.path) {
            return Err(StoreError::PathTaken { path: new.path }.into());
        }
        let id = self.next_file_id;
        self.next_file_id += 1;
        let file = File {
            id,
            name: new.name,
            path: new.path,
            kind: new.kind,
            content: new.content,
            parent_id: new.parent_id,
            user_id: new.user_id,
        };
        self.files.insert(id, file.clone());
        Ok(file)
    }
}

/// A `BTreeMap`-backed [`Store`].
///
/// Nothing is persisted; every restart begins from an empty store (or the
/// demo seed). Suitable for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with user `demo` (password `password`) and a
    /// small `/src` tree owned by that user.
    pub fn with_demo_data() -> Result<Self> {
        let mut tables = Tables::default();
        let demo = tables.insert_user(NewUser {
            username: "demo".to_string(),
            password_hash: hash_password("password")?,
        })?;

        let src = tables.insert_file(NewFile {
            name: "src".to_string(),
            path: "/src".to_string(),
            kind: FileKind::Directory,
            content: None,
            parent_id: None,
            user_id: demo.id,
        })?;
        let components = tables.insert_file(NewFile {
            name: "components".to_string(),
            path: "/src/components".to_string(),
            kind: FileKind::Directory,
            content: None,
            parent_id: Some(src.id),
            user_id: demo.id,
        })?;
        tables.insert_file(NewFile {
            name: "App.jsx".to_string(),
            path: "/src/components/App.jsx".to_string(),
            kind: FileKind::File,
            content: Some("// Sample React component".to_string()),
            parent_id: Some(components.id),
            user_id: demo.id,
        })?;

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.tables.write().await.insert_user(user)
    }

    async fn file(&self, id: u64) -> Result<Option<File>> {
        Ok(self.tables.read().await.files.get(&id).cloned())
    }

    async fn files_by_user(&self, user_id: u64) -> Result<Vec<File>> {
        let tables = self.tables.read().await;
        Ok(tables
            .files
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_file(&self, file: NewFile) -> Result<File> {
        self.tables.write().await.insert_file(file)
    }

    async fn update_file(&self, id: u64, update: FileUpdate) -> Result<File> {
        let mut tables = self.tables.write().await;
        if let Some(path) = &update.path
            && tables.files.values().any(|f| f.id != id && &f.path == path)
        {
            return Err(StoreError::PathTaken { path: path.clone() }.into());
        }
        let file = tables
            .files
            .get_mut(&id)
            .ok_or(StoreError::FileNotFound { id })?;
        update.apply(file);
        Ok(file.clone())
    }

    async fn delete_file(&self, id: u64) -> Result<()> {
        self.tables.write().await.files.remove(&id);
        Ok(())
    }

    async fn recent_files_by_user(&self, user_id: u64) -> Result<Vec<RecentFile>> {
        let tables = self.tables.read().await;
        let mut recent: Vec<RecentFile> = tables
            .recent_files
            .values()
            .filter(|rf| rf.user_id == user_id)
            .cloned()
            .collect();
        // ISO-8601 strings in one format sort chronologically.
        recent.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        Ok(recent)
    }

    async fn add_recent_file(&self, recent: NewRecentFile) -> Result<RecentFile> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .recent_files
            .values_mut()
            .find(|rf| rf.file_id == recent.file_id && rf.user_id == recent.user_id)
        {
            existing.opened_at = recent.opened_at;
            return Ok(existing.clone());
        }

        let id = tables.next_recent_file_id;
        tables.next_recent_file_id += 1;
        let record = RecentFile {
            id,
            file_id: recent.file_id,
            user_id: recent.user_id,
            opened_at: recent.opened_at,
        };
        tables.recent_files.insert(id, record.clone());
        Ok(record)
    }
}
