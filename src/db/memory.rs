//! In-memory storage backend.
//!
//! [`MemoryStore`] implements both [`CredentialStore`] and [`TaskStore`]
//! behind a single [`parking_lot::RwLock`]. Each operation takes the lock
//! once, so unique-name inserts are atomic without any extra coordination.
//! Data is lost when the process exits.

use super::traits::{CredentialStore, InsertUserError, NewUser, TaskRecord, TaskStore, UserRecord};
use crate::types::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct Inner {
    users_by_id: BTreeMap<i64, UserRecord>,
    ids_by_name: HashMap<String, i64>,
    tasks: BTreeMap<i64, StoredTask>,
    next_task_id: i64,
}

struct StoredTask {
    record: TaskRecord,
    deleted_at: Option<i64>,
}

impl StoredTask {
    fn live_for(&self, owner_id: i64) -> bool {
        self.deleted_at.is_none() && self.record.owner_id == owner_id
    }
}

/// Ephemeral store for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, user: NewUser<'_>) -> std::result::Result<(), InsertUserError> {
        let mut inner = self.inner.write();

        if inner.ids_by_name.contains_key(user.name) {
            return Err(InsertUserError::DuplicateName);
        }
        if inner.users_by_id.contains_key(&user.id) {
            return Err(InsertUserError::DuplicateId(user.id));
        }

        inner.ids_by_name.insert(user.name.to_string(), user.id);
        inner.users_by_id.insert(
            user.id,
            UserRecord {
                id: user.id,
                name: user.name.to_string(),
                password_hash: user.password_hash.to_string(),
                display_name: user.display_name.map(str::to_string),
                created_at: Utc::now().timestamp(),
            },
        );

        Ok(())
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .ids_by_name
            .get(name)
            .and_then(|id| inner.users_by_id.get(id))
            .cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.inner.read().users_by_id.get(&id).cloned())
    }

    async fn max_user_id(&self) -> Result<Option<i64>> {
        Ok(self.inner.read().users_by_id.keys().next_back().copied())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, owner_id: i64, title: &str) -> Result<TaskRecord> {
        let mut inner = self.inner.write();
        let now = Utc::now().timestamp();

        inner.next_task_id += 1;
        let record = TaskRecord {
            id: inner.next_task_id,
            owner_id,
            title: title.to_string(),
            status: false,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(
            record.id,
            StoredTask {
                record: record.clone(),
                deleted_at: None,
            },
        );

        Ok(record)
    }

    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<TaskRecord>> {
        Ok(self
            .inner
            .read()
            .tasks
            .values()
            .filter(|task| task.live_for(owner_id))
            .map(|task| task.record.clone())
            .collect())
    }

    async fn get_task(&self, owner_id: i64, id: i64) -> Result<Option<TaskRecord>> {
        Ok(self
            .inner
            .read()
            .tasks
            .get(&id)
            .filter(|task| task.live_for(owner_id))
            .map(|task| task.record.clone()))
    }

    async fn update_task_status(&self, owner_id: i64, id: i64, status: bool) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.tasks.get_mut(&id) {
            Some(task) if task.live_for(owner_id) => {
                task.record.status = status;
                task.record.updated_at = Utc::now().timestamp();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_task(&self, owner_id: i64, id: i64) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.tasks.get_mut(&id) {
            Some(task) if task.live_for(owner_id) => {
                task.deleted_at = Some(Utc::now().timestamp());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user<'a>(id: i64, name: &'a str) -> NewUser<'a> {
        NewUser {
            id,
            name,
            password_hash: "digest",
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_is_distinguishable() {
        let store = MemoryStore::new();
        store.insert_user(new_user(1, "alice")).await.unwrap();

        let err = store.insert_user(new_user(2, "alice")).await.unwrap_err();
        assert!(matches!(err, InsertUserError::DuplicateName));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_distinguishable() {
        let store = MemoryStore::new();
        store.insert_user(new_user(1, "alice")).await.unwrap();

        let err = store.insert_user(new_user(1, "bob")).await.unwrap_err();
        assert!(matches!(err, InsertUserError::DuplicateId(1)));
        assert!(store.get_user_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let store = MemoryStore::new();
        store.insert_user(new_user(1, "alice")).await.unwrap();
        store.insert_user(new_user(2, "Alice")).await.unwrap();

        assert_eq!(store.get_user_by_name("Alice").await.unwrap().unwrap().id, 2);
        assert_eq!(store.max_user_id().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_tasks_are_owner_scoped() {
        let store = MemoryStore::new();
        let task = store.create_task(1, "buy milk").await.unwrap();

        assert!(store.get_task(2, task.id).await.unwrap().is_none());
        assert!(!store.update_task_status(2, task.id, true).await.unwrap());
        assert!(!store.delete_task(2, task.id).await.unwrap());
        assert!(store.list_tasks(2).await.unwrap().is_empty());

        assert_eq!(store.list_tasks(1).await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn test_soft_deleted_tasks_disappear() {
        let store = MemoryStore::new();
        let task = store.create_task(1, "buy milk").await.unwrap();

        assert!(store.delete_task(1, task.id).await.unwrap());
        assert!(!store.delete_task(1, task.id).await.unwrap());
        assert!(!store.update_task_status(1, task.id, true).await.unwrap());
        assert!(store.list_tasks(1).await.unwrap().is_empty());
    }
}
