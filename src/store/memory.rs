use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Account, NewAccount, NewTask, Page, Task, TaskStatus};

use super::{AccountRepository, StoreError, TaskRepository, UniqueField};

/// Process-local store used when no database is configured, and by the tests.
///
/// Maps are keyed by id so iteration follows insertion order. Uniqueness checks and
/// inserts happen under one write lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<i64, Account>,
    tasks: BTreeMap<i64, Task>,
    last_account_id: i64,
    last_task_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Administrative switch for an account's active flag. Returns false for unknown ids.
    pub async fn set_account_active(&self, account_id: i64, active: bool) -> bool {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(&account_id) {
            Some(account) => {
                account.is_active = active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(StoreError::UniqueViolation(UniqueField::Username));
        }
        if inner
            .accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }

        inner.last_account_id += 1;
        let account = Account {
            id: inner.last_account_id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            is_active: true,
        };
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn find_account_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn insert_task(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.accounts.contains_key(&owner_id) {
            return Err(StoreError::Backend(format!(
                "owner {} does not reference an account",
                owner_id
            )));
        }

        inner.last_task_id += 1;
        let task = Task {
            id: inner.last_task_id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            owner_id,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_tasks(
        &self,
        owner_id: i64,
        page: Page,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .values()
            .filter(|task| task.owner_id == owner_id)
            .filter(|task| status.is_none() || task.status == status)
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn find_task(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .get(&task_id)
            .filter(|task| task.owner_id == owner_id)
            .cloned())
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.tasks.get_mut(&task.id) {
            Some(stored) if stored.owner_id == task.owner_id => {
                *stored = task.clone();
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, task_id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .tasks
            .get(&task_id)
            .is_some_and(|task| task.owner_id == owner_id);
        if owned {
            inner.tasks.remove(&task_id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_ids_are_assigned_sequentially() {
        let store = MemoryStore::new();
        let first = store.insert_account(new_account("a", "a@x.com")).await.unwrap();
        let second = store.insert_account(new_account("b", "b@x.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[actix_rt::test]
    async fn test_unique_fields() {
        let store = MemoryStore::new();
        store.insert_account(new_account("a", "a@x.com")).await.unwrap();

        assert!(matches!(
            store.insert_account(new_account("a", "z@x.com")).await,
            Err(StoreError::UniqueViolation(UniqueField::Username))
        ));
        assert!(matches!(
            store.insert_account(new_account("z", "a@x.com")).await,
            Err(StoreError::UniqueViolation(UniqueField::Email))
        ));
    }

    #[actix_rt::test]
    async fn test_concurrent_signups_admit_one() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert_account(new_account("racer", &format!("r{}@x.com", i)))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[actix_rt::test]
    async fn test_task_requires_existing_owner() {
        let store = MemoryStore::new();
        let task = NewTask {
            title: "orphan".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            store.insert_task(42, task).await,
            Err(StoreError::Backend(_))
        ));
    }
}
