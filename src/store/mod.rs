//! Persistence boundary.
//!
//! `AccountRepository` and `TaskRepository` are the raw CRUD ports; `PgStore` and
//! `MemoryStore` implement both. Uniqueness of usernames/emails and owner filtering are
//! enforced by each backend inside a single statement (or under a single lock), never by
//! a separate check in application code.
//!
//! `AccountStore` and `TaskStore` sit on top of the ports and carry the account and
//! ownership rules the handlers rely on.

pub mod accounts;
pub mod memory;
pub mod postgres;
pub mod tasks;

use std::fmt;

use async_trait::async_trait;

use crate::models::{Account, NewAccount, NewTask, Page, Task, TaskStatus};

pub use accounts::AccountStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use tasks::TaskStore;

/// Account column protected by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    UniqueViolation(UniqueField),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        StoreError::Backend(error.to_string())
    }
}

/// Persistence operations for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persists a new, active account with a fresh id.
    ///
    /// # Errors
    /// * `UniqueViolation` - username or email is already taken
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn find_account_by_username(&self, username: &str)
        -> Result<Option<Account>, StoreError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;
}

/// Persistence operations for tasks. Every lookup and mutation is scoped to `owner_id`.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn insert_task(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError>;

    /// Owner's tasks in storage (id) order, optionally narrowed to one status.
    async fn list_tasks(
        &self,
        owner_id: i64,
        page: Page,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>, StoreError>;

    /// Overwrites the mutable columns of the row matching `task.id` and `task.owner_id`.
    /// Returns `None` when no such row exists.
    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError>;

    /// Returns true if a matching row existed and was removed.
    async fn delete_task(&self, task_id: i64, owner_id: i64) -> Result<bool, StoreError>;
}
