use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::models::{Account, NewAccount, NewTask, Page, Task, TaskStatus};

use super::{AccountRepository, StoreError, TaskRepository, UniqueField};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, is_active";
const TASK_COLUMNS: &str = "id, title, description, status, due_date, owner_id";

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies pending migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))
    }
}

/// Maps the unique constraints on `accounts` to the field they protect.
fn classify_insert_error(error: sqlx::Error) -> StoreError {
    if let Some(db_err) = error.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("accounts_username_key") => {
                    return StoreError::UniqueViolation(UniqueField::Username)
                }
                Some("accounts_email_key") => {
                    return StoreError::UniqueViolation(UniqueField::Email)
                }
                _ => {}
            }
        }
    }
    StoreError::from(error)
}

#[async_trait]
impl AccountRepository for PgStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (username, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(classify_insert_error)?;
        Ok(account)
    }

    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE username = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_account_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn insert_task(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, status, due_date, owner_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(
        &self,
        owner_id: i64,
        page: Page,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE owner_id = $1 AND ($2::task_status IS NULL OR status = $2) \
             ORDER BY id OFFSET $3 LIMIT $4",
            TASK_COLUMNS
        ))
        .bind(owner_id)
        .bind(status)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find_task(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let saved = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = $1, description = $2, status = $3, due_date = $4 \
             WHERE id = $5 AND owner_id = $6 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.id)
        .bind(task.owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete_task(&self, task_id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
