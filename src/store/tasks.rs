use std::sync::Arc;

use crate::models::{NewTask, Page, Task, TaskPatch, TaskStatus};

use super::{StoreError, TaskRepository};

/// Owner-scoped task operations.
///
/// A task that exists under another owner is indistinguishable from one that does not
/// exist at all: every method answers `None`/`false` for both.
#[derive(Clone)]
pub struct TaskStore {
    repo: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError> {
        self.repo.insert_task(owner_id, task).await
    }

    pub async fn list(
        &self,
        owner_id: i64,
        page: Page,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError> {
        self.repo.list_tasks(owner_id, page, status).await
    }

    pub async fn get_one(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>, StoreError> {
        self.repo.find_task(task_id, owner_id).await
    }

    /// Merges `patch` into the owner's task and persists it.
    /// Nothing is written when the lookup comes back empty.
    pub async fn update(
        &self,
        task_id: i64,
        owner_id: i64,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        let Some(mut task) = self.repo.find_task(task_id, owner_id).await? else {
            return Ok(None);
        };

        patch.apply(&mut task);
        self.repo.save_task(&task).await
    }

    pub async fn delete(&self, task_id: i64, owner_id: i64) -> Result<bool, StoreError> {
        self.repo.delete_task(task_id, owner_id).await
    }
}
