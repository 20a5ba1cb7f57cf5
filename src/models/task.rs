use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Largest page a single list request may return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Pending,
    /// Task is currently being worked on.
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    /// Task is completed.
    Completed,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, FromRow)]
pub struct Task {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the owning account. Always taken from the caller's identity.
    pub owner_id: i64,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
pub struct NewTask {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update of a task.
///
/// An absent field leaves the stored value untouched. For the optional columns an
/// explicit `null` clears the value, which is why they are doubly wrapped.
#[derive(Debug, Deserialize, Validate, Clone, Default)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<TaskStatus>>,

    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// Merges the supplied fields into `task`.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// A validated offset/limit window over an owner's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Result<Self, AppError> {
        if offset < 0 {
            return Err(AppError::BadRequest(
                "skip must be greater than or equal to 0".into(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_PAGE_SIZE,
        }
    }
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<TaskStatus>,
}

fn default_limit() -> i64 {
    MAX_PAGE_SIZE
}

impl ListQuery {
    pub fn page(&self) -> Result<Page, AppError> {
        Page::new(self.skip, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_task() -> Task {
        Task {
            id: 1,
            title: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
            status: Some(TaskStatus::Pending),
            due_date: Some(Utc::now()),
            owner_id: 1,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "In Progress"
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"Completed\"").unwrap(),
            TaskStatus::Completed
        );
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_new_task_validation() {
        let valid = NewTask {
            title: "Valid Task".to_string(),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let empty_title = NewTask::default();
        assert!(empty_title.validate().is_err());

        let long_description = NewTask {
            title: "Valid".to_string(),
            description: Some("b".repeat(1001)),
            ..Default::default()
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_patch_with_only_status_leaves_other_fields() {
        let original = sample_task();
        let mut task = original.clone();
        let patch: TaskPatch = serde_json::from_str(r#"{"status": "Completed"}"#).unwrap();

        patch.apply(&mut task);

        assert_eq!(task.status, Some(TaskStatus::Completed));
        assert_eq!(task.title, original.title);
        assert_eq!(task.description, original.description);
        assert_eq!(task.due_date, original.due_date);
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let mut task = sample_task();
        let patch: TaskPatch =
            serde_json::from_str(r#"{"description": null, "title": "Renamed"}"#).unwrap();

        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.status, None);
        patch.apply(&mut task);

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.description, None);
        assert_eq!(task.status, Some(TaskStatus::Pending));
    }

    #[test]
    fn test_patch_validation() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(patch.validate().is_err());

        let patch = TaskPatch {
            description: Some(Some("d".repeat(1001))),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        assert!(TaskPatch::default().validate().is_ok());
    }

    #[test]
    fn test_page_bounds() {
        assert!(Page::new(0, 1).is_ok());
        assert!(Page::new(10, MAX_PAGE_SIZE).is_ok());
        assert!(matches!(Page::new(-1, 10), Err(AppError::BadRequest(_))));
        assert!(matches!(Page::new(0, 0), Err(AppError::BadRequest(_))));
        assert!(matches!(
            Page::new(0, MAX_PAGE_SIZE + 1),
            Err(AppError::BadRequest(_))
        ));
    }
}
