//! Task entity definitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{ValidationError, validate_description, validate_title};

/// Status of a Task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Done];

    /// Converts the status to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ValidationError::InvalidStatus(value))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a Task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Converts the priority to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a priority from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ValidationError::InvalidPriority(value))
    }
}

/// A task record as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned on creation.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Longer free-form description.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated. Only maintained by relational stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a new record from a creation payload, filling in defaults.
    ///
    /// The record gets a fresh id and `created_at`; `updated_at` is left for
    /// the store to set.
    pub fn create(new: NewTask) -> Result<Self, ValidationError> {
        new.validate()?;
        let NewTask {
            title,
            description,
            status,
            priority,
            due_date,
        } = new;
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.ok_or(ValidationError::TitleRequired)?,
            description,
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            due_date,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Returns a copy of this record with the supplied fields changed.
    ///
    /// `id`, `created_at` and `updated_at` are never touched.
    pub fn apply(&self, update: TaskUpdate) -> Result<Self, ValidationError> {
        let mut task = self.clone();
        if let Some(title) = update.title {
            task.title = title.ok_or(ValidationError::TitleRequired)?;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(status) = update.status {
            task.status = status.ok_or(ValidationError::StatusRequired)?;
        }
        if let Some(priority) = update.priority {
            task.priority = priority.ok_or(ValidationError::PriorityRequired)?;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        task.validate()?;
        Ok(task)
    }

    /// Checks the record against the schema constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(Some(&self.title))?;
        validate_description(self.description.as_deref())
    }
}

/// Client payload for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Required; kept optional here so a missing title is a validation
    /// error rather than a parse error.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to pending.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Defaults to medium.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Optional deadline.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates a payload with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Checks the payload against the schema constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(self.title.as_deref())?;
        validate_description(self.description.as_deref())
    }
}

/// Client payload for a partial update. Absent fields stay unchanged.
///
/// Every field distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`). A `null` clears `description` and `dueDate` and is rejected
/// for the required fields. Unknown fields such as `id` or `createdAt` are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// New title.
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    /// New description, or `Some(None)` to clear it.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    /// New status.
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<TaskStatus>>,
    /// New priority.
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Option<TaskPriority>>,
    /// New due date, or `Some(None)` to clear it.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    /// An update that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(Some(status)),
            ..Self::default()
        }
    }
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_task_creation_defaults() {
        let task = Task::create(NewTask::new("Write report")).unwrap();

        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.description, None);
        assert_eq!(task.updated_at, None);
    }

    #[test]
    fn test_task_creation_keeps_supplied_fields() {
        let due = Utc.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap();
        let task = Task::create(
            NewTask::new("Ship")
                .with_description("Release v1")
                .with_status(TaskStatus::InProgress)
                .with_priority(TaskPriority::High)
                .with_due_date(due),
        )
        .unwrap();

        assert_eq!(task.description.as_deref(), Some("Release v1"));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.due_date, Some(due));
    }

    #[test]
    fn test_task_creation_requires_title() {
        assert_eq!(
            Task::create(NewTask::default()),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            Task::create(NewTask::new("   ")),
            Err(ValidationError::TitleRequired)
        );
    }

    #[test]
    fn test_apply_changes_only_supplied_fields() {
        let task = Task::create(NewTask::new("Old").with_description("Keep me")).unwrap();
        let update = TaskUpdate {
            title: Some(Some("New".to_string())),
            ..TaskUpdate::default()
        };

        let updated = task.apply(update).unwrap();

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description.as_deref(), Some("Keep me"));
        assert_eq!(updated.status, TaskStatus::Pending);
    }

    #[test]
    fn test_apply_rejects_invalid_title() {
        let task = Task::create(NewTask::new("Old")).unwrap();
        let update = TaskUpdate {
            title: Some(Some(String::new())),
            ..TaskUpdate::default()
        };

        assert_eq!(task.apply(update), Err(ValidationError::TitleRequired));
    }

    #[test]
    fn test_apply_rejects_null_required_fields() {
        let task = Task::create(NewTask::new("Keep")).unwrap();

        let cases = [
            (r#"{"title":null}"#, ValidationError::TitleRequired),
            (r#"{"status":null}"#, ValidationError::StatusRequired),
            (r#"{"priority":null}"#, ValidationError::PriorityRequired),
        ];
        for (body, expected) in cases {
            let update: TaskUpdate = serde_json::from_str(body).unwrap();
            assert_eq!(task.apply(update), Err(expected), "{body}");
        }
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::create(NewTask::new("Wire format")).unwrap();
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["status"], "pending");
        assert_eq!(value["priority"], "medium");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("dueDate").is_some());
        assert!(value.get("updatedAt").is_none());
    }

    #[test]
    fn test_new_task_rejects_unknown_priority() {
        let err = serde_json::from_str::<NewTask>(r#"{"title":"A","priority":"urgent"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Priority must be low, medium or high"));
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: TaskUpdate =
            serde_json::from_str(r#"{"description":null,"id":"ignored"}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.due_date, None);
        assert_eq!(update.title, None);

        let update: TaskUpdate = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert_eq!(update.title, Some(None));
    }
}
