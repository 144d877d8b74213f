//! Task store trait definitions.

use async_trait::async_trait;
use entities::{NewTask, Task, TaskPriority, TaskStatus, TaskUpdate};
use uuid::Uuid;

use crate::TaskStoreResult;

/// Filter options for listing tasks. Every set field must match exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Filter by status.
    pub status: Option<TaskStatus>,
    /// Filter by priority.
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns true if the task satisfies every set field.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
    }
}

/// Trait for task storage operations.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Validates the payload and stores a new task with a fresh id.
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task>;

    /// Gets a task by ID.
    async fn get_task(&self, id: Uuid) -> TaskStoreResult<Option<Task>>;

    /// Lists tasks matching the filter, newest first.
    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Applies a partial update and returns the stored result.
    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> TaskStoreResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: Uuid) -> TaskStoreResult<()>;
}
