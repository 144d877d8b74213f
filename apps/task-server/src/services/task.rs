//! Task service: the business rules between the HTTP handlers and the store.

use entities::{NewTask, Task, TaskStatus, TaskUpdate};
use serde::Serialize;
use task_store::{TaskFilter, TaskStore, TaskStoreError};
use uuid::Uuid;

/// Message returned after a successful delete.
pub const TASK_REMOVED: &str = "Task removed";

/// Errors raised by [`TaskService`].
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// No task with the given id.
    #[error("Task not found")]
    NotFound,

    /// A status-only update named a value outside the enumeration.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// The store rejected the operation.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: TaskStoreError,
    },
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Confirmation body for a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteConfirmation {
    /// Human-readable confirmation.
    pub message: String,
}

/// Wraps a store error with context, folding store-level "not found" into
/// [`TaskServiceError::NotFound`].
fn store_error(context: &'static str) -> impl FnOnce(TaskStoreError) -> TaskServiceError {
    move |source| {
        if source.is_not_found() {
            TaskServiceError::NotFound
        } else {
            TaskServiceError::Store { context, source }
        }
    }
}

/// Ids that do not parse cannot exist in any store.
fn parse_id(id: &str) -> TaskServiceResult<Uuid> {
    id.parse().map_err(|_| TaskServiceError::NotFound)
}

/// Service for managing tasks
pub struct TaskService<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a task from a client payload.
    pub async fn create_task(&self, payload: NewTask) -> TaskServiceResult<Task> {
        let task = self
            .store
            .create_task(payload)
            .await
            .map_err(store_error("Failed to create task"))?;

        tracing::info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Lists tasks matching the filter, newest first.
    pub async fn get_all_tasks(&self, filter: TaskFilter) -> TaskServiceResult<Vec<Task>> {
        self.store
            .list_tasks(filter)
            .await
            .map_err(store_error("Failed to list tasks"))
    }

    /// Gets a task by id.
    pub async fn get_task_by_id(&self, id: &str) -> TaskServiceResult<Task> {
        let id = parse_id(id)?;
        self.store
            .get_task(id)
            .await
            .map_err(store_error("Failed to fetch task"))?
            .ok_or(TaskServiceError::NotFound)
    }

    /// Applies a partial update to an existing task.
    pub async fn update_task(&self, id: &str, payload: TaskUpdate) -> TaskServiceResult<Task> {
        let existing = self.get_task_by_id(id).await?;

        let task = self
            .store
            .update_task(existing.id, payload)
            .await
            .map_err(store_error("Failed to update task"))?;

        tracing::info!(task_id = %task.id, "Task updated");
        Ok(task)
    }

    /// Changes only the status of a task.
    ///
    /// The value is checked against the enumeration before the store is
    /// touched, so a rejected status never changes the record.
    pub async fn update_task_status(&self, id: &str, status: &str) -> TaskServiceResult<Task> {
        let status = TaskStatus::parse(status)
            .ok_or_else(|| TaskServiceError::InvalidStatus(status.to_string()))?;

        let task = self.update_task(id, TaskUpdate::status(status)).await?;
        tracing::info!(task_id = %task.id, status = %status, "Task status changed");
        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: &str) -> TaskServiceResult<DeleteConfirmation> {
        let existing = self.get_task_by_id(id).await?;

        self.store
            .delete_task(existing.id)
            .await
            .map_err(store_error("Failed to delete task"))?;

        tracing::info!(task_id = %existing.id, "Task deleted");
        Ok(DeleteConfirmation {
            message: TASK_REMOVED.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use entities::{TaskPriority, ValidationError};
    use task_store::MemoryTaskStore;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn service() -> TaskService<MemoryTaskStore> {
        TaskService::new(MemoryTaskStore::new())
    }

    #[tokio::test]
    async fn test_create_fills_defaults() {
        let service = service();

        let task = assert_ok!(service.create_task(NewTask::new("Write docs")).await);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);

        let fetched = assert_ok!(service.get_task_by_id(&task.id.to_string()).await);
        assert_eq!(fetched, task);
    }

    #[tokio::test]
    async fn test_create_without_title_wraps_validation_message() {
        let service = service();

        let err = assert_err!(service.create_task(NewTask::default()).await);
        assert!(matches!(
            err,
            TaskServiceError::Store {
                source: TaskStoreError::Validation(ValidationError::TitleRequired),
                ..
            }
        ));
        assert_eq!(err.to_string(), "Failed to create task: Task title is required");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let service = service();
        let missing = Uuid::new_v4().to_string();

        for id in [missing.as_str(), "not-a-uuid"] {
            assert!(matches!(
                service.get_task_by_id(id).await,
                Err(TaskServiceError::NotFound)
            ));
            assert!(matches!(
                service.update_task(id, TaskUpdate::default()).await,
                Err(TaskServiceError::NotFound)
            ));
            assert!(matches!(
                service.delete_task(id).await,
                Err(TaskServiceError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn test_update_task_status() {
        let service = service();
        let task = service.create_task(NewTask::new("Move me")).await.unwrap();
        let id = task.id.to_string();

        for status in TaskStatus::ALL {
            let updated = assert_ok!(service.update_task_status(&id, status.as_str()).await);
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn test_invalid_status_leaves_record_unchanged() {
        let service = service();
        let task = service.create_task(NewTask::new("Stay")).await.unwrap();
        let id = task.id.to_string();

        for status in ["archived", "", "PENDING", "in progress"] {
            let err = assert_err!(service.update_task_status(&id, status).await);
            assert!(matches!(err, TaskServiceError::InvalidStatus(ref s) if s == status));
        }

        let fetched = service.get_task_by_id(&id).await.unwrap();
        assert_eq!(fetched.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_status_is_reported_before_lookup() {
        let service = service();

        let err = assert_err!(service.update_task_status("missing", "archived").await);
        assert!(matches!(err, TaskServiceError::InvalidStatus(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let task = service.create_task(NewTask::new("Remove")).await.unwrap();
        let id = task.id.to_string();

        let confirmation = assert_ok!(service.delete_task(&id).await);
        assert_eq!(confirmation.message, TASK_REMOVED);

        assert!(matches!(
            service.get_task_by_id(&id).await,
            Err(TaskServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_all_tasks_filters_by_status() {
        let service = service();
        let a = service.create_task(NewTask::new("A")).await.unwrap();
        let b = service.create_task(NewTask::new("B")).await.unwrap();
        let c = service.create_task(NewTask::new("C")).await.unwrap();
        service
            .update_task_status(&b.id.to_string(), "done")
            .await
            .unwrap();

        let pending = service
            .get_all_tasks(TaskFilter::new().with_status(TaskStatus::Pending))
            .await
            .unwrap();
        let ids: Vec<Uuid> = pending.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![c.id, a.id]);

        let all = service.get_all_tasks(TaskFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
