//! Task management API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use entities::{NewTask, Task, TaskPriority, TaskStatus, TaskUpdate};
use serde::Deserialize;
use task_store::{TaskFilter, TaskStore};

use crate::error::{ServerError, ServerResult};
use crate::services::task::DeleteConfirmation;
use crate::state::AppState;

/// Query parameters accepted when listing tasks.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Exact status to match.
    pub status: Option<String>,
    /// Exact priority to match.
    pub priority: Option<String>,
}

impl ListTasksQuery {
    /// Builds the store filter. Returns `None` when a value names no known
    /// variant, in which case no stored record can match.
    pub fn to_filter(&self) -> Option<TaskFilter> {
        let mut filter = TaskFilter::new();
        if let Some(status) = &self.status {
            filter = filter.with_status(TaskStatus::parse(status)?);
        }
        if let Some(priority) = &self.priority {
            filter = filter.with_priority(TaskPriority::parse(priority)?);
        }
        Some(filter)
    }
}

/// Body of a status-only update.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    /// Requested status, validated by the service.
    #[serde(default)]
    pub status: Option<String>,
}

/// Creates a new task.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Task>)> {
    let Json(payload) = payload?;
    let task = state.tasks.create_task(payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists tasks, newest first.
pub async fn list_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let Some(filter) = query.to_filter() else {
        return Ok(Json(Vec::new()));
    };

    let tasks = state
        .tasks
        .get_all_tasks(filter)
        .await
        .map_err(ServerError::internal)?;
    Ok(Json(tasks))
}

/// Gets a task by ID.
pub async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Task>> {
    let task = state.tasks.get_task_by_id(&id).await?;
    Ok(Json(task))
}

/// Applies a partial update to a task.
pub async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> ServerResult<Json<Task>> {
    let Json(payload) = payload?;
    let task = state.tasks.update_task(&id, payload).await?;
    Ok(Json(task))
}

/// Updates a task's status.
pub async fn update_task_status<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    request: Result<Json<UpdateTaskStatusRequest>, JsonRejection>,
) -> ServerResult<Json<Task>> {
    let Json(request) = request?;
    let status = request
        .status
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("Status not provided".to_string()))?;

    let task = state.tasks.update_task_status(&id, &status).await?;
    Ok(Json(task))
}

/// Deletes a task.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<DeleteConfirmation>> {
    let confirmation = state.tasks.delete_task(&id).await?;
    Ok(Json(confirmation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(ListTasksQuery::default().to_filter(), Some(TaskFilter::new()));
    }

    #[test]
    fn test_query_builds_exact_filter() {
        let query = ListTasksQuery {
            status: Some("in_progress".to_string()),
            priority: Some("low".to_string()),
        };
        assert_eq!(
            query.to_filter(),
            Some(
                TaskFilter::new()
                    .with_status(TaskStatus::InProgress)
                    .with_priority(TaskPriority::Low)
            )
        );
    }

    #[test]
    fn test_unknown_query_value_matches_nothing() {
        let query = ListTasksQuery {
            status: Some("archived".to_string()),
            priority: None,
        };
        assert_eq!(query.to_filter(), None);
    }
}
