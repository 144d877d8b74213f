//! In-memory, document-style task store.

use std::sync::Arc;

use async_trait::async_trait;
use entities::{NewTask, Task, TaskUpdate};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{TaskFilter, TaskStore, TaskStoreError, TaskStoreResult};

/// In-memory task store.
///
/// Records are kept as whole documents in insertion order. Like a document
/// database it does not maintain `updated_at`.
#[derive(Debug, Default, Clone)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl MemoryTaskStore {
    /// Creates a new in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let task = Task::create(task)?;
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        // Newest insertion first, so the stable sort breaks timestamp ties the
        // same way the relational store does.
        let mut result: Vec<Task> = tasks
            .iter()
            .rev()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))?;
        let updated = slot.apply(update)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_task(&self, id: Uuid) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        }
        Ok(())
    }
}
