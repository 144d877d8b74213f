//! Application state.

use std::sync::Arc;

use task_store::TaskStore;

use crate::services::task::TaskService;

/// Shared application state.
pub struct AppState<S: TaskStore> {
    /// Task service.
    pub tasks: TaskService<S>,
}

impl<S: TaskStore> AppState<S> {
    /// Creates new application state.
    pub fn new(store: S) -> Self {
        Self {
            tasks: TaskService::new(store),
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from a store.
pub fn create_shared_state<S: TaskStore>(store: S) -> SharedState<S> {
    Arc::new(AppState::new(store))
}
