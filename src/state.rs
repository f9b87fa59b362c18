//! Shared application state for all routes.

use crate::service::{TaskRepository, TaskService};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Used by the readiness probe.
    pub pool: PgPool,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(pool: PgPool, repository: Arc<dyn TaskRepository>) -> Self {
        AppState {
            pool,
            tasks: TaskService::new(repository),
        }
    }
}
