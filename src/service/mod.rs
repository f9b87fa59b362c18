//! Task use cases and their PostgreSQL repository.

mod repository;
mod task;
pub use repository::{PgTaskRepository, TaskRepository};
pub use task::{TaskService, DEFAULT_LIMIT, MAX_LIMIT};

#[cfg(test)]
pub(crate) use repository::memory;
