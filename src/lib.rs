//! Task API: a small CRUD service over PostgreSQL whose write queries are
//! assembled by mapping record fields to SQL columns and values.

pub mod case;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod task;

pub use case::to_snake_case;
pub use config::Config;
pub use error::{AppError, ConfigError, MappingError};
pub use response::GenericResponse;
pub use routes::app;
pub use service::{PgTaskRepository, TaskRepository, TaskService};
pub use state::AppState;
pub use store::{connect, ensure_tasks_table, seed_tasks, SeedOutcome};
pub use task::Task;
