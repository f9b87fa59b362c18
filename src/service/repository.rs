//! Task persistence: find queries assembled from [`QueryParams`], writes built by the record mapper with bound values.

use crate::error::AppError;
use crate::sql::{parse_fields, prepare_find_query, QueryParams};
use crate::task::{self, Task};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_one(&self, params: QueryParams) -> Result<Task, AppError>;
    async fn find_many(&self, params: QueryParams) -> Result<Vec<Task>, AppError>;
    /// Inserts the task's non-zero fields. Returns the new id.
    async fn create(&self, task: &Task) -> Result<i64, AppError>;
    /// Sets the task's non-zero fields (except `id`) on the row with its id.
    async fn update(&self, task: &Task) -> Result<(), AppError>;
    async fn delete(&self, task_id: i64) -> Result<(), AppError>;
}

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        PgTaskRepository { pool }
    }
}

fn find_query(mut params: QueryParams) -> String {
    if params.select.is_empty() {
        params.select = task::DEFAULT_SELECT.to_string();
    }
    prepare_find_query(task::SELECT, &params)
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_one(&self, params: QueryParams) -> Result<Task, AppError> {
        let sql = find_query(params);
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, Task>(&sql)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("task".into()))
    }

    async fn find_many(&self, params: QueryParams) -> Result<Vec<Task>, AppError> {
        let sql = find_query(params);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Task>(&sql).fetch_all(&self.pool).await?)
    }

    async fn create(&self, task: &Task) -> Result<i64, AppError> {
        let fields = parse_fields(task, &[]);
        if fields.is_empty() {
            return Err(AppError::Validation("task has no fields to insert".into()));
        }
        let sql = task::INSERT
            .replacen('?', &fields.column_list(), 1)
            .replacen('?', &fields.placeholders(1), 1);
        tracing::debug!(sql = %sql, params = ?fields.values(), "query");
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in fields.into_values() {
            query = query.bind(value);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn update(&self, task: &Task) -> Result<(), AppError> {
        let fields = parse_fields(task, &["id"]);
        if fields.is_empty() {
            return Err(AppError::Validation("task has no fields to update".into()));
        }
        let sql = task::UPDATE.replacen('?', &fields.assignments(2), 1);
        tracing::debug!(sql = %sql, id = task.id, params = ?fields.values(), "query");
        let mut query = sqlx::query(&sql).bind(task.id);
        for value in fields.into_values() {
            query = query.bind(value);
        }
        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("task {}", task.id)));
        }
        Ok(())
    }

    async fn delete(&self, task_id: i64) -> Result<(), AppError> {
        tracing::debug!(sql = %task::DELETE, id = task_id, "query");
        let result = sqlx::query(task::DELETE).bind(task_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("task {}", task_id)));
        }
        Ok(())
    }
}

/// In-memory repository for handler and service tests. Understands only `t.id = <n>` predicates.
/// Updates skip empty fields the way the mapper leaves zero values out of the SET list.
#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryTaskRepository {
        tasks: Mutex<BTreeMap<i64, Task>>,
        queries: Mutex<Vec<QueryParams>>,
        broken: bool,
    }

    impl MemoryTaskRepository {
        pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
            let repo = MemoryTaskRepository::default();
            repo.tasks.lock().unwrap().extend(tasks.into_iter().map(|t| (t.id, t)));
            repo
        }

        /// Every call fails like a lost database connection.
        pub fn broken() -> Self {
            MemoryTaskRepository { broken: true, ..Default::default() }
        }

        pub fn queries(&self) -> Vec<QueryParams> {
            self.queries.lock().unwrap().clone()
        }

        pub fn get(&self, id: i64) -> Option<Task> {
            self.tasks.lock().unwrap().get(&id).cloned()
        }

        fn check(&self) -> Result<(), AppError> {
            if self.broken {
                return Err(AppError::Db(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    fn id_filter(params: &QueryParams) -> Option<i64> {
        params.where_clause.strip_prefix("t.id = ")?.parse().ok()
    }

    #[async_trait]
    impl TaskRepository for MemoryTaskRepository {
        async fn find_one(&self, params: QueryParams) -> Result<Task, AppError> {
            self.check()?;
            self.queries.lock().unwrap().push(params.clone());
            id_filter(&params)
                .and_then(|id| self.get(id))
                .ok_or_else(|| AppError::NotFound("task".into()))
        }

        async fn find_many(&self, params: QueryParams) -> Result<Vec<Task>, AppError> {
            self.check()?;
            self.queries.lock().unwrap().push(params.clone());
            let limit = if params.limit == 0 { usize::MAX } else { params.limit as usize };
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .values()
                .skip(params.offset as usize)
                .take(limit)
                .cloned()
                .collect())
        }

        async fn create(&self, task: &Task) -> Result<i64, AppError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            let id = tasks.keys().next_back().copied().unwrap_or(0) + 1;
            tasks.insert(id, Task { id, ..task.clone() });
            Ok(id)
        }

        async fn update(&self, task: &Task) -> Result<(), AppError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            let row = tasks
                .get_mut(&task.id)
                .ok_or_else(|| AppError::NotFound(format!("task {}", task.id)))?;
            if !task.title.is_empty() {
                row.title = task.title.clone();
            }
            if !task.description.is_empty() {
                row.description = task.description.clone();
            }
            Ok(())
        }

        async fn delete(&self, task_id: i64) -> Result<(), AppError> {
            self.check()?;
            self.tasks
                .lock()
                .unwrap()
                .remove(&task_id)
                .map(|_| ())
                .ok_or_else(|| AppError::NotFound(format!("task {}", task_id)))
        }
    }
}
