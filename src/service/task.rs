//! Task use cases on top of a [`TaskRepository`].

use super::repository::TaskRepository;
use crate::error::AppError;
use crate::sql::QueryParams;
use crate::task::Task;
use std::sync::Arc;

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        TaskService { repository }
    }

    fn by_id(task_id: i64) -> QueryParams {
        QueryParams {
            where_clause: format!("t.id = {}", task_id),
            ..Default::default()
        }
    }

    pub async fn find_one(&self, task_id: i64) -> Result<Task, AppError> {
        self.repository.find_one(Self::by_id(task_id)).await
    }

    /// Tasks ordered by id. Limit defaults to 100 and is capped at 1000; offset must fit a BIGINT.
    pub async fn find_many(&self, limit: Option<u64>, offset: Option<u64>) -> Result<Vec<Task>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0);
        if i64::try_from(offset).is_err() {
            return Err(AppError::BadRequest(format!("offset {} is out of range", offset)));
        }
        self.repository
            .find_many(QueryParams {
                order_by: "t.id".into(),
                offset,
                limit,
                ..Default::default()
            })
            .await
    }

    pub async fn create(&self, task: &Task) -> Result<i64, AppError> {
        let id = self.repository.create(task).await?;
        tracing::info!(task_id = id, "task created");
        Ok(id)
    }

    pub async fn update(&self, task: &Task) -> Result<(), AppError> {
        self.repository.update(task).await?;
        tracing::info!(task_id = task.id, "task updated");
        Ok(())
    }

    /// Deletes an existing task; an unknown id is reported as not found before anything is deleted.
    pub async fn delete(&self, task_id: i64) -> Result<(), AppError> {
        self.repository.find_one(Self::by_id(task_id)).await?;
        self.repository.delete(task_id).await?;
        tracing::info!(task_id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::repository::memory::MemoryTaskRepository;

    fn task(id: i64, title: &str) -> Task {
        Task { id, title: title.into(), description: String::new(), updated_at: None }
    }

    fn service(repo: &Arc<MemoryTaskRepository>) -> TaskService {
        TaskService::new(repo.clone())
    }

    #[tokio::test]
    async fn find_one_filters_by_id() {
        let repo = Arc::new(MemoryTaskRepository::with_tasks([task(7, "seven")]));
        let found = service(&repo).find_one(7).await.unwrap();
        assert_eq!(found.title, "seven");
        assert_eq!(repo.queries()[0].where_clause, "t.id = 7");
        assert!(repo.queries()[0].select.is_empty());
    }

    #[tokio::test]
    async fn find_many_orders_and_paginates() {
        let repo = Arc::new(MemoryTaskRepository::with_tasks((1..=5).map(|i| task(i, "t"))));
        let svc = service(&repo);

        let page = svc.find_many(Some(2), Some(1)).await.unwrap();
        assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), [2, 3]);

        svc.find_many(None, None).await.unwrap();
        svc.find_many(Some(5000), None).await.unwrap();
        let queries = repo.queries();
        assert_eq!(queries[0].order_by, "t.id");
        assert_eq!((queries[0].limit, queries[0].offset), (2, 1));
        assert_eq!(queries[1].limit, DEFAULT_LIMIT);
        assert_eq!(queries[2].limit, MAX_LIMIT);
    }

    #[tokio::test]
    async fn find_many_rejects_offset_beyond_bigint() {
        let repo = Arc::new(MemoryTaskRepository::default());
        let err = service(&repo).find_many(None, Some(i64::MAX as u64 + 1)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(repo.queries().is_empty());

        service(&repo).find_many(None, Some(i64::MAX as u64)).await.unwrap();
    }

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let repo = Arc::new(MemoryTaskRepository::default());
        let err = service(&repo).delete(9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_existing_task() {
        let repo = Arc::new(MemoryTaskRepository::with_tasks([task(1, "one")]));
        service(&repo).delete(1).await.unwrap();
        assert!(repo.get(1).is_none());
    }

    #[tokio::test]
    async fn create_then_update() {
        let repo = Arc::new(MemoryTaskRepository::default());
        let svc = service(&repo);
        let id = svc.create(&task(0, "draft")).await.unwrap();
        svc.update(&Task { id, title: "final".into(), ..Default::default() }).await.unwrap();
        assert_eq!(repo.get(id).map(|t| t.title), Some("final".to_string()));
    }
}
