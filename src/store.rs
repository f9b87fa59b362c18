//! Connection pool, `tasks` table DDL and development seed data.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::sql::parse_array_fields_to_insert_query;
use crate::task::{self, Task};
use fake::faker::lorem::en::{Sentence, Words};
use fake::Fake;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Number of tasks generated by [`seed_tasks`].
pub const SEED_SIZE: usize = 10;

pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .database(&cfg.name)
        .username(&cfg.user)
        .password(&cfg.password)
        .ssl_mode(cfg.ssl_mode);
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .max_lifetime(cfg.max_lifetime)
        .connect_with(options)
        .await
}

/// Create the `tasks` table if it does not exist. `created_at` / `updated_at` are maintained by the database.
pub async fn ensure_tasks_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT now(),
            updated_at TIMESTAMP NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(u64),
    AlreadyPopulated,
}

/// Fill an (almost) empty `tasks` table with generated rows in one multi-row INSERT.
pub async fn seed_tasks(pool: &PgPool) -> Result<SeedOutcome, AppError> {
    let count: i64 = sqlx::query_scalar(task::COUNT).fetch_one(pool).await?;
    if count > 1 {
        return Ok(SeedOutcome::AlreadyPopulated);
    }
    let sql = seed_statement(&sample_tasks(SEED_SIZE))?;
    tracing::debug!(sql = %sql, "seed");
    let inserted = sqlx::query(&sql).execute(pool).await?.rows_affected();
    Ok(SeedOutcome::Inserted(inserted))
}

fn seed_statement(tasks: &[Task]) -> Result<String, AppError> {
    let (columns, values) = parse_array_fields_to_insert_query(tasks, &["id"])?;
    Ok(task::INSERT_MANY
        .replacen('?', &columns, 1)
        .replacen('?', &values, 1))
}

fn sample_tasks(n: usize) -> Vec<Task> {
    (0..n)
        .map(|_| {
            let words: Vec<String> = Words(2..5).fake();
            Task {
                id: 0,
                title: words.join(" "),
                description: Sentence(4..10).fake(),
                updated_at: None,
            }
        })
        .collect()
}
