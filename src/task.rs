//! Task record and the SQL templates used to read and write it.

use chrono::NaiveDateTime;

/// Row of the `tasks` table.
#[derive(Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDateTime>,
}

crate::record!(Task { id, title, description, updated_at: optional });

/// Select list used when a find query does not name one.
pub const DEFAULT_SELECT: &str = "t.*";

pub const COUNT: &str = "SELECT count(*) FROM tasks";

pub const SELECT: &str = "SELECT ? FROM tasks t";

pub const INSERT: &str = "INSERT INTO tasks (?) VALUES (?) RETURNING id";

pub const INSERT_MANY: &str = "INSERT INTO tasks (?) VALUES ?";

pub const UPDATE: &str = "UPDATE tasks SET ?, updated_at = CURRENT_TIMESTAMP WHERE id = $1";

pub const DELETE: &str = "DELETE FROM tasks WHERE id = $1";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{parse_fields_to_insert_query, parse_fields_to_update_query};

    #[test]
    fn new_task_writes_title_and_description_only() {
        let t = Task { title: "Ship".into(), description: "v1".into(), ..Default::default() };
        assert_eq!(
            parse_fields_to_insert_query(&t, &[]),
            ("title, description".to_string(), "$$Ship$$, $$v1$$".to_string())
        );
    }

    #[test]
    fn updated_at_is_never_written() {
        let t = Task {
            id: 3,
            title: "Ship".into(),
            description: String::new(),
            updated_at: Some(chrono::Utc::now().naive_utc()),
        };
        assert_eq!(parse_fields_to_update_query(&t, &["id"]), "title = $$Ship$$");
    }
}
