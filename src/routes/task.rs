//! Task routes under `/v1/task`.

use crate::handlers::task::{create, delete, find_one, list, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn task_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/task", get(list).post(create).put(update))
        .route("/v1/task/:task_id", get(find_one).delete(delete))
        .with_state(state)
}
