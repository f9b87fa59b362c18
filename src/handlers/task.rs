//! Task handlers: find one, list, create, update, delete.

use crate::error::AppError;
use crate::response::{success, success_empty};
use crate::state::AppState;
use crate::task::Task;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SingleTask {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Task> for SingleTask {
    fn from(t: Task) -> Self {
        SingleTask {
            id: t.id,
            title: t.title,
            description: t.description,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct CreatedTask {
    pub id: i64,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateTask {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct ListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

fn parse_task_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("invalid task id '{}'", raw))),
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

pub async fn find_one(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_task_id(&task_id)?;
    let task = state.tasks.find_one(id).await?;
    Ok(success(SingleTask::from(task)))
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let tasks = state.tasks.find_many(params.limit, params.offset).await?;
    Ok(success(tasks.into_iter().map(SingleTask::from).collect::<Vec<_>>()))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(payload)?;
    if req.title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    let task = Task {
        title: req.title,
        description: req.description,
        ..Default::default()
    };
    let id = state.tasks.create(&task).await?;
    Ok(success(CreatedTask { id }))
}

pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(payload)?;
    if req.id <= 0 {
        return Err(AppError::Validation("id is required".into()));
    }
    if req.title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    let task = Task {
        id: req.id,
        title: req.title,
        description: req.description,
        updated_at: None,
    };
    state.tasks.update(&task).await?;
    Ok(success_empty())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_task_id(&task_id)?;
    state.tasks.delete(id).await?;
    Ok(success_empty())
}
