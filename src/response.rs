//! Standard response envelope: `{"success": bool, "status": u16, "data": T | null}`.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct GenericResponse<T> {
    pub success: bool,
    pub status: u16,
    pub data: Option<T>,
}

impl<T> GenericResponse<T> {
    pub fn failure(status: StatusCode) -> Self {
        GenericResponse {
            success: false,
            status: status.as_u16(),
            data: None,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<GenericResponse<T>>) {
    (
        StatusCode::OK,
        Json(GenericResponse {
            success: true,
            status: StatusCode::OK.as_u16(),
            data: Some(data),
        }),
    )
}

/// 200 with `"data": null`.
pub fn success_empty() -> (StatusCode, Json<GenericResponse<()>>) {
    (
        StatusCode::OK,
        Json(GenericResponse {
            success: true,
            status: StatusCode::OK.as_u16(),
            data: None,
        }),
    )
}
