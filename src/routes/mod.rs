//! Router assembly: common and task routes plus the cross-cutting layers.

mod common;
mod task;

pub use common::common_routes;
pub use task::task_routes;

use crate::config::Config;
use crate::state::AppState;
use axum::{
    http::{header::HeaderValue, Method, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Request bodies above this size are rejected with 413.
pub const BODY_LIMIT: usize = 1 << 20;

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": "endpoint not found" })),
    )
}

fn cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                        None
                    }
                }),
        )
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Full application router.
pub fn app(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(task_routes(state))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(cors(&config.cors.allowed_origins));
    if config.api.request_log {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
