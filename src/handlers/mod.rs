pub mod auth_handlers;
pub mod roadmap_handlers;
pub mod search_handlers;

pub use auth_handlers::{login_handler, register_handler};
pub use roadmap_handlers::{my_roadmap_handler, save_resource_handler};
pub use search_handlers::{home_handler, search_handler};

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

/// Unwrap a JSON body, turning extractor rejections into 400 `{"error"}`
/// responses instead of axum's plain-text ones.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}
