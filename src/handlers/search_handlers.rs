use crate::error::{AppError, Result};
use crate::handlers::query_params;
use crate::models::SearchResults;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub topic: Option<String>,
}

pub async fn home_handler() -> &'static str {
    "Hello, the StudyMateHub server is running!"
}

pub async fn search_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResults>> {
    let query = query_params(query)?;
    let topic = query
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .ok_or_else(|| AppError::Validation("A 'topic' parameter is required.".to_string()))?;

    let results = state.search_service.search(topic).await;
    Ok(Json(results))
}
