use crate::error::Result;
use crate::handlers::json_body;
use crate::middleware::AuthenticatedUser;
use crate::models::{MessageResponse, RoadmapEntry, SaveOutcome, SaveResourcePayload};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};

pub async fn save_resource_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<SaveResourcePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let payload = json_body(payload)?;

    let response = match state
        .roadmap_service
        .save_resource(user.user_id, payload)
        .await?
    {
        SaveOutcome::Saved => (
            StatusCode::CREATED,
            Json(MessageResponse::new("Resource saved successfully")),
        ),
        SaveOutcome::AlreadySaved => (
            StatusCode::OK,
            Json(MessageResponse::new("Resource already saved")),
        ),
    };
    Ok(response)
}

pub async fn my_roadmap_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<RoadmapEntry>>> {
    let entries = state.roadmap_service.roadmap(user.user_id).await?;
    Ok(Json(entries))
}
