use crate::models::resource::{
    NewResource, ResourceKind, RoadmapEntry, SaveOutcome, SaveResourcePayload,
};
use crate::repositories::{RepositoryError, ResourceRepository};
use std::sync::Arc;
use tracing::info;

const MAX_TITLE_LEN: usize = 255;
const MAX_URL_LEN: usize = 500;
const MAX_SOURCE_LEN: usize = 100;
const MAX_THUMBNAIL_LEN: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum RoadmapServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RoadmapService {
    repository: Arc<dyn ResourceRepository>,
}

impl RoadmapService {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    pub async fn save_resource(
        &self,
        user_id: i64,
        payload: SaveResourcePayload,
    ) -> Result<SaveOutcome, RoadmapServiceError> {
        let resource = validate_payload(payload)?;

        match self.repository.save_for_user(user_id, &resource).await {
            Ok(outcome) => {
                info!(user_id, url = %resource.url, ?outcome, "resource saved to roadmap");
                Ok(outcome)
            }
            Err(RepositoryError::NotFound) => Err(RoadmapServiceError::UserNotFound),
            Err(e) => Err(RoadmapServiceError::RepositoryError(e)),
        }
    }

    pub async fn roadmap(&self, user_id: i64) -> Result<Vec<RoadmapEntry>, RoadmapServiceError> {
        Ok(self.repository.list_saved(user_id).await?)
    }
}

/// Turn a raw save request into a storable resource.
///
/// `url`, `title` and `type` are required. Blank optional fields are stored as
/// NULL.
pub fn validate_payload(payload: SaveResourcePayload) -> Result<NewResource, RoadmapServiceError> {
    let url = required("url", payload.url)?;
    let title = required("title", payload.title)?;
    let kind: ResourceKind = required("type", payload.kind)?
        .parse()
        .map_err(RoadmapServiceError::Validation)?;
    let source = optional(payload.source);
    let thumbnail_url = optional(payload.thumbnail);

    check_len("url", &url, MAX_URL_LEN)?;
    check_len("title", &title, MAX_TITLE_LEN)?;
    if let Some(source) = &source {
        check_len("source", source, MAX_SOURCE_LEN)?;
    }
    if let Some(thumbnail) = &thumbnail_url {
        check_len("thumbnail", thumbnail, MAX_THUMBNAIL_LEN)?;
    }

    Ok(NewResource {
        kind,
        title,
        url,
        source,
        thumbnail_url,
    })
}

fn required(field: &str, value: Option<String>) -> Result<String, RoadmapServiceError> {
    optional(value)
        .ok_or_else(|| RoadmapServiceError::Validation(format!("'{}' is required", field)))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), RoadmapServiceError> {
    if value.chars().count() > max {
        return Err(RoadmapServiceError::Validation(format!(
            "'{}' must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
