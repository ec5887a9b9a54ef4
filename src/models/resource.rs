use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Article,
    Document,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Article => "article",
            ResourceKind::Document => "document",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(ResourceKind::Video),
            "article" => Ok(ResourceKind::Article),
            "document" => Ok(ResourceKind::Document),
            other => Err(format!(
                "Unknown resource type '{}', expected video, article or document",
                other
            )),
        }
    }
}

/// Validated input for the upsert-and-link operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    pub kind: ResourceKind,
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Body of `POST /api/save-resource`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveResourcePayload {
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub source: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// One item of `GET /api/my-roadmap`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RoadmapEntry {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub source: Option<String>,
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_parses_case_insensitively() {
        assert_eq!("Video".parse::<ResourceKind>(), Ok(ResourceKind::Video));
        assert_eq!(" article ".parse::<ResourceKind>(), Ok(ResourceKind::Article));
        assert_eq!("DOCUMENT".parse::<ResourceKind>(), Ok(ResourceKind::Document));
        assert!("podcast".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_resource_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ResourceKind::Document).unwrap();
        assert_eq!(json, "\"document\"");
    }
}
