use serde::{Deserialize, Serialize};

use super::resource::ResourceKind;

/// A normalized search hit from one of the upstream sources.
///
/// Videos carry a `thumbnail`, articles and documents carry a `snippet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub source: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Aggregated response of `GET /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub videos: Vec<SearchResource>,
    pub articles: Vec<SearchResource>,
    pub documents: Vec<SearchResource>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.videos.len() + self.articles.len() + self.documents.len()
    }
}
