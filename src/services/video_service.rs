//! Video lookup against the YouTube Data API v3.
//!
//! A lookup is two calls: `search` to find candidate video ids for a topic,
//! then `videos` to fetch titles, thumbnails and durations for those ids.
//! Videos of 70 seconds or less are dropped so that shorts never reach the
//! results.

use crate::models::resource::ResourceKind;
use crate::models::search::SearchResource;
use crate::services::fetcher::{ensure_success, FetchError, ResourceFetcher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Videos at or below this length are treated as short-form content.
pub const MIN_VIDEO_SECONDS: u64 = 70;

/// YouTube category id for "Education".
const EDUCATION_CATEGORY_ID: &str = "27";

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid")
});

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

impl Thumbnails {
    fn best_url(self) -> Option<String> {
        self.high
            .or(self.medium)
            .or(self.fallback)
            .map(|thumbnail| thumbnail.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

/// Parse a `PT#H#M#S` duration token into seconds.
///
/// Every component is optional. Tokens that do not start with `PT` (for
/// example day-long `P1DT...` live streams) return `None`.
pub fn parse_duration_secs(token: &str) -> Option<u64> {
    let captures = DURATION_PATTERN.captures(token)?;
    let component = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    Some(component(1) * 3600 + component(2) * 60 + component(3))
}

/// True when a video of this duration token belongs in the results.
pub fn is_long_enough(token: &str) -> bool {
    parse_duration_secs(token).is_some_and(|secs| secs > MIN_VIDEO_SECONDS)
}

#[derive(Clone)]
pub struct YouTubeFetcher {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    max_results: usize,
}

impl YouTubeFetcher {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        api_key: Option<String>,
        max_results: usize,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key,
            max_results,
        }
    }

    /// Run the search and details calls and normalize the surviving videos.
    #[instrument(skip(self), fields(source = "youtube"))]
    pub async fn search_videos(&self, topic: &str) -> Result<Vec<SearchResource>, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        let max_results = self.max_results.to_string();

        let response = self
            .client
            .get(format!("{}/search", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("relevanceLanguage", "en"),
                ("videoCategoryId", EDUCATION_CATEGORY_ID),
                ("q", topic),
                ("key", api_key),
            ])
            .send()
            .await?;
        ensure_success(&response)?;
        let search: SearchListResponse = response.json().await?;

        let video_ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if video_ids.is_empty() {
            debug!("search returned no video ids");
            return Ok(Vec::new());
        }

        let ids = video_ids.join(",");
        let response = self
            .client
            .get(format!("{}/videos", self.api_base))
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", ids.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?;
        ensure_success(&response)?;
        let details: VideoListResponse = response.json().await?;

        let videos: Vec<SearchResource> = details
            .items
            .into_iter()
            .filter(|item| is_long_enough(&item.content_details.duration))
            .map(|item| SearchResource {
                kind: ResourceKind::Video,
                source: "YouTube".to_string(),
                url: format!("https://www.youtube.com/watch?v={}", item.id),
                title: item.snippet.title,
                thumbnail: item.snippet.thumbnails.best_url(),
                snippet: None,
            })
            .collect();

        debug!(
            candidates = video_ids.len(),
            kept = videos.len(),
            "video lookup complete"
        );
        Ok(videos)
    }
}

#[async_trait]
impl ResourceFetcher for YouTubeFetcher {
    async fn fetch(&self, topic: &str) -> Vec<SearchResource> {
        match self.search_videos(topic).await {
            Ok(videos) => videos,
            Err(FetchError::MissingApiKey) => {
                warn!("YOUTUBE_API_KEY is not configured; skipping video lookup");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, topic, "Error fetching YouTube videos");
                Vec::new()
            }
        }
    }
}
