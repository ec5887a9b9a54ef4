use crate::models::search::{SearchResource, SearchResults};
use crate::services::fetcher::ResourceFetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

const MAX_BUDGET: Duration = Duration::from_secs(60 * 60);

/// Fans a topic out to the video, article and document sources.
///
/// Each source runs in its own task. A source that panics or misses the
/// shared deadline contributes an empty list; the others are still returned.
pub struct SearchService {
    videos: Arc<dyn ResourceFetcher>,
    articles: Arc<dyn ResourceFetcher>,
    documents: Arc<dyn ResourceFetcher>,
    budget: Duration,
}

impl SearchService {
    pub fn new(
        videos: Arc<dyn ResourceFetcher>,
        articles: Arc<dyn ResourceFetcher>,
        documents: Arc<dyn ResourceFetcher>,
        budget: Duration,
    ) -> Self {
        Self {
            videos,
            articles,
            documents,
            budget: budget.min(MAX_BUDGET),
        }
    }

    pub async fn search(&self, topic: &str) -> SearchResults {
        let deadline = Instant::now() + self.budget;

        let videos = spawn_fetch(&self.videos, topic);
        let articles = spawn_fetch(&self.articles, topic);
        let documents = spawn_fetch(&self.documents, topic);

        let (videos, articles, documents) = tokio::join!(
            settle("videos", videos, deadline),
            settle("articles", articles, deadline),
            settle("documents", documents, deadline),
        );

        let results = SearchResults {
            videos,
            articles,
            documents,
        };
        info!(
            topic,
            total = results.total(),
            videos = results.videos.len(),
            articles = results.articles.len(),
            documents = results.documents.len(),
            "search complete"
        );
        results
    }
}

fn spawn_fetch(
    fetcher: &Arc<dyn ResourceFetcher>,
    topic: &str,
) -> JoinHandle<Vec<SearchResource>> {
    let fetcher = Arc::clone(fetcher);
    let topic = topic.to_string();
    tokio::spawn(async move { fetcher.fetch(&topic).await })
}

async fn settle(
    source: &'static str,
    mut handle: JoinHandle<Vec<SearchResource>>,
    deadline: Instant,
) -> Vec<SearchResource> {
    match tokio::time::timeout_at(deadline, &mut handle).await {
        Ok(Ok(items)) => items,
        Ok(Err(e)) => {
            error!(source, error = %e, "fetch task failed");
            Vec::new()
        }
        Err(_) => {
            handle.abort();
            warn!(source, "fetch did not finish within the search budget");
            Vec::new()
        }
    }
}
