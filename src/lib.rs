pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use config::AppConfig;
use repositories::{SqliteResourceRepository, SqliteUserRepository};
use services::{
    build_http_client, AuthService, DuckDuckGoFetcher, FetchError, RoadmapService,
    SearchService, TokenService, UserService, YouTubeFetcher,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub search_service: Arc<SearchService>,
    pub roadmap_service: Arc<RoadmapService>,
}

impl AppState {
    /// Wire repositories, services and upstream fetchers from configuration.
    pub fn from_config(pool: sqlx::SqlitePool, config: &AppConfig) -> Result<Self, FetchError> {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let resource_repository = Arc::new(SqliteResourceRepository::new(pool));

        let token_service = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl));
        let user_service = Arc::new(UserService::new(user_repository.clone()));
        let auth_service = Arc::new(AuthService::new(
            user_repository.clone(),
            token_service.clone(),
        ));
        let roadmap_service = Arc::new(RoadmapService::new(resource_repository));
        let search_service = Arc::new(build_search_service(config)?);

        Ok(Self {
            user_service,
            auth_service,
            token_service,
            search_service,
            roadmap_service,
        })
    }
}

/// One HTTP client per fetcher, each with the configured per-call timeout.
pub fn build_search_service(config: &AppConfig) -> Result<SearchService, FetchError> {
    let videos = YouTubeFetcher::new(
        build_http_client(config.fetch_timeout)?,
        config.youtube_api_base.clone(),
        config.youtube_api_key.clone(),
        config.search_max_results,
    );
    let articles = DuckDuckGoFetcher::articles(
        build_http_client(config.fetch_timeout)?,
        config.duckduckgo_base.clone(),
        config.search_max_results,
    );
    let documents = DuckDuckGoFetcher::documents(
        build_http_client(config.fetch_timeout)?,
        config.duckduckgo_base.clone(),
        config.search_max_results,
    );

    Ok(SearchService::new(
        Arc::new(videos),
        Arc::new(articles),
        Arc::new(documents),
        config.search_budget,
    ))
}
