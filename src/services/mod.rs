pub mod auth_service;
pub mod fetcher;
pub mod roadmap_service;
pub mod search_service;
pub mod token_service;
pub mod user_service;
pub mod video_service;
pub mod web_search_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use fetcher::{build_http_client, FetchError, ResourceFetcher};
pub use roadmap_service::{RoadmapService, RoadmapServiceError};
pub use search_service::SearchService;
pub use token_service::{TokenError, TokenService};
pub use user_service::{CreateUserRequest, UserService, UserServiceError};
pub use video_service::YouTubeFetcher;
pub use web_search_service::DuckDuckGoFetcher;
