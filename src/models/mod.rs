pub mod auth;
pub mod resource;
pub mod search;
pub mod user;

pub use auth::{Claims, LoginPayload, MessageResponse, RegisterPayload, TokenResponse};
pub use resource::{NewResource, ResourceKind, RoadmapEntry, SaveOutcome, SaveResourcePayload};
pub use search::{SearchResource, SearchResults};
pub use user::User;
