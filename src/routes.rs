use crate::{handlers, middleware::require_bearer, AppState};
use axum::{
    http::header,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Assemble the HTTP API.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/save-resource", post(handlers::save_resource_handler))
        .route("/api/my-roadmap", get(handlers::my_roadmap_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let public_routes = Router::new()
        .route("/", get(handlers::home_handler))
        .route("/api/search", get(handlers::search_handler))
        .route("/api/register", post(handlers::register_handler))
        .route("/api/login", post(handlers::login_handler));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
