//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Origins allowed when PAGEMARK_CORS_ORIGINS is unset
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

fn cors_layer() -> CorsLayer {
    // PAGEMARK_CORS_ORIGINS can be comma-separated list of origins, or "*" for any
    let origins = match std::env::var("PAGEMARK_CORS_ORIGINS").ok() {
        Some(origins) if origins == "*" => AllowOrigin::any(),
        Some(origins) => AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ),
        None => AllowOrigin::list(DEV_ORIGINS.into_iter().map(HeaderValue::from_static)),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Document endpoints
        .route(
            "/documents",
            get(handlers::list_documents).post(handlers::upload_document),
        )
        .route(
            "/documents/:id",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        // Layout endpoints
        .route("/documents/:id/layout", get(handlers::get_layout))
        .route("/documents/:id/pages/:index", get(handlers::get_page))
        // Progress endpoints; POST is the page-unload beacon path
        .route(
            "/documents/:id/progress",
            get(handlers::get_progress)
                .put(handlers::save_progress)
                .post(handlers::save_progress),
        )
        // SSE endpoint
        .route("/sync", get(handlers::sync_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
