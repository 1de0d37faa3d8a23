mod handlers;
pub mod middleware;

use axum::{http::HeaderValue, middleware::from_fn_with_state, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use factgraph_core::CachedGraph;

pub use middleware::{RateLimiter, ServeConfig};

/// Read-only API over the content graph with no CORS restriction or rate limit.
pub fn create_router(graph: CachedGraph) -> Router {
    create_router_with_config(graph, ServeConfig::disabled())
}

pub fn create_router_with_config(graph: CachedGraph, config: ServeConfig) -> Router {
    let mut api: Router<CachedGraph> = Router::new()
        // Tags
        .route("/tags", get(handlers::list_tags))
        .route("/tags/{id}/nodes", get(handlers::list_tag_nodes))
        // Nodes
        .route("/nodes", get(handlers::list_nodes))
        .route("/nodes/{id}", get(handlers::get_node))
        .route("/nodes/{id}/connections", get(handlers::list_connections))
        .route("/nodes/{id}/backlinks", get(handlers::list_backlinks))
        .route("/nodes/{id}/related", get(handlers::list_related))
        // Whole-graph views
        .route("/graph", get(handlers::export_graph))
        .route("/timeline", get(handlers::timeline))
        .route("/connection-types", get(handlers::list_connection_types))
        .route("/validation", get(handlers::validation))
        // Health
        .route("/health", get(handlers::health));

    if let Some(limiter) = config.rate_limiter.clone() {
        api = api.layer(from_fn_with_state(limiter, middleware::rate_limit_middleware));
    }

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config)),
        )
        .with_state(graph)
}

fn cors_layer(config: &ServeConfig) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new().allow_origin(AllowOrigin::list(origins))
        }
        None => CorsLayer::permissive(),
    }
}
