use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, header},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, config::ServerConfig, extractors::COMPANY_HEADER};

pub mod custom_report;
pub mod health;

/// Full application router, everything nested under `/api`
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(custom_report::router(&state));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(86400));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricted origins");
        cors.allow_origin(AllowOrigin::list(config.cors_origins.clone()))
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static(COMPANY_HEADER),
            ])
    }
}
