use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::{health, model_info, predict, token};
use crate::config::AppConfig;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// Layers run outermost first: trace span, metrics timing, request logging.
/// The metrics route is merged after the layers so scrapes are not counted.
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    config: &AppConfig,
) -> Router {
    let mut router = Router::new()
        .route("/token", post(token::issue_token))
        .route("/health", get(health::health_check))
        .route("/predict", post(predict::predict))
        .route("/model/info", get(model_info::model_info))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, &config.observability.metrics.route()));
    }

    router.layer(cors_layer(&config.server.cors_allowed_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
