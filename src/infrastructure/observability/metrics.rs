//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use super::config::MetricsConfig;

/// Histograms rendered with explicit buckets rather than as summaries
const LATENCY_HISTOGRAMS: [&str; 2] = ["http_request_duration_seconds", "ml_prediction_seconds"];

/// The global recorder can be installed once per process; later callers share its handle
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig, model_version: &str) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let handle = PROMETHEUS_HANDLE
        .get_or_try_init(|| prometheus_builder(config)?.install_recorder());

    match handle {
        Ok(handle) => {
            register_default_metrics(model_version);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle.clone()),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Exporter builder with the configured latency buckets
fn prometheus_builder(config: &MetricsConfig) -> Result<PrometheusBuilder, BuildError> {
    LATENCY_HISTOGRAMS
        .iter()
        .try_fold(PrometheusBuilder::new(), |builder, name| {
            builder.set_buckets_for_metric(
                Matcher::Full(name.to_string()),
                &config.latency_buckets,
            )
        })
}

fn register_default_metrics(model_version: &str) {
    gauge!(
        "ml_api_info",
        "version" => env!("CARGO_PKG_VERSION"),
        "model_version" => model_version.to_string()
    )
    .set(1.0);
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("endpoint", endpoint.to_string()),
        ("status_code", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Count a request reaching an ML endpoint handler
pub fn record_api_request(method: &'static str, endpoint: &'static str) {
    counter!("ml_api_requests_total", "method" => method, "endpoint" => endpoint).increment(1);
}

/// Record a completed inference
pub fn record_prediction(duration: Duration) {
    histogram!("ml_prediction_seconds").record(duration.as_secs_f64());
    counter!("ml_predictions_total").increment(1);
}

/// Count a request denied by the rate limiter
pub fn record_rate_limit_rejection() {
    counter!("ml_rate_limit_rejections_total").increment(1);
}
