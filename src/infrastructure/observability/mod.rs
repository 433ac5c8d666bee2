//! Observability infrastructure - Tracing, Metrics, and Logging

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig, LATENCY_BUCKETS};
pub use metrics::{
    create_metrics_router, init_metrics, record_api_request, record_http_request,
    record_prediction, record_rate_limit_rejection, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
