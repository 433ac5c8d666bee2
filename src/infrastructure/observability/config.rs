//! Settings for the `[observability]` section

use serde::Deserialize;

/// Upper bounds, in seconds, of the latency histogram buckets
pub const LATENCY_BUCKETS: [f64; 8] = [0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0];

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP span export; off unless a collector is configured
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    pub otlp_endpoint: String,
    pub service_name: String,
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

impl TracingConfig {
    /// Sampling ratio clamped to `[0, 1]`; a NaN ratio samples nothing
    pub fn effective_sampling_ratio(&self) -> f64 {
        if self.sampling_ratio.is_nan() {
            0.0
        } else {
            self.sampling_ratio.clamp(0.0, 1.0)
        }
    }
}

/// Prometheus exposition
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the text exposition
    pub path: String,
    /// Bucket bounds shared by the request and inference latency histograms
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
            latency_buckets: LATENCY_BUCKETS.to_vec(),
        }
    }
}

impl MetricsConfig {
    /// The configured path with exactly one leading slash, as axum routes require
    pub fn route(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> ObservabilityConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_section_uses_defaults() {
        let config = parse("");

        assert!(!config.tracing.enabled);
        assert_eq!(config.tracing.service_name, "secure-ml-api");
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.route(), "/metrics");
        assert_eq!(config.metrics.latency_buckets, LATENCY_BUCKETS.to_vec());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse(
            r#"
            [tracing]
            enabled = true

            [metrics]
            path = "prom"
            "#,
        );

        assert!(config.tracing.enabled);
        assert_eq!(config.tracing.otlp_endpoint, "http://localhost:4317");
        assert_eq!(config.metrics.route(), "/prom");
        assert_eq!(config.metrics.latency_buckets.len(), 8);
    }

    #[test]
    fn test_sampling_ratio_is_clamped() {
        let mut tracing = TracingConfig {
            sampling_ratio: 4.0,
            ..Default::default()
        };
        assert_eq!(tracing.effective_sampling_ratio(), 1.0);

        tracing.sampling_ratio = -0.5;
        assert_eq!(tracing.effective_sampling_ratio(), 0.0);

        tracing.sampling_ratio = f64::NAN;
        assert_eq!(tracing.effective_sampling_ratio(), 0.0);

        tracing.sampling_ratio = 0.3;
        assert_eq!(tracing.effective_sampling_ratio(), 0.3);
    }
}
