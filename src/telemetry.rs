// src/telemetry.rs
//! Tracing setup, the Prometheus recorder, and log-safe identifiers.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "oracolo=info,tower_http=info,warn";
pub const ENV_LOG_FORMAT: &str = "ORACLE_LOG_FORMAT";

/// Install the global subscriber. `RUST_LOG` overrides the default filter,
/// `ORACLE_LOG_FORMAT=json` switches to JSON lines.
///
/// A no-op when a subscriber is already installed (e.g. by the hosting runtime).
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe the oracle series.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| -> anyhow::Result<PrometheusHandle> {
                let handle = PrometheusBuilder::new().install_recorder()?;
                describe_counter!(
                    "oracle_requests_total",
                    "Oracle requests by outcome (ok, bad_request, error)."
                );
                describe_counter!(
                    "oracle_reading_source_total",
                    "Readings served, by the strategy that produced them."
                );
                describe_counter!(
                    "oracle_provider_failures_total",
                    "Reading provider failures that advanced the cascade."
                );
                describe_histogram!(
                    "oracle_consult_ms",
                    "Consultation time in milliseconds, content load included."
                );
                Ok(handle)
            })?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Short anonymized id for a question. Raw questions never go to the logs.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
