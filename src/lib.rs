// src/lib.rs
// Public library surface for the server binary, the CLI demo, and integration tests.

pub mod api;
pub mod archetype;
pub mod config;
pub mod content;
pub mod oracle;
pub mod prompt;
pub mod reading;
pub mod selector;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::OracleConfig;
pub use crate::oracle::{Consultation, OracleResponse, OracleService};

/// Build the full router from environment configuration (no sockets opened).
///
/// Used by the Shuttle entrypoint and by tests that exercise the env-driven setup:
/// ```ignore
/// let app = oracolo::app().await?;
/// ```
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = OracleConfig::load()?;
    let oracle = OracleService::from_config(&cfg)?;
    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        providers = ?oracle.cascade().provider_names(),
        "oracle service ready"
    );
    Ok(api::router(AppState::new(oracle)))
}
