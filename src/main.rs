//! Oracolo: Binary Entrypoint
//! Boots the Axum HTTP server through Shuttle, wiring config, the reading cascade and routes.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    oracolo::telemetry::init_tracing();

    let router = oracolo::app().await?;
    Ok(router.into())
}
