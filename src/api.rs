use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use crate::oracle::OracleService;
use crate::telemetry::Metrics;

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";
pub const SOURCE_HEADER: &str = "x-oracle-source";
pub const MISSING_QUESTION: &str = "Question is required";

#[derive(Clone)]
pub struct AppState {
    pub oracle: Arc<OracleService>,
}

impl AppState {
    pub fn new(oracle: OracleService) -> Self {
        Self {
            oracle: Arc::new(oracle),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/oracle", post(ask_oracle));

    if debug_routes_enabled() {
        match Metrics::init() {
            Ok(m) => app = app.merge(m.router()),
            Err(e) => warn!(error = %e, "metrics recorder unavailable; /metrics not mounted"),
        }
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn debug_routes_enabled() -> bool {
    std::env::var(ENV_DEBUG_ROUTES).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Question from a raw body; `None` unless the body is a JSON object whose
/// `question` is a non-blank string.
fn parse_question(body: &[u8]) -> Option<String> {
    let Value::Object(mut map) = serde_json::from_slice::<Value>(body).ok()? else {
        return None;
    };
    match map.remove("question")? {
        Value::String(q) if !q.trim().is_empty() => Some(q),
        _ => None,
    }
}

pub enum ApiError {
    MissingQuestion,
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingQuestion => {
                counter!("oracle_requests_total", "outcome" => "bad_request").increment(1);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": MISSING_QUESTION })),
                )
                    .into_response()
            }
            ApiError::Internal(err) => {
                counter!("oracle_requests_total", "outcome" => "error").increment(1);
                error!(error = ?err, "oracle consultation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal Server Error",
                        "details": format!("{err:#}"),
                        "stack": format!("{err:?}"),
                    })),
                )
                    .into_response()
            }
        }
    }
}

async fn ask_oracle(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let question = parse_question(&body).ok_or(ApiError::MissingQuestion)?;

    let consultation = state
        .oracle
        .consult(&question)
        .await
        .map_err(ApiError::Internal)?;

    counter!("oracle_requests_total", "outcome" => "ok").increment(1);
    Ok((
        [(SOURCE_HEADER, consultation.source)],
        Json(consultation.response),
    )
        .into_response())
}
