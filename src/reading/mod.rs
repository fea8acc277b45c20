// src/reading/mod.rs
//! Reading providers: hosted model, local model, static fallback, and the cascade
//! that tries them in order.

pub mod cascade;
pub mod fallback;
pub mod hosted;
pub mod local;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::Aphorism;
use crate::prompt;
use crate::telemetry::anon_hash;

pub use cascade::{Cascade, ReadingOutcome};
pub use fallback::StaticReading;
pub use hosted::HostedProvider;
pub use local::LocalProvider;

/// Request-scoped result of exactly one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "interpretazione")]
    pub interpretation: String,
    #[serde(rename = "archetipo")]
    pub archetype_name: String,
    #[serde(rename = "saluto")]
    pub closing: String,
}

/// Everything a provider needs to produce a reading.
#[derive(Debug, Clone)]
pub struct ReadingContext {
    pub question: String,
    pub aphorism: Aphorism,
    pub archetype_names: Vec<String>,
    qid: String,
}

impl ReadingContext {
    pub fn new(question: impl Into<String>, aphorism: Aphorism, archetype_names: Vec<String>) -> Self {
        let question = question.into();
        let qid = anon_hash(&question);
        Self {
            question,
            aphorism,
            archetype_names,
            qid,
        }
    }

    /// Log-safe question id.
    pub fn qid(&self) -> &str {
        &self.qid
    }

    pub fn system_prompt(&self) -> String {
        prompt::system_prompt(&self.aphorism, &self.archetype_names)
    }

    pub fn user_prompt(&self) -> String {
        prompt::user_prompt(&self.question)
    }

    pub fn local_prompt(&self) -> String {
        prompt::local_prompt(&self.system_prompt(), &self.user_prompt())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("upstream returned no content")]
    EmptyContent,
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid reading: missing or empty `{0}`")]
    InvalidReading(&'static str),
}

/// One strategy of the cascade. Attempted at most once per request.
#[async_trait]
pub trait ReadingProvider: Send + Sync {
    async fn read(&self, ctx: &ReadingContext) -> Result<Reading, ProviderError>;

    /// Provider name for logs, metrics and the `X-Oracle-Source` header.
    fn name(&self) -> &'static str;
}

#[derive(Deserialize)]
struct RawReading {
    #[serde(default, alias = "interpretation")]
    interpretazione: Option<String>,
    #[serde(default, alias = "archetype")]
    archetipo: Option<String>,
    #[serde(default, alias = "closing")]
    saluto: Option<String>,
}

static RE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("fence regex"));

/// Validated decode of a model reply into a [`Reading`].
///
/// Tolerates a markdown code fence around the object; every field must be a non-empty
/// string after trimming.
pub fn decode_reading(raw: &str) -> Result<Reading, ProviderError> {
    let body = match RE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    };
    if body.is_empty() {
        return Err(ProviderError::EmptyContent);
    }

    let parsed: RawReading = serde_json::from_str(body)?;
    Ok(Reading {
        interpretation: required(parsed.interpretazione, "interpretazione")?,
        archetype_name: required(parsed.archetipo, "archetipo")?,
        closing: required(parsed.saluto, "saluto")?,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ProviderError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProviderError::InvalidReading(field)),
    }
}
