//! Local model provider (Ollama `/api/generate`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{decode_reading, ProviderError, Reading, ReadingContext, ReadingProvider};
use crate::config::LocalConfig;

/// Fixed generation policy; not adjustable per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
    pub repeat_penalty: f32,
}

pub const GENERATION_OPTIONS: GenerationOptions = GenerationOptions {
    temperature: 0.65,
    top_p: 0.9,
    num_predict: 180,
    repeat_penalty: 1.15,
};

pub struct LocalProvider {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl LocalProvider {
    pub fn new(cfg: &LocalConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            .build()?;
        Ok(Self {
            http,
            url: cfg.url.clone(),
            model: cfg.model.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Serialize)]
struct GenerateReq<'a> {
    model: &'a str,
    prompt: &'a str,
    format: &'static str,
    stream: bool,
    options: GenerationOptions,
}

#[derive(Deserialize)]
struct GenerateResp {
    #[serde(default)]
    response: Option<String>,
}

#[async_trait]
impl ReadingProvider for LocalProvider {
    async fn read(&self, ctx: &ReadingContext) -> Result<Reading, ProviderError> {
        let prompt = ctx.local_prompt();
        let req = GenerateReq {
            model: &self.model,
            prompt: &prompt,
            format: "json",
            stream: false,
            options: GENERATION_OPTIONS,
        };

        let resp = self.http.post(&self.url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let bytes = resp.bytes().await?;
        let body: GenerateResp = serde_json::from_slice(&bytes)?;
        let inner = body.response.ok_or(ProviderError::EmptyContent)?;
        decode_reading(&inner)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
