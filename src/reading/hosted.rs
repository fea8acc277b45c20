//! Hosted model provider (OpenAI Chat Completions or a compatible gateway).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{decode_reading, ProviderError, Reading, ReadingContext, ReadingProvider};
use crate::config::HostedConfig;

const USER_AGENT: &str = concat!("oracolo/", env!("CARGO_PKG_VERSION"));

pub struct HostedProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl HostedProvider {
    /// Build the provider for an already-resolved credential.
    pub fn new(api_key: impl Into<String>, cfg: &HostedConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: cfg.model.clone(),
            endpoint: cfg.endpoint(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ReadingProvider for HostedProvider {
    async fn read(&self, ctx: &ReadingContext) -> Result<Reading, ProviderError> {
        let system = ctx.system_prompt();
        let user = ctx.user_prompt();
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &system,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let bytes = resp.bytes().await?;
        let body: Resp = serde_json::from_slice(&bytes)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyContent)?;

        decode_reading(&content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
