// src/config/oracle.rs
//! Service configuration: optional TOML file, then environment overrides.
//!
//! Lookup order for the file:
//! 1) $ORACLE_CONFIG_PATH (must exist when set)
//! 2) config/oracle.toml (optional; defaults apply when absent)

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/oracle.toml";
pub const ENV_CONFIG_PATH: &str = "ORACLE_CONFIG_PATH";

pub const ENV_DATA_DIR: &str = "ORACLE_DATA_DIR";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OLLAMA_URL: &str = "OLLAMA_URL";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_HOSTED_TIMEOUT_SECS: &str = "ORACLE_HOSTED_TIMEOUT_SECS";
pub const ENV_LOCAL_TIMEOUT_SECS: &str = "ORACLE_LOCAL_TIMEOUT_SECS";

/// Sentinel for `hosted.api_key`: read the credential from `OPENAI_API_KEY`.
const API_KEY_FROM_ENV: &str = "ENV";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Directory holding `aforismi.json` and `archetipi.json`.
    pub data_dir: PathBuf,
    pub hosted: HostedConfig,
    pub local: LocalConfig,
}

/// Hosted chat-completion model (OpenAI or a compatible gateway).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    /// "ENV" means: read from OPENAI_API_KEY. Empty disables the hosted strategy.
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

/// Local Ollama-style generate endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub url: String,
    pub model: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            hosted: HostedConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_FROM_ENV.to_string(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            connect_timeout_secs: 4,
            timeout_secs: 20,
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/api/generate".to_string(),
            model: "llama3.1".to_string(),
            connect_timeout_secs: 4,
            timeout_secs: 60,
        }
    }
}

impl HostedConfig {
    /// The configured credential, if any. `None` disables the hosted strategy.
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case(API_KEY_FROM_ENV) {
            None
        } else {
            Some(key)
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl LocalConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OracleConfig {
    /// Load using env var + fallbacks, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_with(|name| env::var(name).ok());
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading oracle config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing oracle config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: Self = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Zero timeouts would fail every provider call immediately; fall back to defaults.
    fn sanitize(&mut self) {
        let hosted = HostedConfig::default();
        let local = LocalConfig::default();
        non_zero_or(
            "hosted.connect_timeout_secs",
            &mut self.hosted.connect_timeout_secs,
            hosted.connect_timeout_secs,
        );
        non_zero_or(
            "hosted.timeout_secs",
            &mut self.hosted.timeout_secs,
            hosted.timeout_secs,
        );
        non_zero_or(
            "local.connect_timeout_secs",
            &mut self.local.connect_timeout_secs,
            local.connect_timeout_secs,
        );
        non_zero_or("local.timeout_secs", &mut self.local.timeout_secs, local.timeout_secs);
    }

    /// Apply overrides from an env-like lookup. Unset or empty values keep the file value,
    /// except `OPENAI_API_KEY`, where an explicit empty value disables the hosted strategy.
    pub fn apply_env_with<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = var(ENV_OPENAI_API_KEY) {
            self.hosted.api_key = key.trim().to_string();
        } else if self.hosted.api_key.trim().eq_ignore_ascii_case(API_KEY_FROM_ENV) {
            self.hosted.api_key.clear();
        }

        if let Some(v) = non_empty(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_OPENAI_MODEL) {
            self.hosted.model = v;
        }
        if let Some(v) = non_empty(ENV_OPENAI_BASE_URL) {
            self.hosted.base_url = v;
        }
        if let Some(v) = non_empty(ENV_OLLAMA_URL) {
            self.local.url = v;
        }
        if let Some(v) = non_empty(ENV_OLLAMA_MODEL) {
            self.local.model = v;
        }
        if let Some(secs) =
            non_empty(ENV_HOSTED_TIMEOUT_SECS).and_then(|v| parse_secs(ENV_HOSTED_TIMEOUT_SECS, &v))
        {
            self.hosted.timeout_secs = secs;
        }
        if let Some(secs) =
            non_empty(ENV_LOCAL_TIMEOUT_SECS).and_then(|v| parse_secs(ENV_LOCAL_TIMEOUT_SECS, &v))
        {
            self.local.timeout_secs = secs;
        }
    }
}

fn non_zero_or(key: &str, value: &mut u64, default: u64) {
    if *value == 0 {
        warn!(key, default, "zero timeout in config; using default");
        *value = default;
    }
}

fn parse_secs(name: &str, raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            warn!(var = name, value = raw, "ignoring invalid timeout override");
            None
        }
        Ok(secs) => Some(secs),
    }
}
