// src/reading/cascade.rs
//! Ordered provider cascade: first `Ok` wins, the static reading closes the chain.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use super::{
    HostedProvider, LocalProvider, Reading, ReadingContext, ReadingProvider, StaticReading,
};
use crate::config::OracleConfig;

/// The reading plus the name of the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingOutcome {
    pub reading: Reading,
    pub source: &'static str,
}

pub struct Cascade {
    providers: Vec<Arc<dyn ReadingProvider>>,
    fallback: StaticReading,
}

impl Cascade {
    pub fn new(providers: Vec<Arc<dyn ReadingProvider>>) -> Self {
        Self {
            providers,
            fallback: StaticReading,
        }
    }

    /// Hosted (only with a credential) → local → static.
    pub fn from_config(cfg: &OracleConfig) -> anyhow::Result<Self> {
        let mut providers: Vec<Arc<dyn ReadingProvider>> = Vec::with_capacity(2);

        match cfg.hosted.credential() {
            Some(key) => {
                let hosted = HostedProvider::new(key, &cfg.hosted)?;
                info!(
                    model = hosted.model(),
                    key_len = key.len(),
                    "hosted reading provider enabled"
                );
                providers.push(Arc::new(hosted));
            }
            None => info!("hosted reading provider disabled: no OPENAI_API_KEY configured"),
        }

        let local = LocalProvider::new(&cfg.local)?;
        info!(url = local.url(), model = %cfg.local.model, "local reading provider enabled");
        providers.push(Arc::new(local));

        Ok(Self::new(providers))
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Always yields a reading: every provider failure is logged and skipped.
    pub async fn obtain_reading(&self, ctx: &ReadingContext) -> ReadingOutcome {
        for provider in &self.providers {
            match provider.read(ctx).await {
                Ok(reading) => {
                    counter!("oracle_reading_source_total", "source" => provider.name())
                        .increment(1);
                    return ReadingOutcome {
                        reading,
                        source: provider.name(),
                    };
                }
                Err(err) => {
                    counter!("oracle_provider_failures_total", "provider" => provider.name())
                        .increment(1);
                    warn!(
                        qid = ctx.qid(),
                        provider = provider.name(),
                        error = %err,
                        "reading provider failed, trying next"
                    );
                }
            }
        }

        warn!(qid = ctx.qid(), "using static reading (no provider available)");
        counter!("oracle_reading_source_total", "source" => StaticReading::NAME).increment(1);
        let reading = self.fallback.reading(ctx, &mut rand::rng());
        ReadingOutcome {
            reading,
            source: StaticReading::NAME,
        }
    }
}
