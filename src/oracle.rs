// src/oracle.rs
//! One consultation: content → aphorism → reading cascade → archetype → response.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use metrics::histogram;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::archetype;
use crate::config::OracleConfig;
use crate::content::{Aphorism, Archetype, ContentStore};
use crate::reading::{Cascade, Reading, ReadingContext};
use crate::selector;
use crate::telemetry::anon_hash;

/// Payload returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    pub aforisma: Aphorism,
    pub interpretazione: String,
    pub archetipo: Archetype,
    pub saluto: String,
}

#[derive(Debug, Clone)]
pub struct Consultation {
    pub response: OracleResponse,
    /// Name of the strategy that produced the reading.
    pub source: &'static str,
}

/// Built once at startup and shared by every request.
pub struct OracleService {
    data_dir: PathBuf,
    cascade: Cascade,
}

impl OracleService {
    pub fn new(data_dir: impl Into<PathBuf>, cascade: Cascade) -> Self {
        Self {
            data_dir: data_dir.into(),
            cascade,
        }
    }

    pub fn from_config(cfg: &OracleConfig) -> anyhow::Result<Self> {
        let cascade = Cascade::from_config(cfg)?;
        Ok(Self::new(cfg.data_dir.clone(), cascade))
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Fails only when the content store cannot be read or is empty.
    pub async fn consult(&self, question: &str) -> anyhow::Result<Consultation> {
        let started = Instant::now();
        let store = ContentStore::load(&self.data_dir).await?;

        let aphorism = {
            let mut rng = rand::rng();
            selector::select(question, &store.aphorisms, &mut rng).cloned()
        }
        .context("aphorism catalog is empty")?;

        let ctx = ReadingContext::new(question, aphorism, store.archetype_names());
        let outcome = self.cascade.obtain_reading(&ctx).await;

        let archetype = archetype::resolve(&outcome.reading.archetype_name, &store.archetypes)
            .cloned()
            .context("archetype catalog is empty")?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("oracle_consult_ms").record(elapsed_ms);
        info!(
            qid = %anon_hash(question),
            source = outcome.source,
            archetype = %archetype.name,
            elapsed_ms,
            "consultation complete"
        );

        Ok(Consultation {
            response: assemble(ctx.aphorism, archetype, outcome.reading),
            source: outcome.source,
        })
    }
}

pub fn assemble(aphorism: Aphorism, archetype: Archetype, reading: Reading) -> OracleResponse {
    OracleResponse {
        aforisma: aphorism,
        interpretazione: reading.interpretation,
        archetipo: archetype,
        saluto: reading.closing,
    }
}
