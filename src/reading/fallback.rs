// src/reading/fallback.rs
use rand::seq::IndexedRandom;
use rand::Rng;

use super::{Reading, ReadingContext};

pub const FALLBACK_INTERPRETATION: &str = "Le stelle sono velate, ma il tuo cuore conosce già la risposta. Ascolta il silenzio tra i tuoi pensieri.";
pub const FALLBACK_CLOSING: &str = "Che la luce ti guidi.";

/// Terminal strategy: fixed text, random archetype from the catalog. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticReading;

impl StaticReading {
    pub const NAME: &'static str = "static";

    pub fn reading<R: Rng + ?Sized>(&self, ctx: &ReadingContext, rng: &mut R) -> Reading {
        let archetype_name = ctx
            .archetype_names
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        Reading {
            interpretation: FALLBACK_INTERPRETATION.to_string(),
            archetype_name,
            closing: FALLBACK_CLOSING.to_string(),
        }
    }
}
