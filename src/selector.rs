// src/selector.rs
//! Aphorism selection: naive substring match on theme/emotion, random otherwise.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::content::Aphorism;

/// Pick the aphorism for `question`.
///
/// The first aphorism (in catalog order) whose lower-cased theme or emotion occurs in the
/// lower-cased question wins. Without a match, one is drawn uniformly at random.
/// Returns `None` only for an empty catalog.
pub fn select<'a, R: Rng + ?Sized>(
    question: &str,
    aphorisms: &'a [Aphorism],
    rng: &mut R,
) -> Option<&'a Aphorism> {
    first_match(question, aphorisms).or_else(|| aphorisms.choose(rng))
}

/// Deterministic half of [`select`]: the first theme/emotion hit, if any.
pub fn first_match<'a>(question: &str, aphorisms: &'a [Aphorism]) -> Option<&'a Aphorism> {
    let q = question.to_lowercase();
    aphorisms
        .iter()
        .find(|a| mentions(&q, &a.theme) || mentions(&q, &a.emotion))
}

// An empty key is a substring of every question, so such an entry always matches.
fn mentions(question_lower: &str, key: &str) -> bool {
    question_lower.contains(&key.to_lowercase())
}
