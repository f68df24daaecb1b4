use std::cmp::Ordering;

use crate::candidate::Candidate;
use crate::hash::hash01;
use crate::recency::recency_weight_with_half_life;

/// Default share of the seeded hash in the fallback score key. The 65/35
/// blend favors freshness while the jitter keeps any single candidate from
/// permanently dominating a tier.
pub const DEFAULT_MIX: f64 = 0.35;

/// Weight of a pre-computed exposure score when the candidate carries one.
const EXPOSURE_SCORE_WEIGHT: f64 = 0.8;

/// Ranking key in `[0, 1]`: a recency/jitter blend, overridden 80/20 by the
/// candidate's exposure score when present and finite.
pub fn score_key(
    candidate: &Candidate,
    seed: &str,
    now_ms: i64,
    mix: f64,
    half_life_hours: i64,
) -> f64 {
    let recency =
        recency_weight_with_half_life(candidate.last_activity_at(), now_ms, half_life_hours);
    let jitter = hash01(&format!("{seed}#{}", candidate.id));
    let fallback = (1.0 - mix) * recency + mix * jitter;

    match candidate.score {
        Some(score) if score.is_finite() => {
            let base = score.clamp(0.0, 1.0);
            EXPOSURE_SCORE_WEIGHT * base + (1.0 - EXPOSURE_SCORE_WEIGHT) * fallback
        }
        _ => fallback,
    }
}

/// Sorts one tier descending by score key. Exact ties break by candidate id
/// ascending so the order is reproducible.
pub fn sort_tier(
    candidates: Vec<Candidate>,
    seed: &str,
    now_ms: i64,
    mix: f64,
    half_life_hours: i64,
) -> Vec<Candidate> {
    let mut keyed = candidates
        .into_iter()
        .map(|candidate| {
            let key = score_key(&candidate, seed, now_ms, mix, half_life_hours);
            (key, candidate)
        })
        .collect::<Vec<_>>();

    keyed.sort_by(|(left_key, left), (right_key, right)| {
        right_key
            .partial_cmp(left_key)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.id.cmp(&right.id))
    });

    keyed.into_iter().map(|(_, candidate)| candidate).collect()
}
