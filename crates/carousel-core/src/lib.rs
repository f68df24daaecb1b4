//! Deterministic daily candidate-distribution engine.
//!
//! Given a pool of candidates, a viewer context, and a day-scoped seed,
//! the engine partitions candidates into recency tiers, ranks and rotates
//! each tier with seeded pseudo-randomness, and assembles a bounded,
//! reproducible selection. It is a pure, synchronous computation: no I/O,
//! no shared state between calls, and all "memory" of what a viewer
//! previously saw is supplied by the caller.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

mod candidate;
mod hash;
mod rank;
mod recency;
mod rotate;
mod scoring;
mod seed;
mod select;
mod tier;

pub use candidate::Candidate;
pub use hash::{hash01, hash32};
pub use rank::{DEFAULT_MIX, score_key, sort_tier};
pub use recency::{HALF_LIFE_HOURS, recency_weight, recency_weight_with_half_life};
pub use rotate::rotate_by_seed;
pub use scoring::{
    ActivityCaps, ActivityCounts, ActivityWeights, activity_score, clamp01, exposure_score,
    normalize_count,
};
pub use seed::{DEFAULT_VIEWER_ID, build_seed, seed_day};
pub use select::{
    CORE_COUNT, EXPLORE_COUNT, ExplorationOptions, FilterError, SelectionContext,
    SelectionOptions, SelectionOutcome, SelectionTuning, TotalFilter, select_distributed,
    select_with_exploration,
};
pub use tier::{ACTIVE_WITHIN_DAYS, RECENT_WITHIN_DAYS, Tier};

#[derive(Debug, Error)]
pub enum SelectError {
    /// A collaborator-supplied total filter failed. The underlying error is
    /// rendered verbatim; the engine has no domain context to add.
    #[error("{0}")]
    Filter(FilterError),
}

pub(crate) fn current_unix_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}
