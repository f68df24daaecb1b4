use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::candidate::Candidate;
use crate::rank::{DEFAULT_MIX, score_key, sort_tier};
use crate::recency::HALF_LIFE_HOURS;
use crate::rotate::rotate_by_seed;
use crate::seed::{build_seed, seed_day};
use crate::tier::{ACTIVE_WITHIN_DAYS, RECENT_WITHIN_DAYS, Tier};
use crate::{SelectError, current_unix_timestamp_millis};

/// Size of the daily core selection.
pub const CORE_COUNT: usize = 7;
/// Default number of low-exposure exploration picks appended to the core.
pub const EXPLORE_COUNT: usize = 2;

/// Per-tier draw quotas in `Tier::ALL` order, taken before backfill.
const TIER_QUOTAS: [usize; 3] = [3, 3, 1];

const EXPLORE_POOL_SHARE: f64 = 0.2;
const EXPLORE_POOL_MIN: usize = 2;
const EXPLORE_POOL_MAX: usize = 10;
const EXPLORE_TAG: &str = "explore";
const MIX_TAG: &str = "mix";

/// Error type a collaborator filter may fail with. Carried through
/// [`SelectError::Filter`] without interpretation.
pub type FilterError = Box<dyn std::error::Error + Send + Sync>;

/// The injected seam into the surrounding application's matching rules
/// (gender, preference, age, region, visibility). The engine applies it
/// once to the post-exclusion pool and treats it as opaque.
pub trait TotalFilter {
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        ctx: &SelectionContext,
    ) -> Result<Vec<Candidate>, FilterError>;
}

impl<F> TotalFilter for F
where
    F: Fn(Vec<Candidate>, &SelectionContext) -> Result<Vec<Candidate>, FilterError>,
{
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        ctx: &SelectionContext,
    ) -> Result<Vec<Candidate>, FilterError> {
        self(candidates, ctx)
    }
}

/// Who is looking, and whom they must never be shown. All memory of prior
/// relationships lives here; the engine itself is stateless between calls.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub viewer_id: Option<String>,
    pub exclude_ids: HashSet<String>,
}

/// Tuning knobs, defaulted to the production values.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTuning {
    pub tier_quotas: [usize; 3],
    pub core_count: usize,
    pub mix: f64,
    pub half_life_hours: i64,
    pub active_within_days: i64,
    pub recent_within_days: i64,
}

impl Default for SelectionTuning {
    fn default() -> Self {
        Self {
            tier_quotas: TIER_QUOTAS,
            core_count: CORE_COUNT,
            mix: DEFAULT_MIX,
            half_life_hours: HALF_LIFE_HOURS,
            active_within_days: ACTIVE_WITHIN_DAYS,
            recent_within_days: RECENT_WITHIN_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    /// Overrides the derived day string (`YYYYMMDD`, 11:00 KST boundary).
    pub seed_day: Option<String>,
    /// Incrementing this forces a different-but-deterministic rotation for
    /// the same day and viewer ("show me different people").
    pub reset_index: u32,
    /// Wall clock when unset; explicit for reproducible tests.
    pub now_ms: Option<i64>,
    /// Ids of the core members already shown for this seed, in shown order.
    /// Members still in the eligible pool keep their slots; only the
    /// vacancies they leave are refilled from the current ranking, so a
    /// mid-day pool change never reshuffles the whole selection. Like the
    /// exploration seen set, this memory is supplied by the caller.
    pub sticky_ids: Vec<String>,
    pub tuning: SelectionTuning,
}

/// Caller-supplied state for exploration picks. `seen_ids` holds ids the
/// viewer was recently shown; the engine avoids them while enough unseen
/// candidates remain.
#[derive(Debug, Clone)]
pub struct ExplorationOptions {
    pub explore_count: usize,
    pub seen_ids: HashSet<String>,
}

impl Default for ExplorationOptions {
    fn default() -> Self {
        Self {
            explore_count: EXPLORE_COUNT,
            seen_ids: HashSet::new(),
        }
    }
}

/// Result of [`select_with_exploration`]: the quota-drawn core, the
/// exploration picks, and the seed-rotated display order of both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionOutcome {
    pub core: Vec<Candidate>,
    pub explore: Vec<Candidate>,
    pub display: Vec<Candidate>,
}

/// The primary entry point: a bounded, deterministic daily selection.
///
/// Pipeline: drop id-less entries, strip excluded ids and the viewer,
/// apply the collaborator filter, classify into recency tiers, sort and
/// rotate each tier with the day seed, seat still-eligible sticky members
/// first, draw the 3/3/1 quotas front-first, then backfill tier by tier
/// until `core_count` or exhaustion. Short and empty pools degrade to
/// shorter output, never an error.
pub fn select_distributed(
    raw_candidates: Vec<Candidate>,
    ctx: &SelectionContext,
    filter: &dyn TotalFilter,
    options: &SelectionOptions,
) -> Result<Vec<Candidate>, SelectError> {
    Ok(rank_and_draw(raw_candidates, ctx, filter, options)?.core)
}

/// [`select_distributed`] plus low-exposure exploration picks drawn from
/// the bottom of the ranking, avoiding recently seen ids, with a final
/// seeded rotation deciding the display order of core and explore together.
pub fn select_with_exploration(
    raw_candidates: Vec<Candidate>,
    ctx: &SelectionContext,
    filter: &dyn TotalFilter,
    options: &SelectionOptions,
    exploration: &ExplorationOptions,
) -> Result<SelectionOutcome, SelectError> {
    let drawn = rank_and_draw(raw_candidates, ctx, filter, options)?;
    let explore = draw_explore(&drawn, &options.tuning, exploration);

    let combined = drawn
        .core
        .iter()
        .chain(explore.iter())
        .cloned()
        .collect::<Vec<_>>();
    let display = rotate_by_seed(combined, &drawn.seed, MIX_TAG);

    Ok(SelectionOutcome {
        core: drawn.core,
        explore,
        display,
    })
}

struct DrawnPool {
    seed: String,
    now_ms: i64,
    core: Vec<Candidate>,
    filtered: Vec<Candidate>,
}

fn rank_and_draw(
    raw_candidates: Vec<Candidate>,
    ctx: &SelectionContext,
    filter: &dyn TotalFilter,
    options: &SelectionOptions,
) -> Result<DrawnPool, SelectError> {
    let tuning = &options.tuning;
    let now_ms = options.now_ms.unwrap_or_else(current_unix_timestamp_millis);
    let day = match options.seed_day.as_deref().map(str::trim) {
        Some(day) if !day.is_empty() => day.to_owned(),
        _ => seed_day(now_ms),
    };
    let seed = build_seed(&day, ctx.viewer_id.as_deref(), options.reset_index);

    let viewer_id = ctx.viewer_id.as_deref().unwrap_or_default();
    let pool = raw_candidates
        .into_iter()
        .filter(Candidate::has_id)
        .filter(|candidate| !ctx.exclude_ids.contains(candidate.id.as_str()))
        .filter(|candidate| candidate.id != viewer_id)
        .collect::<Vec<_>>();

    let filtered = filter.apply(pool, ctx).map_err(SelectError::Filter)?;

    let mut tiers: [Vec<Candidate>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for candidate in &filtered {
        let tier = Tier::classify_with_thresholds(
            candidate,
            now_ms,
            tuning.active_within_days,
            tuning.recent_within_days,
        );
        tiers[tier.index()].push(candidate.clone());
    }

    tracing::debug!(
        seed = %seed,
        active = tiers[0].len(),
        recent = tiers[1].len(),
        dormant = tiers[2].len(),
        "classified candidate pool"
    );

    let mut queues = Vec::with_capacity(Tier::ALL.len());
    for (tier, members) in Tier::ALL.into_iter().zip(tiers) {
        let sorted = sort_tier(members, &seed, now_ms, tuning.mix, tuning.half_life_hours);
        let rotated = rotate_by_seed(sorted, &seed, tier.as_str());
        queues.push(VecDeque::from(rotated));
    }

    let target = tuning.core_count;
    let mut core: Vec<Candidate> = Vec::with_capacity(target);
    let mut taken: HashSet<String> = HashSet::new();

    // Sticky pass: members already shown for this seed keep their slots in
    // shown order, as long as they survived exclusions and the filter.
    if !options.sticky_ids.is_empty() {
        let by_id = filtered
            .iter()
            .map(|candidate| (candidate.id.as_str(), candidate))
            .collect::<HashMap<_, _>>();
        for id in &options.sticky_ids {
            if core.len() >= target {
                break;
            }
            if taken.contains(id.as_str()) {
                continue;
            }
            if let Some(candidate) = by_id.get(id.as_str()) {
                taken.insert(id.clone());
                core.push((*candidate).clone());
            }
        }
    }

    // Quota pass: fixed draw per tier, consuming from the front. Sticky
    // members already seated do not consume their tier's quota.
    for (queue, quota) in queues.iter_mut().zip(tuning.tier_quotas) {
        let mut drawn = 0;
        while drawn < quota && core.len() < target {
            let Some(candidate) = queue.pop_front() else {
                break;
            };
            if taken.contains(candidate.id.as_str()) {
                continue;
            }
            core.push(candidate);
            drawn += 1;
        }
    }

    // Backfill pass: drain each tier in priority order until full.
    for queue in &mut queues {
        while core.len() < target {
            let Some(candidate) = queue.pop_front() else {
                break;
            };
            if taken.contains(candidate.id.as_str()) {
                continue;
            }
            core.push(candidate);
        }
    }

    tracing::debug!(seed = %seed, drawn = core.len(), pool = filtered.len(), "assembled selection");

    Ok(DrawnPool {
        seed,
        now_ms,
        core,
        filtered,
    })
}

fn draw_explore(
    drawn: &DrawnPool,
    tuning: &SelectionTuning,
    exploration: &ExplorationOptions,
) -> Vec<Candidate> {
    if exploration.explore_count == 0 || drawn.filtered.len() <= drawn.core.len() {
        return Vec::new();
    }

    let core_ids = drawn
        .core
        .iter()
        .map(|candidate| candidate.id.as_str())
        .collect::<HashSet<_>>();

    // Remaining pool, ascending by score key: the least-exposed candidates
    // come first.
    let mut keyed = drawn
        .filtered
        .iter()
        .filter(|candidate| !core_ids.contains(candidate.id.as_str()))
        .map(|candidate| {
            let key = score_key(
                candidate,
                &drawn.seed,
                drawn.now_ms,
                tuning.mix,
                tuning.half_life_hours,
            );
            (key, candidate.clone())
        })
        .collect::<Vec<_>>();
    keyed.sort_by(|(left_key, left), (right_key, right)| {
        left_key
            .partial_cmp(right_key)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.id.cmp(&right.id))
    });

    let total = keyed.len();
    let share = (total as f64 * EXPLORE_POOL_SHARE).ceil() as usize;
    let pool_size = share.max(EXPLORE_POOL_MIN).min(EXPLORE_POOL_MAX).min(total);
    let pool = keyed
        .into_iter()
        .take(pool_size)
        .map(|(_, candidate)| candidate)
        .collect::<Vec<_>>();

    let unseen = pool
        .iter()
        .filter(|candidate| !exploration.seen_ids.contains(candidate.id.as_str()))
        .cloned()
        .collect::<Vec<_>>();

    // Relax the seen-avoidance when it would starve the draw.
    let pool = if unseen.len() < exploration.explore_count {
        pool
    } else {
        unseen
    };

    rotate_by_seed(pool, &drawn.seed, EXPLORE_TAG)
        .into_iter()
        .take(exploration.explore_count)
        .collect()
}
