/// Default freshness half-life shared by ranking and exposure scoring.
pub const HALF_LIFE_HOURS: i64 = 12;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Exponential-decay freshness weight with the default 12h half-life.
///
/// Missing timestamps weigh 0. A timestamp equal to `now_ms` weighs 1,
/// and the weight halves every 12 hours of age. Future timestamps clamp
/// to age zero, so the result is always within `[0, 1]`.
pub fn recency_weight(last_activity_ms: Option<i64>, now_ms: i64) -> f64 {
    recency_weight_with_half_life(last_activity_ms, now_ms, HALF_LIFE_HOURS)
}

pub fn recency_weight_with_half_life(
    last_activity_ms: Option<i64>,
    now_ms: i64,
    half_life_hours: i64,
) -> f64 {
    let Some(timestamp) = last_activity_ms else {
        return 0.0;
    };

    let half_life_ms = half_life_hours.max(1) * HOUR_MS;
    let age_ms = now_ms.saturating_sub(timestamp).max(0) as f64;
    let lambda = std::f64::consts::LN_2 / half_life_ms as f64;
    (-lambda * age_ms).exp()
}
