use chrono::{DateTime, FixedOffset, Timelike};

/// Viewer placeholder used when no viewer id is supplied.
pub const DEFAULT_VIEWER_ID: &str = "anon";

const ROLLOVER_HOUR_KST: u32 = 11;

// Korea observes no DST, so a fixed UTC+9 offset is exact.
const KST: FixedOffset = match FixedOffset::east_opt(9 * 60 * 60) {
    Some(offset) => offset,
    None => panic!("UTC+9 is within the fixed-offset range"),
};

/// Derives the `YYYYMMDD` day string for a unix-millisecond instant.
///
/// The day boundary is 11:00 in Asia/Seoul: before 11:00 KST the instant
/// counts as the previous day, so the daily selection refreshes mid-morning
/// rather than at midnight.
pub fn seed_day(now_ms: i64) -> String {
    let local = DateTime::from_timestamp_millis(now_ms)
        .unwrap_or_default()
        .with_timezone(&KST);

    let mut date = local.date_naive();
    if local.hour() < ROLLOVER_HOUR_KST {
        date = date.pred_opt().unwrap_or(date);
    }
    date.format("%Y%m%d").to_string()
}

/// Combines day, viewer, and reset counter into the deterministic seed.
/// Blank viewer ids fall back to [`DEFAULT_VIEWER_ID`].
pub fn build_seed(day: &str, viewer_id: Option<&str>, reset_index: u32) -> String {
    let viewer = viewer_id
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_VIEWER_ID);
    format!("{day}#{viewer}#{reset_index}")
}
