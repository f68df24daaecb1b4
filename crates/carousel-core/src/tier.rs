use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Default tier thresholds, in days of last-activity age.
pub const ACTIVE_WITHIN_DAYS: i64 = 3;
pub const RECENT_WITHIN_DAYS: i64 = 10;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Recency tier of a candidate, in draw-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Active within the last 3 days.
    Active,
    /// Active within the last 10 days.
    Recent,
    /// Older than 10 days, or never seen.
    Dormant,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Active, Tier::Recent, Tier::Dormant];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Recent => "recent",
            Self::Dormant => "dormant",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn classify(candidate: &Candidate, now_ms: i64) -> Tier {
        Self::classify_with_thresholds(
            candidate,
            now_ms,
            ACTIVE_WITHIN_DAYS,
            RECENT_WITHIN_DAYS,
        )
    }

    /// Half-open boundaries: age < active threshold is Active, age < recent
    /// threshold is Recent, everything else Dormant. Candidates with no
    /// known timestamp default to epoch zero and land in Dormant.
    pub fn classify_with_thresholds(
        candidate: &Candidate,
        now_ms: i64,
        active_within_days: i64,
        recent_within_days: i64,
    ) -> Tier {
        let timestamp = candidate.last_activity_at().unwrap_or(0);
        let age_ms = now_ms.saturating_sub(timestamp);

        if age_ms < active_within_days * DAY_MS {
            Tier::Active
        } else if age_ms < recent_within_days * DAY_MS {
            Tier::Recent
        } else {
            Tier::Dormant
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn candidate_active_at(timestamp: Option<i64>) -> Candidate {
        let mut candidate = Candidate::new("u1");
        candidate.last_login_at = timestamp;
        candidate
    }

    #[test]
    fn fresh_activity_is_active() {
        let candidate = candidate_active_at(Some(NOW - DAY_MS));
        assert_eq!(Tier::classify(&candidate, NOW), Tier::Active);
    }

    #[test]
    fn three_day_boundary_is_exclusive() {
        let just_inside = candidate_active_at(Some(NOW - 3 * DAY_MS + 1));
        let exactly = candidate_active_at(Some(NOW - 3 * DAY_MS));
        assert_eq!(Tier::classify(&just_inside, NOW), Tier::Active);
        assert_eq!(Tier::classify(&exactly, NOW), Tier::Recent);
    }

    #[test]
    fn ten_day_boundary_is_exclusive() {
        let just_inside = candidate_active_at(Some(NOW - 10 * DAY_MS + 1));
        let exactly = candidate_active_at(Some(NOW - 10 * DAY_MS));
        assert_eq!(Tier::classify(&just_inside, NOW), Tier::Recent);
        assert_eq!(Tier::classify(&exactly, NOW), Tier::Dormant);
    }

    #[test]
    fn missing_timestamps_land_in_dormant() {
        let candidate = candidate_active_at(None);
        assert_eq!(Tier::classify(&candidate, NOW), Tier::Dormant);
    }

    #[test]
    fn fallback_chain_reaches_created_at() {
        let mut candidate = Candidate::new("u1");
        candidate.created_at = Some(NOW - DAY_MS);
        assert_eq!(Tier::classify(&candidate, NOW), Tier::Active);
    }

    #[test]
    fn custom_thresholds_shift_the_boundaries() {
        let candidate = candidate_active_at(Some(NOW - 5 * DAY_MS));
        let tier = Tier::classify_with_thresholds(&candidate, NOW, 6, 20);
        assert_eq!(tier, Tier::Active);
    }

    #[test]
    fn tiers_order_by_draw_priority() {
        assert!(Tier::Active < Tier::Recent);
        assert!(Tier::Recent < Tier::Dormant);
    }
}
