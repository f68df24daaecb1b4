use serde::{Deserialize, Serialize};

/// Daily activity aggregates for one candidate, as counted by the
/// surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityCounts {
    pub messages_sent: u32,
    pub friend_requests_sent: u32,
    pub friend_requests_received: u32,
    pub friend_requests_accepted: u32,
    pub blocks_received: u32,
}

/// Weights of each normalized activity signal. Blocks carry a negative
/// weight: being blocked is a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityWeights {
    pub messages_sent: f64,
    pub friend_requests_sent: f64,
    pub friend_requests_received: f64,
    pub friend_requests_accepted: f64,
    pub blocks_received: f64,
}

impl Default for ActivityWeights {
    fn default() -> Self {
        Self {
            messages_sent: 0.25,
            friend_requests_sent: 0.20,
            friend_requests_received: 0.20,
            friend_requests_accepted: 0.30,
            blocks_received: -0.20,
        }
    }
}

/// Expected daily ceilings used to normalize raw counts into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityCaps {
    pub messages_sent: u32,
    pub friend_requests_sent: u32,
    pub friend_requests_received: u32,
    pub friend_requests_accepted: u32,
    pub blocks_received: u32,
}

impl Default for ActivityCaps {
    fn default() -> Self {
        Self {
            messages_sent: 40,
            friend_requests_sent: 20,
            friend_requests_received: 20,
            friend_requests_accepted: 10,
            blocks_received: 10,
        }
    }
}

pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// `count / cap` clamped to `[0, 1]`; a zero cap disables the signal.
pub fn normalize_count(count: u32, cap: u32) -> f64 {
    if cap == 0 {
        return 0.0;
    }
    clamp01(f64::from(count) / f64::from(cap))
}

/// Weighted sum of normalized activity signals, clamped to `[0, 1]`.
pub fn activity_score(
    counts: &ActivityCounts,
    weights: &ActivityWeights,
    caps: &ActivityCaps,
) -> f64 {
    let raw = normalize_count(counts.messages_sent, caps.messages_sent) * weights.messages_sent
        + normalize_count(counts.friend_requests_sent, caps.friend_requests_sent)
            * weights.friend_requests_sent
        + normalize_count(counts.friend_requests_received, caps.friend_requests_received)
            * weights.friend_requests_received
        + normalize_count(counts.friend_requests_accepted, caps.friend_requests_accepted)
            * weights.friend_requests_accepted
        + normalize_count(counts.blocks_received, caps.blocks_received) * weights.blocks_received;

    clamp01(raw)
}

/// Final exposure score: activity attenuated by freshness, clamped. The
/// result is what callers store on [`crate::Candidate::score`].
pub fn exposure_score(activity: f64, recency: f64) -> f64 {
    clamp01(activity * recency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_bounds_and_rejects_nan() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.42), 0.42);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }

    #[test]
    fn normalize_count_caps_at_one() {
        assert_eq!(normalize_count(0, 40), 0.0);
        assert_eq!(normalize_count(20, 40), 0.5);
        assert_eq!(normalize_count(80, 40), 1.0);
        assert_eq!(normalize_count(5, 0), 0.0);
    }

    #[test]
    fn default_weights_reward_accepted_requests_most() {
        let accepted = ActivityCounts {
            friend_requests_accepted: 10,
            ..ActivityCounts::default()
        };
        let sent = ActivityCounts {
            friend_requests_sent: 20,
            ..ActivityCounts::default()
        };

        let weights = ActivityWeights::default();
        let caps = ActivityCaps::default();
        assert!(activity_score(&accepted, &weights, &caps) > activity_score(&sent, &weights, &caps));
    }

    #[test]
    fn blocks_reduce_the_score() {
        let weights = ActivityWeights::default();
        let caps = ActivityCaps::default();

        let busy = ActivityCounts {
            messages_sent: 40,
            friend_requests_accepted: 10,
            ..ActivityCounts::default()
        };
        let busy_and_blocked = ActivityCounts {
            blocks_received: 10,
            ..busy
        };

        assert!(
            activity_score(&busy_and_blocked, &weights, &caps)
                < activity_score(&busy, &weights, &caps)
        );
    }

    #[test]
    fn activity_score_never_goes_negative() {
        let only_blocks = ActivityCounts {
            blocks_received: 10,
            ..ActivityCounts::default()
        };
        let score = activity_score(
            &only_blocks,
            &ActivityWeights::default(),
            &ActivityCaps::default(),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn exposure_score_attenuates_activity_by_recency() {
        assert_eq!(exposure_score(0.8, 0.5), 0.4);
        assert_eq!(exposure_score(1.0, 0.0), 0.0);
        assert_eq!(exposure_score(2.0, 1.0), 1.0);
    }
}
