use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as seen by the selection engine.
///
/// Only the identifier and the activity timestamps are interpreted here.
/// Profile attributes owned by the surrounding application ride along in
/// `extra` untouched, and `score` carries an externally computed exposure
/// score when one exists (see [`crate::scoring`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Last-activity fallback chain: login, then profile update, then
    /// account creation. `None` when no timestamp is known.
    pub fn last_activity_at(&self) -> Option<i64> {
        self.last_login_at.or(self.updated_at).or(self.created_at)
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
