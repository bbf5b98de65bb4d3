//! Statistics derived from a [`UserTimeRecord`]. Nothing here is stored.

use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};
use crate::models::UserTimeRecord;

pub const MS_PER_HOUR: u64 = 3_600_000;

/// Mean closed-session length, or zero before the first session.
pub fn average_session_ms(record: &UserTimeRecord) -> u64 {
    if record.session_count == 0 {
        0
    } else {
        record.total_time_ms / record.session_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityTier {
    Casual,
    Regular,
    Active,
    Elite,
    Legendary,
}

impl ActivityTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Casual => "🔸 Casual",
            Self::Regular => "📈 Regular",
            Self::Active => "🎯 Active",
            Self::Elite => "⭐ Elite",
            Self::Legendary => "🔥 Legendary",
        }
    }
}

/// Step function from total voice hours to an [`ActivityTier`].
///
/// Each entry is the minimum number of whole hours needed for its tier.
/// The first entry must start at zero and thresholds must strictly increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    steps: Vec<(u64, ActivityTier)>,
}

impl TierTable {
    pub fn new(steps: Vec<(u64, ActivityTier)>) -> TrackerResult<Self> {
        match steps.first() {
            Some((0, _)) => {}
            Some(_) => return Err(TrackerError::Config("first tier must start at 0 hours".into())),
            None => return Err(TrackerError::Config("tier table is empty".into())),
        }
        if steps.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(TrackerError::Config(
                "tier thresholds must strictly increase".into(),
            ));
        }
        Ok(Self { steps })
    }

    pub fn tier_for_hours(&self, hours: u64) -> ActivityTier {
        self.steps
            .iter()
            .rev()
            .find(|(min, _)| hours >= *min)
            .map(|(_, tier)| *tier)
            .unwrap_or(ActivityTier::Casual)
    }

    pub fn tier_for(&self, record: &UserTimeRecord) -> ActivityTier {
        self.tier_for_hours(record.total_time_ms / MS_PER_HOUR)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            steps: vec![
                (0, ActivityTier::Casual),
                (5, ActivityTier::Regular),
                (10, ActivityTier::Active),
                (25, ActivityTier::Elite),
                (50, ActivityTier::Legendary),
            ],
        }
    }
}

/// A record plus everything computed from it, ready to render or serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatsView {
    #[serde(flatten)]
    pub record: UserTimeRecord,
    pub average_session_ms: u64,
    pub tier: ActivityTier,
}

impl UserStatsView {
    pub fn new(record: UserTimeRecord, tiers: &TierTable) -> Self {
        Self {
            average_session_ms: average_session_ms(&record),
            tier: tiers.tier_for(&record),
            record,
        }
    }
}
