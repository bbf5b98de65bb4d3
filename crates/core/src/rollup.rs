use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};
use crate::models::{Faction, FactionAggregate};

/// Wall-clock hour (UTC) the daily rollup runs at unless configured otherwise.
pub const DEFAULT_ROLLUP_HOUR_UTC: u32 = 12;

/// The next instant strictly after `now` whose UTC time is `hour:00:00`.
pub fn next_rollup_after(now: DateTime<Utc>, hour: u32) -> TrackerResult<DateTime<Utc>> {
    let at = NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| TrackerError::Config(format!("rollup hour out of range: {}", hour)))?;
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(at));
    if today > now {
        Ok(today)
    } else {
        Ok(today + Duration::days(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionDayTotal {
    pub faction: Faction,
    pub total_time_ms: u64,
}

/// Faction totals captured just before a daily reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStandings {
    pub taken_at: DateTime<Utc>,
    /// Highest total first; ties keep catalogue order.
    pub factions: Vec<FactionDayTotal>,
}

impl DailyStandings {
    pub fn new(taken_at: DateTime<Utc>, totals: Vec<(Faction, FactionAggregate)>) -> Self {
        let mut factions: Vec<_> = totals
            .into_iter()
            .map(|(faction, aggregate)| FactionDayTotal {
                faction,
                total_time_ms: aggregate.total_time_ms,
            })
            .collect();
        factions.sort_by(|a, b| b.total_time_ms.cmp(&a.total_time_ms));
        Self { taken_at, factions }
    }

    /// The day's leading faction, if anyone logged any time at all.
    pub fn leader(&self) -> Option<&FactionDayTotal> {
        self.factions.first().filter(|f| f.total_time_ms > 0)
    }
}
