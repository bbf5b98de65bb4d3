use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::collaborators::SessionHook;
use crate::errors::TrackerResult;
use crate::models::{Faction, FactionCatalog, FactionKey, SessionCommit};
use crate::stats::MS_PER_HOUR;

pub const DAILY_LEADER_BONUS: u64 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionScore {
    pub points: u64,
    pub activities: u64,
    /// Attributed voice time not yet converted into points.
    pub banked_ms: u64,
}

impl FactionScore {
    pub fn level(&self) -> u64 {
        self.points / 100 + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionStanding {
    pub faction: Faction,
    pub score: FactionScore,
}

/// Faction points ledger: one point per attributed voice hour plus
/// the bonus handed out by the daily rollup.
#[derive(Debug)]
pub struct FactionPoints {
    catalog: FactionCatalog,
    scores: RwLock<HashMap<FactionKey, FactionScore>>,
}

impl FactionPoints {
    pub fn new(catalog: FactionCatalog) -> Self {
        let scores = catalog
            .iter()
            .map(|f| (f.key.clone(), FactionScore::default()))
            .collect();
        Self {
            catalog,
            scores: RwLock::new(scores),
        }
    }

    pub async fn score(&self, key: &FactionKey) -> Option<FactionScore> {
        self.scores.read().await.get(key).copied()
    }

    /// Factions ordered by points, highest first; ties keep catalogue order.
    pub async fn standings(&self) -> Vec<FactionStanding> {
        let scores = self.scores.read().await;
        let mut standings: Vec<_> = self
            .catalog
            .iter()
            .map(|faction| FactionStanding {
                faction: faction.clone(),
                score: scores.get(&faction.key).copied().unwrap_or_default(),
            })
            .collect();
        standings.sort_by(|a, b| b.score.points.cmp(&a.score.points));
        standings
    }

    pub async fn award_daily_leader(&self, key: &FactionKey) -> bool {
        self.update(key, |score| score.points += DAILY_LEADER_BONUS)
            .await
    }

    async fn update(&self, key: &FactionKey, apply: impl FnOnce(&mut FactionScore)) -> bool {
        match self.scores.write().await.get_mut(key) {
            Some(score) => {
                apply(score);
                true
            }
            None => {
                warn!("Ignoring points update for unknown faction {}", key);
                false
            }
        }
    }
}

#[async_trait]
impl SessionHook for FactionPoints {
    async fn session_committed(&self, commit: &SessionCommit) -> TrackerResult<()> {
        let Some(key) = &commit.faction else {
            return Ok(());
        };
        let elapsed_ms = commit.elapsed_ms;
        self.update(key, |score| {
            score.activities += 1;
            score.banked_ms += elapsed_ms;
            let earned = score.banked_ms / MS_PER_HOUR;
            score.points += earned;
            score.banked_ms %= MS_PER_HOUR;
            if earned > 0 {
                debug!("Faction {} earned {} voice points", key, earned);
            }
        })
        .await;
        Ok(())
    }
}
