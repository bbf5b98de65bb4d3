use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};

/// Stable identifier of a faction: the display name with spaces
/// replaced by underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionKey(String);

impl FactionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_name(name: &str) -> Self {
        Self(name.trim().replace(' ', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FactionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub key: FactionKey,
    pub name: String,
    /// Embed colour used when rendering anything faction-themed.
    pub color: u32,
}

impl Faction {
    pub fn new(name: impl Into<String>, color: u32) -> Self {
        let name = name.into();
        Self {
            key: FactionKey::from_name(&name),
            name,
            color,
        }
    }
}

/// Colour used for members without a faction.
pub const NO_FACTION_COLOR: u32 = 0x95A5A6;

const PALETTE: [u32; 6] = [0xFF6B6B, 0x9B59B6, 0x3498DB, 0x2ECC71, 0xF1C40F, 0xE67E22];

/// The fixed, ordered set of factions a deployment defines.
///
/// Order matters: when a member somehow holds several faction roles,
/// the first catalogue entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCatalog {
    factions: Vec<Faction>,
}

impl FactionCatalog {
    pub fn new(factions: Vec<Faction>) -> TrackerResult<Self> {
        if factions.is_empty() {
            return Err(TrackerError::Config("faction catalogue is empty".into()));
        }
        for (i, faction) in factions.iter().enumerate() {
            if faction.name.trim().is_empty() {
                return Err(TrackerError::Config("faction name is empty".into()));
            }
            if factions[..i].iter().any(|f| f.key == faction.key) {
                return Err(TrackerError::Config(format!(
                    "duplicate faction key: {}",
                    faction.key
                )));
            }
        }
        Ok(Self { factions })
    }

    /// Build a catalogue from display names, assigning palette colours
    /// in order.
    pub fn from_names<I, S>(names: I) -> TrackerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let factions = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .enumerate()
            .map(|(i, name)| Faction::new(name, PALETTE[i % PALETTE.len()]))
            .collect();
        Self::new(factions)
    }

    pub fn get(&self, key: &FactionKey) -> Option<&Faction> {
        self.factions.iter().find(|f| &f.key == key)
    }

    pub fn contains(&self, key: &FactionKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter()
    }

    pub fn len(&self) -> usize {
        self.factions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }

    pub fn color_of(&self, key: Option<&FactionKey>) -> u32 {
        key.and_then(|k| self.get(k))
            .map(|f| f.color)
            .unwrap_or(NO_FACTION_COLOR)
    }

    pub fn display_name(&self, key: Option<&FactionKey>) -> String {
        key.and_then(|k| self.get(k))
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "No Faction".to_string())
    }
}

impl Default for FactionCatalog {
    fn default() -> Self {
        Self {
            factions: vec![
                Faction::new("Laughing Meeks", 0xFF6B6B),
                Faction::new("Crimson Unicorns", 0x9B59B6),
                Faction::new("Special Activities Directive", 0x3498DB),
            ],
        }
    }
}

/// Voice time attributed to one faction since the last daily reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionAggregate {
    pub total_time_ms: u64,
}
