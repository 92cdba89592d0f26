//! Named, timestamped copies of a level structure.

use crate::error::{Result, StoreError};
use crate::level::LevelSequence;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(rename = "blindLevels", default)]
    pub levels: LevelSequence,
}

impl TournamentSnapshot {
    /// Copy `levels` under a trimmed, non-empty `name`.
    ///
    /// The id is the creation time in milliseconds, bumped past any id already
    /// present in `existing`.
    pub fn capture(
        name: &str,
        levels: &LevelSequence,
        existing: &[TournamentSnapshot],
        now_ms: u64,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptySnapshotName);
        }

        Ok(Self {
            id: unique_id(existing, now_ms),
            name: name.to_string(),
            created_at: now_ms,
            levels: levels.as_slice().to_vec().into(),
        })
    }
}

fn unique_id(existing: &[TournamentSnapshot], now_ms: u64) -> String {
    let mut candidate = now_ms;
    while existing.iter().any(|s| s.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{default_structure, Level};

    #[test]
    fn blank_names_are_rejected() {
        let levels = default_structure();
        assert_eq!(
            TournamentSnapshot::capture("   ", &levels, &[], 1),
            Err(StoreError::EmptySnapshotName)
        );
    }

    #[test]
    fn capture_trims_name_and_copies_levels() {
        let levels: LevelSequence = vec![Level::blinds(50, 100, 0, 10), Level::break_of(5)].into();
        let snap = TournamentSnapshot::capture("  Friday  ", &levels, &[], 1_700_000_000_000).unwrap();
        assert_eq!(snap.name, "Friday");
        assert_eq!(snap.id, "1700000000000");
        assert_eq!(snap.created_at, 1_700_000_000_000);
        assert_eq!(snap.levels, levels);
    }

    #[test]
    fn ids_stay_unique_within_the_same_millisecond() {
        let levels = default_structure();
        let first = TournamentSnapshot::capture("a", &levels, &[], 42).unwrap();
        let second = TournamentSnapshot::capture("b", &levels, &[first.clone()], 42).unwrap();
        assert_eq!(second.id, "43");
    }
}
