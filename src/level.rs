//! Blind levels and the ordered level sequence.
//!
//! A [`LevelSequence`] is never empty: every constructor and every edit that
//! could leave it empty either refuses or falls back to a single default level.
//! Level ids are positions, reassigned after every structural edit.
//!
//! Incoming levels (from the editor or from storage) arrive as [`LevelDraft`]s
//! with every field optional and are normalized on the way in:
//! - `id` becomes the array index
//! - a missing duration becomes 0 minutes
//! - a missing break flag becomes `false`
//! - blinds and ante are zeroed on breaks

use crate::config::{
    BLIND_LADDER, DEFAULT_BREAK_MINUTES, DEFAULT_LEVEL_MINUTES, DEFAULT_STRUCTURE_MINUTES,
    FIRST_SUGGESTED_SMALL_BLIND, MIN_SUGGESTED_ANTE, SECONDS_PER_MINUTE,
};
use crate::error::{Result, StoreError};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LevelDraft")]
pub struct Level {
    pub id: usize,
    pub small_blind: u64,
    pub big_blind: u64,
    pub ante: u64,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub is_break: bool,
}

impl Level {
    pub fn blinds(small_blind: u64, big_blind: u64, ante: u64, duration_minutes: u32) -> Self {
        Self {
            id: 0,
            small_blind,
            big_blind,
            ante,
            duration_minutes,
            is_break: false,
        }
    }

    pub fn break_of(duration_minutes: u32) -> Self {
        Self {
            id: 0,
            small_blind: 0,
            big_blind: 0,
            ante: 0,
            duration_minutes,
            is_break: true,
        }
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(SECONDS_PER_MINUTE)
    }

    /// "100 / 200 (200)" style label; breaks read "Break".
    pub fn stakes_label(&self) -> String {
        if self.is_break {
            "Break".to_string()
        } else if self.ante > 0 {
            format!("{} / {} ({})", self.small_blind, self.big_blind, self.ante)
        } else {
            format!("{} / {}", self.small_blind, self.big_blind)
        }
    }

    fn normalized(mut self, id: usize) -> Self {
        self.id = id;
        if self.is_break {
            self.small_blind = 0;
            self.big_blind = 0;
            self.ante = 0;
        }
        self
    }
}

impl Default for Level {
    /// The level an emptied structure starts from.
    fn default() -> Self {
        Level::blinds(0, 0, 0, DEFAULT_LEVEL_MINUTES)
    }
}

/// A level as supplied by an editor or a stored record; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelDraft {
    #[serde(deserialize_with = "lenient_count")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub small_blind: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub big_blind: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub ante: Option<u64>,
    #[serde(rename = "duration", deserialize_with = "lenient_count")]
    pub duration_minutes: Option<u64>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_break: Option<bool>,
}

impl From<LevelDraft> for Level {
    fn from(draft: LevelDraft) -> Self {
        let level = Level {
            id: draft.id.unwrap_or(0) as usize,
            small_blind: draft.small_blind.unwrap_or(0),
            big_blind: draft.big_blind.unwrap_or(0),
            ante: draft.ante.unwrap_or(0),
            duration_minutes: draft
                .duration_minutes
                .map(|m| m.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
            is_break: draft.is_break.unwrap_or(false),
        };
        let id = level.id;
        level.normalized(id)
    }
}

impl From<Level> for LevelDraft {
    fn from(level: Level) -> Self {
        Self {
            id: Some(level.id as u64),
            small_blind: Some(level.small_blind),
            big_blind: Some(level.big_blind),
            ante: Some(level.ante),
            duration_minutes: Some(level.duration_minutes as u64),
            is_break: Some(level.is_break),
        }
    }
}

/// Accept integers, non-negative floats and numeric strings; anything else reads as absent.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_bool()))
}

pub(crate) fn count_from_value(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Ordered, never-empty list of levels; also the playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Level>", into = "Vec<Level>")]
pub struct LevelSequence {
    levels: Vec<Level>,
}

impl LevelSequence {
    /// Normalize drafts into a sequence. An empty input yields the single default level.
    pub fn from_drafts<I>(drafts: I) -> Self
    where
        I: IntoIterator<Item = LevelDraft>,
    {
        drafts.into_iter().map(Level::from).collect::<Vec<_>>().into()
    }

    pub fn single_default() -> Self {
        vec![Level::default()].into()
    }

    pub fn as_slice(&self) -> &[Level] {
        &self.levels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Level at `index`, clamped into range.
    pub fn at_clamped(&self, index: usize) -> &Level {
        &self.levels[index.min(self.last_index())]
    }

    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    /// Append a level suggested from the current tail of the structure.
    pub fn push_suggested_level(&mut self) -> &Level {
        let next = suggest_next_level(&self.levels);
        self.push(next)
    }

    pub fn push_break(&mut self) -> &Level {
        self.push(Level::break_of(DEFAULT_BREAK_MINUTES))
    }

    fn push(&mut self, level: Level) -> &Level {
        let id = self.levels.len();
        self.levels.push(level.normalized(id));
        &self.levels[id]
    }

    /// Remove the level at `index`, renumbering the rest.
    ///
    /// Returns `Ok(false)` for an out-of-range index and refuses to remove the
    /// only remaining level.
    pub fn remove(&mut self, index: usize) -> Result<bool> {
        if index >= self.levels.len() {
            return Ok(false);
        }
        if self.levels.len() == 1 {
            return Err(StoreError::LastLevel);
        }
        self.levels.remove(index);
        self.renumber();
        Ok(true)
    }

    /// Replace one level in place. Out-of-range indices are ignored.
    pub fn replace_at(&mut self, index: usize, level: Level) -> bool {
        match self.levels.get_mut(index) {
            Some(slot) => {
                *slot = level.normalized(index);
                true
            }
            None => false,
        }
    }

    /// Set every non-break level to `minutes`; breaks keep their own length.
    pub fn set_all_durations(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(StoreError::InvalidDuration(minutes));
        }
        for level in self.levels.iter_mut().filter(|l| !l.is_break) {
            level.duration_minutes = minutes;
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (i, level) in self.levels.iter_mut().enumerate() {
            level.id = i;
        }
    }
}

impl Default for LevelSequence {
    fn default() -> Self {
        default_structure()
    }
}

impl From<Vec<Level>> for LevelSequence {
    fn from(levels: Vec<Level>) -> Self {
        if levels.is_empty() {
            debug!("Empty level list supplied, inserting default level");
            return Self::single_default();
        }
        let levels = levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| level.normalized(i))
            .collect();
        Self { levels }
    }
}

impl From<LevelSequence> for Vec<Level> {
    fn from(sequence: LevelSequence) -> Self {
        sequence.levels
    }
}

impl<'a> IntoIterator for &'a LevelSequence {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

/// The structure a fresh installation starts with: 24 twenty-minute levels.
pub fn default_structure() -> LevelSequence {
    const STEPS: [(u64, u64); 24] = [
        (100, 200),
        (200, 300),
        (200, 400),
        (300, 500),
        (300, 600),
        (400, 800),
        (500, 1_000),
        (600, 1_200),
        (1_000, 1_500),
        (1_000, 2_000),
        (1_500, 2_500),
        (1_500, 3_000),
        (2_000, 4_000),
        (2_500, 5_000),
        (3_000, 6_000),
        (4_000, 8_000),
        (5_000, 10_000),
        (6_000, 12_000),
        (10_000, 15_000),
        (10_000, 20_000),
        (15_000, 25_000),
        (15_000, 30_000),
        (20_000, 40_000),
        (25_000, 50_000),
    ];
    STEPS
        .iter()
        .map(|&(sb, bb)| Level::blinds(sb, bb, bb, DEFAULT_STRUCTURE_MINUTES))
        .collect::<Vec<_>>()
        .into()
}

/// Smallest ladder value above `current`, or 1.5x rounded up to a clean step past the ladder.
pub fn next_blind_value(current: u64) -> u64 {
    if let Some(&value) = BLIND_LADDER.iter().find(|&&v| v > current) {
        return value;
    }

    let approx = current as f64 * 1.5;
    let step: u64 = if approx < 100.0 {
        5
    } else if approx < 1_000.0 {
        50
    } else if approx < 10_000.0 {
        500
    } else {
        5_000
    };
    (approx / step as f64).ceil() as u64 * step
}

/// Suggest the level that should follow `levels`.
///
/// Uses the last stake-bearing level as reference (trailing breaks are
/// skipped). Big blind is double the small blind, the ante keeps its ratio to
/// the big blind and the duration carries over. Without any stake-bearing
/// level the suggestion is 25/50 for 15 minutes.
pub fn suggest_next_level(levels: &[Level]) -> Level {
    let Some(reference) = levels.iter().rev().find(|l| !l.is_break) else {
        return Level::blinds(
            FIRST_SUGGESTED_SMALL_BLIND,
            FIRST_SUGGESTED_SMALL_BLIND * 2,
            0,
            DEFAULT_LEVEL_MINUTES,
        );
    };

    let small_blind = next_blind_value(reference.small_blind);
    let big_blind = small_blind * 2;
    let ante = if reference.ante == 0 {
        0
    } else if reference.big_blind == 0 {
        MIN_SUGGESTED_ANTE
    } else {
        let ratio = reference.ante as f64 / reference.big_blind as f64;
        let rounded = (big_blind as f64 * ratio / 5.0).round() as u64 * 5;
        rounded.max(MIN_SUGGESTED_ANTE)
    };

    Level::blinds(small_blind, big_blind, ante, reference.duration_minutes)
}
