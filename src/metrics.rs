//! Pure computations derived from the store: player counts, average stack,
//! break lookahead and clock formatting. Nothing here mutates state.

use crate::level::{count_from_value, LevelSequence};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    #[serde(deserialize_with = "lenient_u64")]
    pub initial_players: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub rebuys: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub players_out: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub initial_stack: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            initial_players: 0,
            rebuys: 0,
            players_out: 0,
            initial_stack: crate::config::DEFAULT_INITIAL_STACK,
        }
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).unwrap_or(0))
}

/// Partial update for [`PlayerState`]; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStatePatch {
    pub initial_players: Option<u64>,
    pub rebuys: Option<u64>,
    pub players_out: Option<u64>,
    pub initial_stack: Option<u64>,
}

impl PlayerState {
    pub fn apply(&mut self, patch: PlayerStatePatch) {
        if let Some(v) = patch.initial_players {
            self.initial_players = v;
        }
        if let Some(v) = patch.rebuys {
            self.rebuys = v;
        }
        if let Some(v) = patch.players_out {
            self.players_out = v;
        }
        if let Some(v) = patch.initial_stack {
            self.initial_stack = v;
        }
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats::from(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_players: u64,
    pub current_players: u64,
    pub average_stack: u64,
}

impl From<&PlayerState> for PlayerStats {
    fn from(state: &PlayerState) -> Self {
        let total_players = state.initial_players.saturating_add(state.rebuys);
        let current_players = total_players.saturating_sub(state.players_out);
        let average_stack = if current_players > 0 {
            let chips = state.initial_stack as f64 * total_players as f64;
            (chips / current_players as f64).round() as u64
        } else {
            0
        };
        Self {
            total_players,
            current_players,
            average_stack,
        }
    }
}

/// Where the next break sits relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextBreak {
    /// The current level is a break.
    InProgress,
    In(u64),
    NoBreak,
}

impl NextBreak {
    /// Seconds until the break, `0` during a break and `-1` when none is ahead.
    pub fn as_seconds(self) -> i64 {
        match self {
            NextBreak::InProgress => 0,
            NextBreak::In(seconds) => seconds as i64,
            NextBreak::NoBreak => -1,
        }
    }
}

/// Walk forward from the current level summing full durations until a break.
///
/// The current level contributes its remaining time only, and the break itself
/// contributes nothing.
pub fn next_break(levels: &LevelSequence, current_index: usize, remaining_seconds: u32) -> NextBreak {
    if levels.at_clamped(current_index).is_break {
        return NextBreak::InProgress;
    }

    let mut total = remaining_seconds as u64;
    for level in levels.iter().skip(current_index + 1) {
        if level.is_break {
            return NextBreak::In(total);
        }
        total += level.duration_seconds() as u64;
    }
    NextBreak::NoBreak
}

pub fn next_break_seconds(levels: &LevelSequence, current_index: usize, remaining_seconds: u32) -> i64 {
    next_break(levels, current_index, remaining_seconds).as_seconds()
}

/// `MM:SS`, switching to `H:MM:SS` from one hour up.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

pub fn format_next_break(next: NextBreak) -> String {
    match next {
        NextBreak::NoBreak => "No Break".to_string(),
        NextBreak::InProgress => "Break Time!".to_string(),
        NextBreak::In(seconds) => format_clock(seconds),
    }
}

/// Group digits in threes: `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn example_levels() -> LevelSequence {
        vec![
            Level::blinds(100, 200, 0, 20),
            Level::break_of(15),
            Level::blinds(200, 400, 0, 20),
        ]
        .into()
    }

    #[test]
    fn break_right_after_current_level_counts_remaining_only() {
        assert_eq!(next_break_seconds(&example_levels(), 0, 1200), 1200);
    }

    #[test]
    fn break_in_progress_is_zero() {
        let levels = example_levels();
        assert_eq!(next_break(&levels, 1, 900), NextBreak::InProgress);
        assert_eq!(next_break_seconds(&levels, 1, 900), 0);
    }

    #[test]
    fn no_break_ahead_is_minus_one() {
        assert_eq!(next_break_seconds(&example_levels(), 2, 30), -1);
    }

    #[test]
    fn intervening_levels_add_full_durations() {
        let levels: LevelSequence = vec![
            Level::blinds(100, 200, 0, 20),
            Level::blinds(200, 400, 0, 10),
            Level::blinds(300, 600, 0, 5),
            Level::break_of(15),
        ]
        .into();
        assert_eq!(next_break(&levels, 0, 42), NextBreak::In(42 + 600 + 300));
    }

    #[test]
    fn average_stack_guards_zero_players() {
        let state = PlayerState {
            initial_players: 9,
            rebuys: 1,
            players_out: 10,
            initial_stack: 1000,
        };
        let stats = state.stats();
        assert_eq!(stats.total_players, 10);
        assert_eq!(stats.current_players, 0);
        assert_eq!(stats.average_stack, 0);
    }

    #[test]
    fn average_stack_rounds() {
        let state = PlayerState {
            initial_players: 10,
            rebuys: 0,
            players_out: 3,
            initial_stack: 1000,
        };
        assert_eq!(state.stats().average_stack, 1429);
    }

    #[test]
    fn more_out_than_entered_saturates() {
        let state = PlayerState {
            initial_players: 2,
            rebuys: 0,
            players_out: 5,
            initial_stack: 1000,
        };
        assert_eq!(state.stats().current_players, 0);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut state = PlayerState::default();
        state.apply(PlayerStatePatch {
            rebuys: Some(4),
            ..Default::default()
        });
        assert_eq!(state.rebuys, 4);
        assert_eq!(state.initial_stack, 20_000);
    }

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1200), "20:00");
        assert_eq!(format_clock(3725), "1:02:05");
        assert_eq!(format_next_break(NextBreak::NoBreak), "No Break");
        assert_eq!(format_next_break(NextBreak::InProgress), "Break Time!");
        assert_eq!(format_next_break(NextBreak::In(61)), "01:01");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn player_state_tolerates_stale_and_bad_fields() {
        let json = r#"{"initialPlayers":9,"currentPlayers":7,"rebuys":"2","playersOut":null}"#;
        let state: PlayerState = serde_json::from_str(json).unwrap();
        assert_eq!(state.initial_players, 9);
        assert_eq!(state.rebuys, 2);
        assert_eq!(state.players_out, 0);
        assert_eq!(state.initial_stack, 20_000);
    }
}
