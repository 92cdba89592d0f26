//! Poker tournament blind clock.
//!
//! The library holds the whole tournament model: the level structure, the
//! countdown engine, derived metrics, saved structures and the storage record.
//! The Yew front-end in `main.rs` only dispatches into [`store::TournamentStore`].

use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod display;
pub mod error;
pub mod level;
pub mod metrics;
pub mod persistence;
pub mod prizes;
pub mod snapshot;
pub mod store;
pub mod timer;

pub use error::StoreError;
pub use level::{Level, LevelDraft, LevelSequence};
pub use metrics::{NextBreak, PlayerState, PlayerStats};
pub use store::TournamentStore;
pub use timer::TimerEvent;

/// Read-only view of the stored tournament for pages that do not run the app.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub tournament_name: String,
    pub level_number: usize,
    pub level_count: usize,
    pub is_break: bool,
    pub stakes: String,
    pub remaining: String,
    pub next_break: String,
    pub players: PlayerStats,
}

impl From<&TournamentStore> for TournamentSummary {
    fn from(store: &TournamentStore) -> Self {
        Self {
            tournament_name: store.display_name().to_string(),
            level_number: store.current_level_index() + 1,
            level_count: store.levels().len(),
            is_break: store.is_break(),
            stakes: store.current_level().stakes_label(),
            remaining: metrics::format_clock(store.remaining_seconds() as u64),
            next_break: metrics::format_next_break(store.next_break()),
            players: store.player_stats(),
        }
    }
}

/// Summary of the tournament currently saved in `localStorage`.
///
/// # Returns
/// A plain JS object mirroring [`TournamentSummary`], or `null` if it cannot be
/// converted.
#[wasm_bindgen]
pub fn stored_tournament_summary() -> JsValue {
    let store = persistence::load(&persistence::BrowserStorage);
    let summary = TournamentSummary::from(&store);
    match serde_wasm_bindgen::to_value(&summary) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to convert tournament summary: {}", e);
            JsValue::NULL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_a_fresh_store() {
        let summary = TournamentSummary::from(&TournamentStore::default());
        assert_eq!(summary.tournament_name, "Tournament");
        assert_eq!(summary.level_number, 1);
        assert_eq!(summary.level_count, 24);
        assert_eq!(summary.stakes, "100 / 200 (200)");
        assert_eq!(summary.remaining, "20:00");
        assert_eq!(summary.next_break, "No Break");
    }
}
