//! Reducer wrapping the tournament store for Yew.
//!
//! `Action` is the only way the UI changes anything; each reduction bumps
//! `revision`, which the persistence effect watches.

use blind_clock::display::{DisplaySettingsPatch, SoundType};
use blind_clock::level::{Level, LevelDraft};
use blind_clock::metrics::PlayerStatePatch;
use blind_clock::persistence::{self, BrowserStorage};
use blind_clock::prizes::{PrizeAmount, PrizeType};
use blind_clock::{StoreError, TimerEvent, TournamentStore};
use log::warn;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Timer
    ToggleRunning,
    Tick,
    NextLevel,
    PreviousLevel,
    ResetTimer,
    // Level structure
    UpdateLevel(usize, Level),
    DeleteLevel(usize),
    MoveLevel { from: usize, to: usize },
    AddLevel,
    AddBreak,
    SetAllDurations(u32),
    ResetLevels,
    // Saved tournaments
    SaveSnapshot(String),
    LoadSnapshot(String),
    DeleteSnapshot(String),
    // Details
    SetTournamentName(String),
    UpdatePlayers(PlayerStatePatch),
    UpdateDisplay(DisplaySettingsPatch),
    UpdateSound(SoundType, SoundType),
    // Prizes
    AddPrize,
    DeletePrize(u32),
    SetPrizeType(u32, PrizeType),
    SetPrizeAmount(u32, PrizeAmount),
    ResetPrizes,
    // Messages
    ReportError(String),
    DismissMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub store: TournamentStore,
    /// Bumped on every reduction; drives persistence.
    pub revision: u64,
    pub last_event: Option<TimerEvent>,
    /// Bumped whenever `last_event` is replaced.
    pub event_seq: u64,
    pub message: Option<StatusMessage>,
}

impl AppState {
    /// Load from `localStorage`, paused.
    pub fn restore() -> Self {
        Self {
            store: persistence::load(&BrowserStorage),
            revision: 0,
            last_event: None,
            event_seq: 0,
            message: None,
        }
    }

    fn report(&mut self, result: Result<(), StoreError>, success: Option<&str>) {
        self.message = match result {
            Ok(()) => success.map(|s| StatusMessage::Success(s.to_string())),
            Err(e) => {
                warn!("{}", e);
                Some(StatusMessage::Error(e.to_string()))
            }
        };
    }

    fn apply(&mut self, action: Action) {
        let store = &mut self.store;
        match action {
            Action::ToggleRunning => store.toggle_running(),
            Action::Tick => {
                if let Some(event) = store.tick() {
                    self.last_event = Some(event);
                    self.event_seq += 1;
                }
            }
            Action::NextLevel => {
                store.next_level();
            }
            Action::PreviousLevel => {
                store.previous_level();
            }
            Action::ResetTimer => store.reset_timer(),
            Action::UpdateLevel(index, level) => {
                store.update_level(index, level);
            }
            Action::DeleteLevel(index) => {
                let result = store.delete_level(index);
                self.report(result, None);
            }
            Action::MoveLevel { from, to } => {
                let mut drafts: Vec<LevelDraft> =
                    store.levels().iter().cloned().map(LevelDraft::from).collect();
                if from < drafts.len() && to < drafts.len() && from != to {
                    let moved = drafts.remove(from);
                    drafts.insert(to, moved);
                    store.replace_sequence(drafts);
                }
            }
            Action::AddLevel => {
                store.add_level();
                self.message = Some(StatusMessage::Success("New blind level added".into()));
            }
            Action::AddBreak => {
                store.add_break();
            }
            Action::SetAllDurations(minutes) => {
                let result = store.set_all_durations(minutes);
                self.report(result, Some("Duration applied to all levels"));
            }
            Action::ResetLevels => {
                store.reset_levels();
                self.message = Some(StatusMessage::Success("Blind levels have been reset".into()));
            }
            Action::SaveSnapshot(name) => {
                let result = store.save_snapshot(&name).map(|_| ());
                self.report(result, Some("Tournament settings saved"));
            }
            Action::LoadSnapshot(id) => {
                if store.load_snapshot(&id) {
                    self.message = Some(StatusMessage::Success("Tournament settings loaded".into()));
                }
            }
            Action::DeleteSnapshot(id) => {
                if store.delete_snapshot(&id) {
                    self.message = Some(StatusMessage::Success("Tournament settings deleted".into()));
                }
            }
            Action::SetTournamentName(name) => store.set_tournament_name(name),
            Action::UpdatePlayers(patch) => store.update_player_state(patch),
            Action::UpdateDisplay(patch) => store.update_display_settings(patch),
            Action::UpdateSound(warning, level_change) => {
                store.update_sound_settings(warning, level_change)
            }
            Action::AddPrize => store.add_prize(),
            Action::DeletePrize(position) => {
                let result = store.delete_prize(position);
                self.report(result, None);
            }
            Action::SetPrizeType(position, prize_type) => {
                let result = store.set_prize_type(position, prize_type);
                self.report(result, None);
            }
            Action::SetPrizeAmount(position, amount) => {
                let result = store.set_prize_amount(position, amount);
                self.report(result, None);
            }
            Action::ResetPrizes => store.reset_prizes(),
            Action::ReportError(msg) => self.message = Some(StatusMessage::Error(msg)),
            Action::DismissMessage => self.message = None,
        }
    }
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.revision = next.revision.wrapping_add(1);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(levels: Vec<Level>) -> Rc<AppState> {
        let mut store = TournamentStore::default();
        store.replace_sequence(levels.into_iter().map(LevelDraft::from));
        Rc::new(AppState {
            store,
            revision: 0,
            last_event: None,
            event_seq: 0,
            message: None,
        })
    }

    #[test]
    fn ticks_record_expiry_events() {
        let mut state = state_with(vec![Level::blinds(1, 2, 0, 1), Level::break_of(1)]);
        state = state.reduce(Action::ToggleRunning);
        for _ in 0..60 {
            state = state.reduce(Action::Tick);
        }
        assert_eq!(state.event_seq, 1);
        assert_eq!(
            state.last_event,
            Some(TimerEvent::LevelExpired { level_index: 0, final_level: false })
        );
        assert_eq!(state.revision, 61);
    }

    #[test]
    fn validation_failures_become_messages() {
        let state = state_with(vec![Level::blinds(1, 2, 0, 1)]);
        let state = state.reduce(Action::SaveSnapshot("  ".into()));
        assert!(matches!(state.message, Some(StatusMessage::Error(_))));
        assert!(state.store.snapshots().is_empty());
        let state = state.reduce(Action::DismissMessage);
        assert_eq!(state.message, None);
    }

    #[test]
    fn move_level_reorders_and_rewinds() {
        let state = state_with(vec![
            Level::blinds(1, 2, 0, 1),
            Level::blinds(2, 4, 0, 1),
            Level::break_of(5),
        ]);
        let state = state.reduce(Action::NextLevel);
        let state = state.reduce(Action::MoveLevel { from: 2, to: 0 });
        assert!(state.store.levels().first().is_break);
        assert_eq!(state.store.current_level_index(), 0);
        assert!(!state.store.is_running());
    }
}
