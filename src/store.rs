//! The tournament store: one owned object holding the whole timer state.
//!
//! Every change goes through a method here. Structural edits to the level
//! list (replace, bulk duration, reset, loading a snapshot) always rewind to
//! the first level and stop the clock; appending levels or editing a single
//! level leaves playback alone.

use crate::config::DEFAULT_TOURNAMENT_TITLE;
use crate::display::{DisplaySettings, DisplaySettingsPatch, SoundType};
use crate::error::Result;
use crate::level::{Level, LevelDraft, LevelSequence};
use crate::metrics::{next_break, NextBreak, PlayerState, PlayerStatePatch, PlayerStats};
use crate::prizes::{PrizeAmount, PrizeEntry, PrizeList, PrizeType};
use crate::snapshot::{now_millis, TournamentSnapshot};
use crate::timer::{TimerEvent, TimerState};
use log::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentStore {
    levels: LevelSequence,
    timer: TimerState,
    snapshots: Vec<TournamentSnapshot>,
    tournament_name: String,
    display: DisplaySettings,
    players: PlayerState,
    prizes: PrizeList,
}

impl Default for TournamentStore {
    fn default() -> Self {
        Self::with_levels(LevelSequence::default())
    }
}

/// Everything needed to rebuild a store; produced by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreParts {
    pub levels: LevelSequence,
    pub current_level_index: usize,
    pub remaining_seconds: Option<u32>,
    pub snapshots: Vec<TournamentSnapshot>,
    pub tournament_name: String,
    pub display: DisplaySettings,
    pub players: PlayerState,
    pub prizes: PrizeList,
}

impl TournamentStore {
    pub fn with_levels(levels: LevelSequence) -> Self {
        let timer = TimerState::at_start(&levels);
        Self {
            levels,
            timer,
            snapshots: Vec::new(),
            tournament_name: String::new(),
            display: DisplaySettings::default(),
            players: PlayerState::default(),
            prizes: PrizeList::default(),
        }
    }

    /// Rebuild from restored parts. The clock is always stopped.
    pub fn from_parts(parts: StoreParts) -> Self {
        // Without a stored time the level starts from its full duration.
        let timer = TimerState::restored(
            &parts.levels,
            parts.current_level_index,
            parts.remaining_seconds.unwrap_or(u32::MAX),
        );
        Self {
            levels: parts.levels,
            timer,
            snapshots: parts.snapshots,
            tournament_name: parts.tournament_name,
            display: parts.display,
            players: parts.players,
            prizes: parts.prizes,
        }
    }

    // ── reads ────────────────────────────────────────────────────────────────

    pub fn levels(&self) -> &LevelSequence {
        &self.levels
    }

    pub fn current_level_index(&self) -> usize {
        self.timer.current_level_index()
    }

    pub fn current_level(&self) -> &Level {
        self.timer.current_level(&self.levels)
    }

    /// The level after the current one, `None` at the end of the structure.
    pub fn upcoming_level(&self) -> Option<&Level> {
        self.levels.get(self.current_level_index() + 1)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_break(&self) -> bool {
        self.timer.is_break(&self.levels)
    }

    pub fn snapshots(&self) -> &[TournamentSnapshot] {
        &self.snapshots
    }

    pub fn tournament_name(&self) -> &str {
        &self.tournament_name
    }

    /// Name for the header; falls back to a generic title.
    pub fn display_name(&self) -> &str {
        if self.tournament_name.trim().is_empty() {
            DEFAULT_TOURNAMENT_TITLE
        } else {
            &self.tournament_name
        }
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn players(&self) -> &PlayerState {
        &self.players
    }

    pub fn player_stats(&self) -> PlayerStats {
        self.players.stats()
    }

    pub fn prizes(&self) -> &[PrizeEntry] {
        self.prizes.entries()
    }

    pub fn prize_list(&self) -> &PrizeList {
        &self.prizes
    }

    pub fn prize_pool_total(&self, prize_type: PrizeType) -> f64 {
        self.prizes.total(prize_type)
    }

    pub fn next_break(&self) -> NextBreak {
        next_break(
            &self.levels,
            self.current_level_index(),
            self.remaining_seconds(),
        )
    }

    pub fn next_break_seconds(&self) -> i64 {
        self.next_break().as_seconds()
    }

    // ── timer ────────────────────────────────────────────────────────────────

    pub fn start(&mut self) {
        self.timer.start();
    }

    pub fn pause(&mut self) {
        self.timer.pause();
    }

    pub fn toggle_running(&mut self) {
        if self.timer.is_running() {
            self.timer.pause();
        } else {
            self.timer.start();
        }
    }

    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.timer.tick(&self.levels)
    }

    pub fn next_level(&mut self) -> bool {
        self.timer.next_level(&self.levels)
    }

    pub fn previous_level(&mut self) -> bool {
        self.timer.previous_level(&self.levels)
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset(&self.levels);
    }

    // ── level structure ──────────────────────────────────────────────────────

    /// Replace the whole structure (editor save, reorder). Rewinds and stops.
    pub fn replace_sequence<I>(&mut self, drafts: I)
    where
        I: IntoIterator<Item = LevelDraft>,
    {
        self.levels = LevelSequence::from_drafts(drafts);
        self.timer.reset(&self.levels);
        info!("Level structure replaced ({} levels)", self.levels.len());
    }

    pub fn delete_level(&mut self, index: usize) -> Result<()> {
        if self.levels.remove(index)? {
            self.timer.clamp_into(&self.levels);
            debug!("Deleted level {}", index + 1);
        }
        Ok(())
    }

    pub fn add_level(&mut self) -> &Level {
        self.levels.push_suggested_level()
    }

    pub fn add_break(&mut self) -> &Level {
        self.levels.push_break()
    }

    /// Edit one level in place. Playback position and remaining time are kept.
    pub fn update_level(&mut self, index: usize, level: Level) -> bool {
        self.levels.replace_at(index, level)
    }

    /// Apply one duration to every non-break level. Rewinds and stops.
    pub fn set_all_durations(&mut self, minutes: u32) -> Result<()> {
        self.levels.set_all_durations(minutes)?;
        self.timer.reset(&self.levels);
        info!("All level durations set to {} minutes", minutes);
        Ok(())
    }

    /// Back to a single empty level. Rewinds and stops.
    pub fn reset_levels(&mut self) {
        self.levels = LevelSequence::single_default();
        self.timer.reset(&self.levels);
    }

    // ── snapshots ────────────────────────────────────────────────────────────

    pub fn save_snapshot(&mut self, name: &str) -> Result<&TournamentSnapshot> {
        self.save_snapshot_at(name, now_millis())
    }

    pub fn save_snapshot_at(&mut self, name: &str, now_ms: u64) -> Result<&TournamentSnapshot> {
        let snapshot = TournamentSnapshot::capture(name, &self.levels, &self.snapshots, now_ms)?;
        info!("Saved tournament '{}' as {}", snapshot.name, snapshot.id);
        self.snapshots.push(snapshot);
        Ok(&self.snapshots[self.snapshots.len() - 1])
    }

    /// Load a saved structure and adopt its name. Unknown ids are ignored.
    pub fn load_snapshot(&mut self, id: &str) -> bool {
        let Some(snapshot) = self.snapshots.iter().find(|s| s.id == id) else {
            debug!("No saved tournament with id {}", id);
            return false;
        };
        let levels: LevelSequence = snapshot.levels.as_slice().to_vec().into();
        self.tournament_name = snapshot.name.clone();
        self.levels = levels;
        self.timer.reset(&self.levels);
        info!("Loaded tournament '{}'", self.tournament_name);
        true
    }

    pub fn delete_snapshot(&mut self, id: &str) -> bool {
        let before = self.snapshots.len();
        self.snapshots.retain(|s| s.id != id);
        before != self.snapshots.len()
    }

    // ── tournament details ───────────────────────────────────────────────────

    pub fn set_tournament_name(&mut self, name: impl Into<String>) {
        self.tournament_name = name.into();
    }

    pub fn update_player_state(&mut self, patch: PlayerStatePatch) {
        self.players.apply(patch);
    }

    pub fn update_display_settings(&mut self, patch: DisplaySettingsPatch) {
        self.display.apply(patch);
    }

    pub fn update_sound_settings(&mut self, warning: SoundType, level_change: SoundType) {
        self.display.warning_sound_type = warning;
        self.display.level_change_sound_type = level_change;
    }

    // ── prizes ───────────────────────────────────────────────────────────────

    /// Replace the prize list wholesale; positions are re-derived.
    pub fn update_prizes(&mut self, prizes: Vec<PrizeEntry>) {
        self.prizes = prizes.into();
    }

    pub fn add_prize(&mut self) {
        self.prizes.push_default();
    }

    pub fn delete_prize(&mut self, position: u32) -> Result<()> {
        self.prizes.remove(position)
    }

    pub fn set_prize_type(&mut self, position: u32, prize_type: PrizeType) -> Result<()> {
        self.prizes.set_type(position, prize_type)
    }

    pub fn set_prize_amount(&mut self, position: u32, amount: PrizeAmount) -> Result<()> {
        self.prizes.set_amount(position, amount)
    }

    pub fn reset_prizes(&mut self) {
        self.prizes = PrizeList::default();
    }
}
