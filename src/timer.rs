//! Countdown state machine over a [`LevelSequence`].
//!
//! The engine only holds a cursor; the levels themselves are borrowed on every
//! call so the break flag is always read from the level, never cached.

use crate::level::{Level, LevelSequence};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Observable transitions produced by [`TimerState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Remaining time just reached zero. The advance happens on the following tick.
    LevelExpired { level_index: usize, final_level: bool },
    LevelAdvanced { from: usize, to: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    current_level_index: usize,
    remaining_seconds: u32,
    is_running: bool,
}

impl TimerState {
    /// Stopped at the first level with its full duration.
    pub fn at_start(levels: &LevelSequence) -> Self {
        Self {
            current_level_index: 0,
            remaining_seconds: levels.first().duration_seconds(),
            is_running: false,
        }
    }

    /// Stopped at a previously saved position, clamped into the given sequence.
    pub fn restored(levels: &LevelSequence, index: usize, remaining_seconds: u32) -> Self {
        let index = index.min(levels.last_index());
        let full = levels.at_clamped(index).duration_seconds();
        Self {
            current_level_index: index,
            remaining_seconds: remaining_seconds.min(full),
            is_running: false,
        }
    }

    pub fn current_level_index(&self) -> usize {
        self.current_level_index
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn current_level<'a>(&self, levels: &'a LevelSequence) -> &'a Level {
        levels.at_clamped(self.current_level_index)
    }

    pub fn is_break(&self, levels: &LevelSequence) -> bool {
        self.current_level(levels).is_break
    }

    pub fn start(&mut self) {
        self.is_running = true;
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Advance the countdown by one second.
    ///
    /// A tick that finds the clock already at zero moves to the next level
    /// instead of counting; at the final level the clock stays frozen at zero.
    pub fn tick(&mut self, levels: &LevelSequence) -> Option<TimerEvent> {
        if !self.is_running {
            return None;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            if self.remaining_seconds == 0 {
                let final_level = self.current_level_index >= levels.last_index();
                info!(
                    "Level {} expired{}",
                    self.current_level_index + 1,
                    if final_level { " (final level)" } else { "" }
                );
                return Some(TimerEvent::LevelExpired {
                    level_index: self.current_level_index,
                    final_level,
                });
            }
            return None;
        }

        let from = self.current_level_index;
        let to = from + 1;
        if to >= levels.len() {
            return None;
        }
        self.enter(levels, to);
        info!("Advanced from level {} to level {}", from + 1, to + 1);
        Some(TimerEvent::LevelAdvanced { from, to })
    }

    /// Manual forward navigation; resumes play at the new level.
    pub fn next_level(&mut self, levels: &LevelSequence) -> bool {
        if self.current_level_index >= levels.last_index() {
            debug!("Already at the last level, ignoring next");
            return false;
        }
        self.enter(levels, self.current_level_index + 1);
        self.is_running = true;
        true
    }

    /// Manual backward navigation; resumes play at the new level.
    pub fn previous_level(&mut self, levels: &LevelSequence) -> bool {
        if self.current_level_index == 0 {
            debug!("Already at the first level, ignoring previous");
            return false;
        }
        self.enter(levels, self.current_level_index - 1);
        self.is_running = true;
        true
    }

    /// Back to the first level, full duration, stopped.
    pub fn reset(&mut self, levels: &LevelSequence) {
        *self = Self::at_start(levels);
    }

    /// Pull the cursor back into range after levels were removed and reload the
    /// full duration of whatever level it now points to.
    pub fn clamp_into(&mut self, levels: &LevelSequence) {
        let index = self.current_level_index.min(levels.last_index());
        self.enter(levels, index);
    }

    fn enter(&mut self, levels: &LevelSequence, index: usize) {
        self.current_level_index = index;
        self.remaining_seconds = levels.at_clamped(index).duration_seconds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_levels() -> LevelSequence {
        vec![
            Level::blinds(100, 200, 0, 1),
            Level::break_of(2),
            Level::blinds(200, 400, 0, 3),
        ]
        .into()
    }

    #[test]
    fn starts_stopped_at_first_level() {
        let levels = three_levels();
        let timer = TimerState::at_start(&levels);
        assert_eq!(timer.current_level_index(), 0);
        assert_eq!(timer.remaining_seconds(), 60);
        assert!(!timer.is_running());
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let levels = three_levels();
        let mut timer = TimerState::at_start(&levels);
        assert_eq!(timer.tick(&levels), None);
        assert_eq!(timer.remaining_seconds(), 60);
    }

    #[test]
    fn expiry_then_advance_on_following_tick() {
        let levels = three_levels();
        let mut timer = TimerState::at_start(&levels);
        timer.start();
        for _ in 0..59 {
            assert_eq!(timer.tick(&levels), None);
        }
        assert_eq!(
            timer.tick(&levels),
            Some(TimerEvent::LevelExpired { level_index: 0, final_level: false })
        );
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.current_level_index(), 0);

        assert_eq!(
            timer.tick(&levels),
            Some(TimerEvent::LevelAdvanced { from: 0, to: 1 })
        );
        assert_eq!(timer.remaining_seconds(), 120);
        assert!(timer.is_break(&levels));
        assert!(timer.is_running());
    }

    #[test]
    fn final_level_freezes_at_zero() {
        let levels: LevelSequence = vec![Level::blinds(100, 200, 0, 1)].into();
        let mut timer = TimerState::at_start(&levels);
        timer.start();
        let events: Vec<_> = (0..60).filter_map(|_| timer.tick(&levels)).collect();
        assert_eq!(
            events,
            vec![TimerEvent::LevelExpired { level_index: 0, final_level: true }]
        );
        assert_eq!(timer.tick(&levels), None);
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.current_level_index(), 0);
        assert!(timer.is_running());
    }

    #[test]
    fn zero_length_level_is_skipped_on_next_tick() {
        let levels: LevelSequence =
            vec![Level::blinds(100, 200, 0, 0), Level::blinds(200, 400, 0, 5)].into();
        let mut timer = TimerState::at_start(&levels);
        timer.start();
        assert_eq!(
            timer.tick(&levels),
            Some(TimerEvent::LevelAdvanced { from: 0, to: 1 })
        );
        assert_eq!(timer.remaining_seconds(), 300);
    }

    #[test]
    fn manual_navigation_clamps_and_resumes() {
        let levels = three_levels();
        let mut timer = TimerState::at_start(&levels);
        assert!(!timer.previous_level(&levels));
        assert!(!timer.is_running());

        assert!(timer.next_level(&levels));
        assert!(timer.next_level(&levels));
        assert!(!timer.next_level(&levels));
        assert_eq!(timer.current_level_index(), 2);
        assert_eq!(timer.remaining_seconds(), 180);
        assert!(timer.is_running());

        timer.pause();
        assert!(timer.previous_level(&levels));
        assert_eq!(timer.remaining_seconds(), 120);
        assert!(timer.is_running());
    }

    #[test]
    fn reset_rewinds_and_stops() {
        let levels = three_levels();
        let mut timer = TimerState::at_start(&levels);
        timer.next_level(&levels);
        timer.tick(&levels);
        timer.reset(&levels);
        assert_eq!(timer, TimerState::at_start(&levels));
    }

    #[test]
    fn restored_position_is_clamped() {
        let levels = three_levels();
        let timer = TimerState::restored(&levels, 9, 10_000);
        assert_eq!(timer.current_level_index(), 2);
        assert_eq!(timer.remaining_seconds(), 180);
        assert!(!timer.is_running());
    }
}
