//! view.rs
//!
//! The single-day screen, independent of how it is drawn.
//!
//! # Overview
//!
//! - **`initial_display_day(now)`**: Which day to open on.
//! - **`DayNavigator`**: Previous/next movement clamped to days 1 to 40.
//! - **`DayView`**: Everything needed to draw one day's card.
//! - **`Progress`**: The countdown header and the "n completed" line.
//! - **`toggle_day`**: Marks a day done or not done, refusing locked days.
//! - **`confirm_and_clear`**: Clears every completion only after the user
//!   has agreed to it.

use chrono::{DateTime, Utc};

use crate::completion::CompletionStore;
use crate::date::{
    current_day_index, days_remaining, is_accessible, next_equinox, unlock_instant, DayIndex,
    COUNTDOWN_DAYS,
};
use crate::linkify::{linkify, Segment};
use crate::setup::KeyValueStore;
use crate::tasks::MergedTaskList;

/// The day to show when the screen first opens.
///
/// Before the countdown starts this is day 1, during it today's day, and
/// once the final day has passed day 40.
pub fn initial_display_day(now: DateTime<Utc>) -> DayIndex {
    let remaining = days_remaining(now);
    if remaining > i64::from(COUNTDOWN_DAYS) {
        return DayIndex::FIRST;
    }
    if let Some(current) = current_day_index(now) {
        return current;
    }
    if remaining < 1 {
        return DayIndex::LAST;
    }
    DayIndex::FIRST
}

/// The day currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayNavigator {
    day: DayIndex,
}

impl DayNavigator {
    pub fn new(day: DayIndex) -> Self {
        DayNavigator { day }
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        DayNavigator::new(initial_display_day(now))
    }

    pub fn day(&self) -> DayIndex {
        self.day
    }

    pub fn can_go_previous(&self) -> bool {
        self.day.previous().is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.day.next().is_some()
    }

    /// Moves back one day; stays on day 1. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        match self.day.previous() {
            Some(day) => {
                self.day = day;
                true
            }
            None => false,
        }
    }

    /// Moves forward one day; stays on day 40. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        match self.day.next() {
            Some(day) => {
                self.day = day;
                true
            }
            None => false,
        }
    }

    pub fn jump_to(&mut self, day: DayIndex) {
        self.day = day;
    }
}

/// One day's card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView<'a> {
    pub day: DayIndex,
    pub title: &'a str,
    pub description: Vec<Segment<'a>>,
    pub completed: bool,
    pub locked: bool,
    pub is_current: bool,
    /// When the day opens; set only for locked days.
    pub unlocks_at: Option<DateTime<Utc>>,
}

impl<'a> DayView<'a> {
    pub fn build<S: KeyValueStore>(
        list: &'a MergedTaskList,
        day: DayIndex,
        completion: &CompletionStore<S>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let task = list.task(day)?;
        let locked = !is_accessible(day, now);
        Some(DayView {
            day,
            title: &task.title,
            description: linkify(&task.description),
            completed: completion.get(day),
            locked,
            is_current: current_day_index(now) == Some(day),
            unlocks_at: locked.then(|| unlock_instant(day, now)),
        })
    }

    pub fn can_toggle(&self) -> bool {
        !self.locked
    }
}

/// Countdown header and completion summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub equinox: DateTime<Utc>,
    pub days_remaining: i64,
    pub current_day: Option<DayIndex>,
    pub completed: usize,
    pub total: u32,
}

impl Progress {
    pub fn at<S: KeyValueStore>(completion: &CompletionStore<S>, now: DateTime<Utc>) -> Self {
        Progress {
            equinox: next_equinox(now),
            days_remaining: days_remaining(now),
            current_day: current_day_index(now),
            completed: completion.completed_count(),
            total: COUNTDOWN_DAYS,
        }
    }

    /// The reset control is shown only once something is complete.
    pub fn offer_reset(&self) -> bool {
        self.completed > 0
    }
}

/// Toggles `day` if it is open at `now`. Returns the new state, or `None`
/// without touching the store when the day is still locked.
pub fn toggle_day<S: KeyValueStore>(
    completion: &mut CompletionStore<S>,
    day: DayIndex,
    now: DateTime<Utc>,
) -> Option<bool> {
    if !is_accessible(day, now) {
        tracing::debug!(day = day.get(), "refusing to toggle a locked day");
        return None;
    }
    Some(completion.toggle(day))
}

/// Clears all completions if `confirm` agrees. Returns whether it did.
pub fn confirm_and_clear<S, F>(completion: &mut CompletionStore<S>, confirm: F) -> bool
where
    S: KeyValueStore,
    F: FnOnce() -> bool,
{
    if !confirm() {
        return false;
    }
    completion.clear_all();
    true
}
