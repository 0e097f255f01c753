//! A forty-day countdown to Nowruz, with one household task per day.
//!
//! The countdown ends at the March equinox. Each of the forty days before
//! it opens in turn, and the user ticks tasks off as they go:
//!
//! 1. **`date`**: the equinox table, days remaining, which day is current,
//!    and whether a day is open yet.
//! 2. **`completion`**: which days are done, stored sparsely in a
//!    key-value store.
//! 3. **`tasks`**: loading a task list, overlaying a translation, and
//!    dropping loads that a newer one has superseded.
//! 4. **`view`**: the initial day, navigation, and the per-day card.
//!
//! # Usage
//!
//! ```ignore
//! use nowruz_countdown::{CompletionStore, FileStore, FsTaskSource, Language, TaskListLoader};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let now = chrono::Utc::now();
//!     let loader = TaskListLoader::new(FsTaskSource::new("data/translations"));
//!     let list = loader
//!         .load("traditional-spring-cleaning", Language::Fa)
//!         .await
//!         .into_current()
//!         .expect("only load in flight")?;
//!
//!     let completion = CompletionStore::new(FileStore::new("nowruz-state.json"));
//!     let day = nowruz_countdown::view::initial_display_day(now);
//!     if let Some(card) = nowruz_countdown::DayView::build(&list, day, &completion, now) {
//!         println!("Day {}: {}", card.day, card.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod config;
pub mod date;
pub mod error;
pub mod fileio;
pub mod language;
pub mod linkify;
pub mod observability;
pub mod preferences;
pub mod setup;
pub mod tasks;
pub mod view;

pub use completion::CompletionStore;
pub use date::{
    current_day_index, days_remaining, equinox_for, is_accessible, next_equinox, unlock_instant,
    DayIndex, COUNTDOWN_DAYS,
};
pub use error::{LoadError, StoreError};
pub use language::{Direction, Language, UiStrings};
pub use preferences::Preferences;
pub use setup::{FileStore, KeyValueStore, MemoryStore};
pub use tasks::{FsTaskSource, MergedTaskList, Settled, TaskListLoader, TaskSource};
pub use view::{DayNavigator, DayView, Progress};
