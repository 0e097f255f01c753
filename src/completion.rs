//! Completion state for the forty days.
//!
//! The record lives in the persistence layer under
//! [`COMPLETED_DAYS_KEY`] as a JSON object such as `{"3":true,"17":true}`.
//! It is sparse: a day that is not complete has no key at all. Only an
//! explicit `true` counts; entries this store did not write are carried
//! through untouched on every rewrite.
//!
//! Persistence problems never reach the caller. A record that cannot be
//! read or parsed counts as empty, and a failed write is logged and
//! dropped.

use serde_json::{Map, Value};

use crate::date::DayIndex;
use crate::setup::{KeyValueStore, COMPLETED_DAYS_KEY};

pub struct CompletionStore<S> {
    store: S,
}

impl<S: KeyValueStore> CompletionStore<S> {
    pub fn new(store: S) -> Self {
        CompletionStore { store }
    }

    /// True only when the record holds an explicit `true` for `day`.
    pub fn get(&self, day: DayIndex) -> bool {
        matches!(self.read_record().get(&record_key(day)), Some(Value::Bool(true)))
    }

    /// Marks `day` done, or removes its entry when `completed` is false.
    pub fn set(&mut self, day: DayIndex, completed: bool) {
        let mut record = self.read_record();
        if completed {
            record.insert(record_key(day), Value::Bool(true));
        } else {
            record.remove(&record_key(day));
        }
        self.write_record(&record);
    }

    /// Flips `day` and returns its new state.
    pub fn toggle(&mut self, day: DayIndex) -> bool {
        let completed = !self.get(day);
        self.set(day, completed);
        tracing::debug!(day = day.get(), completed, "toggled day");
        completed
    }

    /// Forgets every completion. The caller is expected to have confirmed
    /// this with the user; see [`crate::view::confirm_and_clear`].
    pub fn clear_all(&mut self) {
        self.write_record(&Map::new());
        tracing::info!("cleared all completed days");
    }

    /// Completed days in ascending order.
    pub fn completed_days(&self) -> Vec<DayIndex> {
        let record = self.read_record();
        DayIndex::all()
            .filter(|day| matches!(record.get(&record_key(*day)), Some(Value::Bool(true))))
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_days().len()
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_record(&self) -> Map<String, Value> {
        let text = match self.store.get(COMPLETED_DAYS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Map::new(),
            Err(e) => {
                tracing::error!(error = %e, "error reading completed days");
                return Map::new();
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "completed days record is unreadable, treating as empty");
                Map::new()
            }
        }
    }

    fn write_record(&mut self, record: &Map<String, Value>) {
        let text = Value::Object(record.clone()).to_string();
        if let Err(e) = self.store.set(COMPLETED_DAYS_KEY, &text) {
            tracing::error!(error = %e, "error writing completed days");
        }
    }
}

fn record_key(day: DayIndex) -> String {
    day.get().to_string()
}
