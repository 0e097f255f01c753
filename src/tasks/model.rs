//! Task list documents as they are stored on disk, and the merged list the
//! front end displays.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::date::{DayIndex, COUNTDOWN_DAYS};
use crate::error::{LoadError, LoadResult};

/// One day's task in the list's main language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTask {
    pub day: u32,
    pub title: String,
    pub description: String,
}

/// A base task list: `{id, mainLanguage, days: [...]}`.
///
/// `name` and `description` describe the list as a whole and are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: String,
    pub main_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub days: Vec<DayTask>,
}

impl TaskList {
    /// Parses and validates a base list document.
    ///
    /// The list must hold exactly forty days numbered 1 through 40 in
    /// order; anything else is rejected so that the merged list can always
    /// be indexed by day.
    pub fn from_json(id: &str, text: &str) -> LoadResult<Self> {
        let list: TaskList = serde_json::from_str(text).map_err(|source| LoadError::Parse {
            what: format!("task list '{id}'"),
            source,
        })?;
        list.validate()?;
        Ok(list)
    }

    pub fn validate(&self) -> LoadResult<()> {
        let invalid = |reason: String| LoadError::InvalidTaskList {
            id: self.id.clone(),
            reason,
        };
        if self.days.len() != COUNTDOWN_DAYS as usize {
            return Err(invalid(format!(
                "expected {} days, found {}",
                COUNTDOWN_DAYS,
                self.days.len()
            )));
        }
        for (position, task) in self.days.iter().enumerate() {
            let expected = position as u32 + 1;
            if task.day != expected {
                return Err(invalid(format!(
                    "entry {} is numbered day {}",
                    expected, task.day
                )));
            }
        }
        Ok(())
    }
}

/// Title and description replacements for one day. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A translation overlay: `{"day<N>": {title, description}, ...}` for some
/// subset of days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    entries: HashMap<u32, OverlayEntry>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an overlay document.
    ///
    /// Keys that are not of the form `day<N>` and values that are not
    /// objects are skipped, so a file carrying extra metadata still loads.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: Map<String, Value> = serde_json::from_str(text)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let day = key.strip_prefix("day")?.parse::<u32>().ok()?;
                let entry = serde_json::from_value::<OverlayEntry>(value).ok()?;
                Some((day, entry))
            })
            .collect();
        Ok(Overlay { entries })
    }

    pub fn insert(&mut self, day: u32, entry: OverlayEntry) {
        self.entries.insert(day, entry);
    }

    pub fn get(&self, day: u32) -> Option<&OverlayEntry> {
        self.entries.get(&day)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A day's task after the overlay has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedTask {
    pub day: DayIndex,
    pub title: String,
    pub description: String,
    /// Whether any field came from the overlay.
    pub translated: bool,
}

/// The list the front end shows: always forty entries in day order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedTaskList {
    pub id: String,
    pub main_language: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub days: Vec<MergedTask>,
}

impl MergedTaskList {
    pub fn task(&self, day: DayIndex) -> Option<&MergedTask> {
        self.days.get(day.get() as usize - 1)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A valid forty-day list whose titles are `Task N` and descriptions
    /// `Do thing N`.
    pub fn base_list(id: &str) -> TaskList {
        TaskList {
            id: id.to_string(),
            main_language: "en".to_string(),
            name: Some("Test list".to_string()),
            description: None,
            days: (1..=COUNTDOWN_DAYS)
                .map(|day| DayTask {
                    day,
                    title: format!("Task {day}"),
                    description: format!("Do thing {day}"),
                })
                .collect(),
        }
    }

    pub fn base_json(id: &str) -> String {
        serde_json::to_string(&base_list(id)).unwrap()
    }
}
