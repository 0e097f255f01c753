//! User preferences: the display language and the active task list.
//!
//! Both fall back to a default whenever the stored value is missing,
//! unreadable, or (for the language) not one of the supported codes.
//! Saving is best effort; failures are logged.

use crate::language::Language;
use crate::setup::{KeyValueStore, LANGUAGE_KEY, TASK_LIST_KEY};

pub const DEFAULT_TASK_LIST: &str = "traditional-spring-cleaning";

pub struct Preferences<S> {
    store: S,
    default_language: Language,
    default_task_list: String,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Preferences {
            store,
            default_language: Language::default(),
            default_task_list: DEFAULT_TASK_LIST.to_string(),
        }
    }

    pub fn with_defaults(mut self, language: Language, task_list: impl Into<String>) -> Self {
        self.default_language = language;
        self.default_task_list = task_list.into();
        self
    }

    pub fn language(&self) -> Language {
        match self.read(LANGUAGE_KEY) {
            Some(code) => code.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring stored language");
                self.default_language
            }),
            None => self.default_language,
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.write(LANGUAGE_KEY, language.code());
    }

    pub fn task_list_id(&self) -> String {
        self.read(TASK_LIST_KEY)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.default_task_list.clone())
    }

    pub fn set_task_list_id(&mut self, id: &str) {
        self.write(TASK_LIST_KEY, id);
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "error reading preference");
            None
        })
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::error!(key, error = %e, "error saving preference");
        }
    }
}
