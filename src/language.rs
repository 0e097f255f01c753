//! language.rs
//!
//! The closed set of display languages and the UI string tables that go
//! with them.
//!
//! # Overview
//!
//! - **`Language`**: `en`, `fa`, `es`, `ca`. Parsed leniently (case and
//!   region tags are ignored) and serialized as the bare code.
//! - **`Direction`**: Text direction; Farsi is the only right-to-left
//!   language.
//! - **`UiStrings`**: Button labels and hints for one language. These are
//!   separate from task content and are consumed as opaque text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownLanguage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
    Es,
    Ca,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Fa, Language::Es, Language::Ca];

    pub const fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fa => "fa",
            Language::Es => "es",
            Language::Ca => "ca",
        }
    }

    /// Name of the language in the language itself, for the switcher.
    pub const fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fa => "فارسی",
            Language::Es => "Español",
            Language::Ca => "Català",
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Language::Fa => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// ```
    /// # use nowruz_countdown::language::Language;
    /// assert_eq!("fa".parse::<Language>(), Ok(Language::Fa));
    /// assert_eq!("es-MX".parse::<Language>(), Ok(Language::Es));
    /// assert!("de".parse::<Language>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let primary = normalized.split(['-', '_']).next().unwrap_or("");
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == primary)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// UI labels for one display language, as stored in `locales/<code>.json`.
///
/// Every label is optional in the file; missing ones come back as empty
/// strings and the front end decides what to show instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiStrings {
    pub lang: String,
    pub dir: Option<Direction>,
    pub locale: String,
    pub time_zone: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub days_remaining: String,
    pub day_completed: String,
    pub mark_complete: String,
    pub mark_incomplete: String,
    pub select_language: String,
    pub previous_day: String,
    pub next_day: String,
    pub not_yet_unlocked: String,
    pub spring_equinox: String,
    pub current_day: String,
    pub locked: String,
    pub unlocks_on: String,
    pub reset_all: String,
}

impl UiStrings {
    /// Returns `label` unless it is empty, in which case `fallback`.
    pub fn or<'a>(label: &'a str, fallback: &'a str) -> &'a str {
        if label.is_empty() {
            fallback
        } else {
            label
        }
    }
}
