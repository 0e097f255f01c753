//! Loading and merging task lists, with stale results discarded.
//!
//! Each call to [`TaskListLoader::load`] takes a generation ticket the
//! moment it is called. When its I/O settles the ticket is compared with
//! the newest one handed out; if a later call has been made in the
//! meantime the result comes back as [`Settled::Stale`] and must not be
//! shown. In-flight reads are never cancelled, only their results dropped.
//! UI strings use their own counter, so a language switch supersedes both
//! kinds of load independently.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{LoadError, LoadResult};
use crate::language::{Language, UiStrings};

use super::merge::merge;
use super::model::{MergedTaskList, Overlay, TaskList};
use super::source::TaskSource;

/// Outcome of a guarded load.
#[derive(Debug)]
pub enum Settled<T> {
    /// No later load was started; the value may be applied.
    Current(T),
    /// A later load superseded this one.
    Stale,
}

impl<T> Settled<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Settled::Stale)
    }

    pub fn into_current(self) -> Option<T> {
        match self {
            Settled::Current(value) => Some(value),
            Settled::Stale => None,
        }
    }
}

#[derive(Debug, Default)]
struct Generation(AtomicU64);

impl Generation {
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn settle<T>(&self, ticket: u64, value: T) -> Settled<T> {
        if self.0.load(Ordering::SeqCst) == ticket {
            Settled::Current(value)
        } else {
            Settled::Stale
        }
    }
}

pub struct TaskListLoader<T> {
    source: T,
    lists: Generation,
    strings: Generation,
}

impl<T: TaskSource> TaskListLoader<T> {
    pub fn new(source: T) -> Self {
        TaskListLoader {
            source,
            lists: Generation::default(),
            strings: Generation::default(),
        }
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Loads list `id` and merges in the overlay for `language`.
    ///
    /// The ticket is taken before the returned future is first polled, so
    /// call order alone decides which load is the latest.
    pub fn load<'a>(
        &'a self,
        id: &str,
        language: Language,
    ) -> impl Future<Output = Settled<LoadResult<MergedTaskList>>> + 'a {
        let ticket = self.lists.issue();
        let id = id.to_string();
        async move {
            let result = self.fetch_merged(&id, language).await;
            let settled = self.lists.settle(ticket, result);
            if settled.is_stale() {
                tracing::debug!(task_list = %id, %language, ticket, "discarding superseded task list load");
            }
            settled
        }
    }

    /// Loads and merges without the generation guard.
    ///
    /// A missing or broken overlay is not an error: the merge then keeps the
    /// main-language text for every day. When `language` is the list's own
    /// main language no overlay is requested at all.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_merged(&self, id: &str, language: Language) -> LoadResult<MergedTaskList> {
        let text = self
            .source
            .task_list(id)
            .await
            .map_err(|source| LoadError::Fetch {
                what: format!("task list '{id}'"),
                source,
            })?;
        let base = TaskList::from_json(id, &text)?;

        if base.main_language.eq_ignore_ascii_case(language.code()) {
            return Ok(merge(&base, None));
        }

        let overlay = self.fetch_overlay(id, language).await;
        Ok(merge(&base, overlay.as_ref()))
    }

    async fn fetch_overlay(&self, id: &str, language: Language) -> Option<Overlay> {
        let text = match self.source.overlay(id, language).await {
            Ok(text) => text,
            Err(e) => {
                tracing::info!(task_list = id, %language, error = %e, "no translation available, using main language");
                return None;
            }
        };
        match Overlay::from_json(&text) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                tracing::warn!(task_list = id, %language, error = %e, "translation file is unreadable, using main language");
                None
            }
        }
    }

    /// Loads the UI labels for `language`, guarded like [`load`](Self::load).
    ///
    /// Failures are logged and yield empty labels; the front end supplies
    /// its own wording for anything left blank.
    pub fn load_ui_strings<'a>(
        &'a self,
        language: Language,
    ) -> impl Future<Output = Settled<UiStrings>> + 'a {
        let ticket = self.strings.issue();
        async move {
            let strings = self.fetch_ui_strings(language).await;
            self.strings.settle(ticket, strings)
        }
    }

    async fn fetch_ui_strings(&self, language: Language) -> UiStrings {
        let parsed = match self.source.ui_strings(language).await {
            Ok(text) => serde_json::from_str::<UiStrings>(&text).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        parsed.unwrap_or_else(|error| {
            tracing::error!(%language, %error, "error loading UI strings");
            UiStrings::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DayIndex;
    use crate::tasks::model::fixtures::base_json;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubSource {
        lists: HashMap<String, String>,
        overlays: HashMap<(String, Language), String>,
        strings: HashMap<Language, String>,
        overlay_requests: Mutex<Vec<Language>>,
    }

    impl StubSource {
        fn with_list(id: &str) -> Self {
            let mut source = StubSource::default();
            source.lists.insert(id.to_string(), base_json(id));
            source
        }

        fn with_overlay(mut self, id: &str, language: Language, text: &str) -> Self {
            self.overlays
                .insert((id.to_string(), language), text.to_string());
            self
        }
    }

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "missing")
    }

    #[async_trait]
    impl TaskSource for StubSource {
        async fn task_list(&self, id: &str) -> io::Result<String> {
            self.lists.get(id).cloned().ok_or_else(not_found)
        }

        async fn overlay(&self, id: &str, language: Language) -> io::Result<String> {
            self.overlay_requests.lock().unwrap().push(language);
            self.overlays
                .get(&(id.to_string(), language))
                .cloned()
                .ok_or_else(not_found)
        }

        async fn ui_strings(&self, language: Language) -> io::Result<String> {
            self.strings.get(&language).cloned().ok_or_else(not_found)
        }
    }

    fn title(list: &MergedTaskList, n: u32) -> &str {
        &list.task(DayIndex::new(n).unwrap()).unwrap().title
    }

    #[tokio::test]
    async fn test_load_merges_overlay() {
        let source = StubSource::with_list("spring").with_overlay(
            "spring",
            Language::Fa,
            r#"{"day5":{"title":"B"}}"#,
        );
        let loader = TaskListLoader::new(source);
        let merged = loader
            .load("spring", Language::Fa)
            .await
            .into_current()
            .unwrap()
            .unwrap();
        assert_eq!(title(&merged, 5), "B");
        assert_eq!(title(&merged, 6), "Task 6");
    }

    #[tokio::test]
    async fn test_main_language_skips_overlay() {
        let loader = TaskListLoader::new(StubSource::with_list("spring"));
        let merged = loader.fetch_merged("spring", Language::En).await.unwrap();
        assert_eq!(merged.days.len(), 40);
        assert!(loader.source().overlay_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_overlay_falls_back() {
        let loader = TaskListLoader::new(StubSource::with_list("spring"));
        let merged = loader.fetch_merged("spring", Language::Ca).await.unwrap();
        assert_eq!(title(&merged, 1), "Task 1");
        assert!(merged.days.iter().all(|t| !t.translated));
        assert_eq!(
            *loader.source().overlay_requests.lock().unwrap(),
            vec![Language::Ca]
        );
    }

    #[tokio::test]
    async fn test_broken_overlay_falls_back() {
        let source = StubSource::with_list("spring").with_overlay("spring", Language::Es, "{nope");
        let loader = TaskListLoader::new(source);
        let merged = loader.fetch_merged("spring", Language::Es).await.unwrap();
        assert_eq!(title(&merged, 40), "Task 40");
    }

    #[tokio::test]
    async fn test_missing_base_is_fatal() {
        let loader = TaskListLoader::new(StubSource::default());
        let settled = loader.load("spring", Language::En).await;
        assert!(matches!(
            settled,
            Settled::Current(Err(LoadError::Fetch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_superseded_load_is_stale() {
        let source = StubSource::with_list("spring").with_overlay(
            "spring",
            Language::Fa,
            r#"{"day1":{"title":"fa"}}"#,
        );
        let loader = TaskListLoader::new(source);

        let slow = loader.load("spring", Language::Fa);
        let fast = loader.load("spring", Language::En).await;
        assert_eq!(title(&fast.into_current().unwrap().unwrap(), 1), "Task 1");

        // the earlier request settles last and must be ignored
        assert!(slow.await.is_stale());
    }

    #[tokio::test]
    async fn test_superseded_failure_is_stale_too() {
        let loader = TaskListLoader::new(StubSource::with_list("spring"));
        let broken = loader.load("gone", Language::En);
        let good = loader.load("spring", Language::En);
        assert!(broken.await.is_stale());
        assert!(matches!(good.await, Settled::Current(Ok(_))));
    }

    #[tokio::test]
    async fn test_ui_strings_guarded_separately() {
        let mut source = StubSource::with_list("spring");
        source
            .strings
            .insert(Language::Es, r#"{"lang":"es","markComplete":"Hecho"}"#.to_string());
        let loader = TaskListLoader::new(source);

        let list = loader.load("spring", Language::Es);
        let strings = loader.load_ui_strings(Language::Es).await;
        assert_eq!(strings.into_current().unwrap().mark_complete, "Hecho");
        assert!(!list.await.is_stale());

        let first = loader.load_ui_strings(Language::Fa);
        let second = loader.load_ui_strings(Language::Es);
        assert!(first.await.is_stale());
        let fallback = loader.load_ui_strings(Language::Ca).await.into_current().unwrap();
        assert_eq!(fallback, UiStrings::default());
        assert!(second.await.is_stale());
    }
}
