//! Where task lists, overlays and UI strings come from.
//!
//! The loader only needs raw document text; parsing happens above this
//! seam. [`FsTaskSource`] reads the same directory layout the static web
//! build serves:
//!
//! ```text
//! <root>/task-lists/<id>/<id>.json
//! <root>/task-lists/<id>/translations/<lang>.json
//! <root>/locales/<lang>.json
//! ```

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

use crate::fileio::strip_bom;
use crate::language::Language;

#[async_trait]
pub trait TaskSource: Send + Sync {
    /// The base list for `id`.
    async fn task_list(&self, id: &str) -> io::Result<String>;

    /// The overlay translating list `id` into `language`. An overlay that
    /// does not exist is reported as an error like any other failure.
    async fn overlay(&self, id: &str, language: Language) -> io::Result<String>;

    /// UI labels for `language`.
    async fn ui_strings(&self, language: Language) -> io::Result<String>;
}

#[derive(Debug, Clone)]
pub struct FsTaskSource {
    root: PathBuf,
}

impl FsTaskSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsTaskSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn task_list_path(&self, id: &str) -> io::Result<PathBuf> {
        let id = checked_segment(id)?;
        Ok(self
            .root
            .join("task-lists")
            .join(id)
            .join(format!("{id}.json")))
    }

    pub fn overlay_path(&self, id: &str, language: Language) -> io::Result<PathBuf> {
        let id = checked_segment(id)?;
        Ok(self
            .root
            .join("task-lists")
            .join(id)
            .join("translations")
            .join(format!("{}.json", language.code())))
    }

    pub fn ui_strings_path(&self, language: Language) -> PathBuf {
        self.root
            .join("locales")
            .join(format!("{}.json", language.code()))
    }
}

/// Task-list ids become path segments; refuse anything that could step
/// outside the data directory.
fn checked_segment(id: &str) -> io::Result<&str> {
    let ok = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.contains('\0');
    if ok {
        Ok(id)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid task list id '{id}'"),
        ))
    }
}

async fn read_text(path: PathBuf) -> io::Result<String> {
    let text = tokio::fs::read_to_string(&path).await?;
    Ok(strip_bom(&text).to_string())
}

#[async_trait]
impl TaskSource for FsTaskSource {
    async fn task_list(&self, id: &str) -> io::Result<String> {
        read_text(self.task_list_path(id)?).await
    }

    async fn overlay(&self, id: &str, language: Language) -> io::Result<String> {
        read_text(self.overlay_path(id, language)?).await
    }

    async fn ui_strings(&self, language: Language) -> io::Result<String> {
        read_text(self.ui_strings_path(language)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn test_paths_follow_layout() {
        let source = FsTaskSource::new("/data");
        assert_eq!(
            source.task_list_path("spring").unwrap(),
            PathBuf::from("/data/task-lists/spring/spring.json")
        );
        assert_eq!(
            source.overlay_path("spring", Language::Fa).unwrap(),
            PathBuf::from("/data/task-lists/spring/translations/fa.json")
        );
        assert_eq!(
            source.ui_strings_path(Language::Ca),
            PathBuf::from("/data/locales/ca.json")
        );
    }

    #[test]
    fn test_rejects_escaping_ids() {
        let source = FsTaskSource::new("/data");
        for id in ["", "..", "../etc", "a/b", "a\\b"] {
            assert!(source.task_list_path(id).is_err(), "{id:?} accepted");
        }
    }

    #[tokio::test]
    async fn test_reads_files() {
        let dir = TempDir::new().unwrap();
        let source = FsTaskSource::new(dir.path());
        std::fs::create_dir_all(dir.child("locales")).unwrap();
        std::fs::write(dir.child("locales/es.json"), "\u{FEFF}{\"lang\":\"es\"}").unwrap();

        assert_eq!(
            source.ui_strings(Language::Es).await.unwrap(),
            "{\"lang\":\"es\"}"
        );
        let missing = source.task_list("nothing-here").await.unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }
}
