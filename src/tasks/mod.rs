//! Task lists and their translations.
//!
//! A task list is forty daily tasks in one main language. A translation
//! overlay may replace the title and description of any subset of those
//! days for another display language. The loader fetches both and merges
//! them, overlay text winning wherever it exists.

pub mod loader;
pub mod merge;
pub mod model;
pub mod source;

pub use loader::{Settled, TaskListLoader};
pub use merge::merge;
pub use model::{DayTask, MergedTask, MergedTaskList, Overlay, OverlayEntry, TaskList};
pub use source::{FsTaskSource, TaskSource};
