use thiserror::Error;

/// Failure to produce a task list for display. Fatal to the view.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("task list '{id}' is malformed: {reason}")]
    InvalidTaskList { id: String, reason: String },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Failure inside the key-value persistence layer.
///
/// Callers above the store boundary log these and fall back; they never
/// reach the date or merge logic.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDayError {
    #[error("'{0}' is not a day number")]
    NotANumber(String),

    #[error("day {0} is outside 1..=40")]
    OutOfRange(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported language '{0}' (expected one of en, fa, es, ca)")]
pub struct UnknownLanguage(pub String);
