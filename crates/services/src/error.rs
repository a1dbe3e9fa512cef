//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vocab_core::model::{WordError, WordId};

/// Errors emitted by `DictionaryClient::try_lookup`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DictionaryError {
    #[error("nothing to look up")]
    EmptyTerm,
    #[error("dictionary request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("dictionary returned no entries")]
    NoEntries,
    #[error("dictionary base URL is not usable: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `VocabularyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VocabularyError {
    #[error("word {0} not found")]
    NotFound(WordId),
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Review(#[from] ReviewServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by quizzes and flashcard sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("no words available for practice")]
    Empty,
    #[error("practice session already completed")]
    Completed,
    #[error("choice {0} is not one of the offered answers")]
    InvalidChoice(usize),
    #[error(transparent)]
    Review(#[from] ReviewServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while reading or writing word files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExchangeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Review(#[from] ReviewServiceError),
    #[error("could not build the dictionary client: {0}")]
    Dictionary(#[source] reqwest::Error),
}
