use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use vocab_core::model::{ReviewRecord, ValidatedWord, Word, WordId, WordProgress};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Vocabulary entries.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Store a new word and assign its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the word cannot be stored.
    async fn insert_word(&self, word: ValidatedWord) -> Result<Word, StorageError>;

    /// Overwrite an existing word.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no word has this id.
    async fn update_word(&self, word: &Word) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing word is `Ok(None)`.
    async fn get_word(&self, id: WordId) -> Result<Option<Word>, StorageError>;

    /// Delete a word together with its progress and review record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no word has this id.
    async fn delete_word(&self, id: WordId) -> Result<(), StorageError>;

    /// All words, oldest id first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_words(&self) -> Result<Vec<Word>, StorageError>;

    /// Most recently created words first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn recent_words(&self, limit: u32) -> Result<Vec<Word>, StorageError>;

    /// Words whose term or meanings contain `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn search_words(&self, query: &str) -> Result<Vec<Word>, StorageError>;
}

/// Attempt counters per word.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Count one answer for the word, creating its progress row if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn record_attempt(
        &self,
        word_id: WordId,
        correct: bool,
        at: DateTime<Utc>,
    ) -> Result<WordProgress, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_progress(&self, word_id: WordId) -> Result<Option<WordProgress>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress(&self) -> Result<Vec<WordProgress>, StorageError>;
}

/// Spaced-repetition records, kept in registration order.
#[async_trait]
pub trait ReviewRecordRepository: Send + Sync {
    /// Insert or update the record for its word. Updates keep the original
    /// position in the registration order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn save_record(&self, record: &ReviewRecord) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn load_records(&self) -> Result<Vec<ReviewRecord>, StorageError>;

    /// Remove the record for a word. Missing records are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_record(&self, word_id: WordId) -> Result<(), StorageError>;
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    words: HashMap<WordId, Word>,
    progress: HashMap<WordId, WordProgress>,
    records: Vec<ReviewRecord>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn sorted_by_id(mut words: Vec<Word>) -> Vec<Word> {
    words.sort_by_key(|w| w.id);
    words
}

#[async_trait]
impl WordRepository for InMemoryRepository {
    async fn insert_word(&self, word: ValidatedWord) -> Result<Word, StorageError> {
        let mut guard = self.lock()?;
        guard.next_id += 1;
        let word = word.assign_id(WordId::new(guard.next_id));
        guard.words.insert(word.id, word.clone());
        Ok(word)
    }

    async fn update_word(&self, word: &Word) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let slot = guard.words.get_mut(&word.id).ok_or(StorageError::NotFound)?;
        *slot = word.clone();
        Ok(())
    }

    async fn get_word(&self, id: WordId) -> Result<Option<Word>, StorageError> {
        Ok(self.lock()?.words.get(&id).cloned())
    }

    async fn delete_word(&self, id: WordId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.words.remove(&id).ok_or(StorageError::NotFound)?;
        guard.progress.remove(&id);
        guard.records.retain(|r| r.item_id != id);
        Ok(())
    }

    async fn list_words(&self) -> Result<Vec<Word>, StorageError> {
        Ok(sorted_by_id(self.lock()?.words.values().cloned().collect()))
    }

    async fn recent_words(&self, limit: u32) -> Result<Vec<Word>, StorageError> {
        let mut words: Vec<Word> = self.lock()?.words.values().cloned().collect();
        words.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        words.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(words)
    }

    async fn search_words(&self, query: &str) -> Result<Vec<Word>, StorageError> {
        let guard = self.lock()?;
        Ok(sorted_by_id(
            guard
                .words
                .values()
                .filter(|w| w.matches(query))
                .cloned()
                .collect(),
        ))
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn record_attempt(
        &self,
        word_id: WordId,
        correct: bool,
        at: DateTime<Utc>,
    ) -> Result<WordProgress, StorageError> {
        let mut guard = self.lock()?;
        if !guard.words.contains_key(&word_id) {
            return Err(StorageError::NotFound);
        }
        let progress = guard
            .progress
            .entry(word_id)
            .and_modify(|p| p.record(correct, at))
            .or_insert_with(|| WordProgress::first_attempt(word_id, correct, at));
        Ok(progress.clone())
    }

    async fn get_progress(&self, word_id: WordId) -> Result<Option<WordProgress>, StorageError> {
        Ok(self.lock()?.progress.get(&word_id).cloned())
    }

    async fn list_progress(&self) -> Result<Vec<WordProgress>, StorageError> {
        let mut rows: Vec<WordProgress> = self.lock()?.progress.values().cloned().collect();
        rows.sort_by_key(|p| p.word_id);
        Ok(rows)
    }
}

#[async_trait]
impl ReviewRecordRepository for InMemoryRepository {
    async fn save_record(&self, record: &ReviewRecord) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.words.contains_key(&record.item_id) {
            return Err(StorageError::NotFound);
        }
        let existing = guard.records.iter().position(|r| r.item_id == record.item_id);
        match existing {
            Some(slot) => guard.records[slot] = record.clone(),
            None => guard.records.push(record.clone()),
        }
        Ok(())
    }

    async fn load_records(&self) -> Result<Vec<ReviewRecord>, StorageError> {
        Ok(self.lock()?.records.clone())
    }

    async fn delete_record(&self, word_id: WordId) -> Result<(), StorageError> {
        self.lock()?.records.retain(|r| r.item_id != word_id);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn WordRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub reviews: Arc<dyn ReviewRecordRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let words: Arc<dyn WordRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let reviews: Arc<dyn ReviewRecordRepository> = Arc::new(repo);
        Self {
            words,
            progress,
            reviews,
        }
    }
}
