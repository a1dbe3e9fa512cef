use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use storage::repository::{ProgressRepository, StorageError, WordRepository};
use vocab_core::model::{ProgressSummary, Word, WordDraft, WordId, WordProgress};
use vocab_core::time::Clock;

use crate::dictionary::WordLookup;
use crate::error::VocabularyError;
use crate::review_service::ReviewService;

/// A word with its attempt counters, if it has been practised.
#[derive(Debug, Clone, PartialEq)]
pub struct WordProgressRow {
    pub word: Word,
    pub progress: Option<WordProgress>,
}

/// Counts from a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// Rows without a term or Vietnamese meaning.
    pub skipped: usize,
}

/// Orchestrates word creation, editing and lookup.
#[derive(Clone)]
pub struct VocabularyService {
    clock: Clock,
    words: Arc<dyn WordRepository>,
    progress: Arc<dyn ProgressRepository>,
    reviews: Arc<ReviewService>,
    lookup: Arc<dyn WordLookup>,
}

fn not_found_as(id: WordId) -> impl FnOnce(StorageError) -> VocabularyError {
    move |err| match err {
        StorageError::NotFound => VocabularyError::NotFound(id),
        other => VocabularyError::Storage(other),
    }
}

impl VocabularyService {
    #[must_use]
    pub fn new(
        clock: Clock,
        words: Arc<dyn WordRepository>,
        progress: Arc<dyn ProgressRepository>,
        reviews: Arc<ReviewService>,
        lookup: Arc<dyn WordLookup>,
    ) -> Self {
        Self {
            clock,
            words,
            progress,
            reviews,
            lookup,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Store a new word and start scheduling its reviews.
    ///
    /// With `lookup` set, blank English details are filled from the
    /// dictionary first; a failed lookup leaves them blank.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::Word` for validation failures.
    /// Returns `VocabularyError::Storage` or `Review` if persistence fails.
    pub async fn add_word(&self, draft: WordDraft, lookup: bool) -> Result<Word, VocabularyError> {
        let draft = if lookup && !draft.term.trim().is_empty() {
            let info = self.lookup.lookup(&draft.term).await;
            draft.enrich(&info)
        } else {
            draft
        };

        let validated = draft.validate(self.clock.now())?;
        let word = self.words.insert_word(validated).await?;
        self.reviews.track(word.id).await?;
        info!(id = %word.id, term = %word.term, "word added");
        Ok(word)
    }

    /// Replace a word's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::NotFound` if the word does not exist.
    /// Returns `VocabularyError::Word` for validation failures.
    pub async fn edit_word(&self, id: WordId, draft: WordDraft) -> Result<Word, VocabularyError> {
        let mut word = self
            .words
            .get_word(id)
            .await?
            .ok_or(VocabularyError::NotFound(id))?;
        word.apply_edit(draft, self.clock.now())?;
        self.words
            .update_word(&word)
            .await
            .map_err(not_found_as(id))?;
        debug!(%id, "word edited");
        Ok(word)
    }

    /// Delete a word with its progress and review schedule.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::NotFound` if the word does not exist.
    pub async fn delete_word(&self, id: WordId) -> Result<(), VocabularyError> {
        self.words
            .delete_word(id)
            .await
            .map_err(not_found_as(id))?;
        self.reviews.forget(id);
        info!(%id, "word deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` if the lookup fails.
    pub async fn get_word(&self, id: WordId) -> Result<Option<Word>, VocabularyError> {
        Ok(self.words.get_word(id).await?)
    }

    /// All words, oldest id first.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` if the query fails.
    pub async fn list_words(&self) -> Result<Vec<Word>, VocabularyError> {
        Ok(self.words.list_words().await?)
    }

    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` if the query fails.
    pub async fn recent_words(&self, limit: u32) -> Result<Vec<Word>, VocabularyError> {
        Ok(self.words.recent_words(limit).await?)
    }

    /// Case-insensitive search over the term and both meanings.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Word>, VocabularyError> {
        Ok(self.words.search_words(query.trim()).await?)
    }

    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` if a query fails.
    pub async fn progress_summary(&self) -> Result<ProgressSummary, VocabularyError> {
        let total_words = self.words.list_words().await?.len();
        let progress = self.progress.list_progress().await?;
        Ok(ProgressSummary::from_progress(total_words, &progress))
    }

    /// Every word next to its progress, in id order.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` if a query fails.
    pub async fn progress_rows(&self) -> Result<Vec<WordProgressRow>, VocabularyError> {
        let words = self.words.list_words().await?;
        let mut progress: HashMap<WordId, WordProgress> = self
            .progress
            .list_progress()
            .await?
            .into_iter()
            .map(|p| (p.word_id, p))
            .collect();

        Ok(words
            .into_iter()
            .map(|word| WordProgressRow {
                progress: progress.remove(&word.id),
                word,
            })
            .collect())
    }

    /// Add imported words without dictionary lookups.
    ///
    /// Rows missing a term or Vietnamese meaning are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError::Storage` or `Review` if persistence fails;
    /// words stored before the failure stay stored.
    pub async fn import_drafts(
        &self,
        drafts: impl IntoIterator<Item = WordDraft>,
    ) -> Result<ImportReport, VocabularyError> {
        let mut report = ImportReport::default();
        for draft in drafts {
            match self.add_word(draft, false).await {
                Ok(_) => report.imported += 1,
                Err(VocabularyError::Word(err)) => {
                    debug!(error = %err, "import row skipped");
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            imported = report.imported,
            skipped = report.skipped,
            "import finished"
        );
        Ok(report)
    }
}
