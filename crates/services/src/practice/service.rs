use std::sync::Arc;

use storage::repository::WordRepository;
use vocab_core::PracticeSettings;
use vocab_core::model::{Word, WordId};

use super::{FlashcardSession, Quiz, QuizKind};
use crate::error::PracticeError;
use crate::review_service::{AnswerResult, ReviewService};

/// Starts practice sessions and feeds their answers back into review.
#[derive(Clone)]
pub struct PracticeService {
    settings: PracticeSettings,
    words: Arc<dyn WordRepository>,
    reviews: Arc<ReviewService>,
}

impl PracticeService {
    #[must_use]
    pub fn new(
        settings: PracticeSettings,
        words: Arc<dyn WordRepository>,
        reviews: Arc<ReviewService>,
    ) -> Self {
        Self {
            settings,
            words,
            reviews,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    /// # Errors
    ///
    /// Returns `PracticeError::Empty` when there are no words, or
    /// `PracticeError::Storage` if they cannot be listed.
    pub async fn start_quiz(&self, kind: QuizKind) -> Result<Quiz, PracticeError> {
        let words = self.words.list_words().await?;
        Quiz::new(kind, &words, &self.settings, self.reviews.now())
    }

    /// Cards for words whose review is due, topped up with random words.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` when there are no words, or
    /// `PracticeError::Storage` if they cannot be listed.
    pub async fn start_flashcards(&self) -> Result<FlashcardSession, PracticeError> {
        let pool = self.words.list_words().await?;
        let due: Vec<Word> = self
            .reviews
            .due_now()
            .into_iter()
            .filter_map(|record| pool.iter().find(|w| w.id == record.item_id).cloned())
            .collect();
        FlashcardSession::new(due, pool, self.settings.flashcard_limit)
    }

    /// Record an answer from either kind of session.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Review` if the answer cannot be stored.
    pub async fn answer(
        &self,
        word_id: WordId,
        correct: bool,
    ) -> Result<AnswerResult, PracticeError> {
        Ok(self.reviews.answer(word_id, correct).await?)
    }
}
