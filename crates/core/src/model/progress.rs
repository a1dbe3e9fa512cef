use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::WordId;

/// Attempt counters for one word across flashcards and quizzes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
    pub word_id: WordId,
    pub attempts: u32,
    pub correct_answers: u32,
    pub last_reviewed: DateTime<Utc>,
}

impl WordProgress {
    /// Progress after a first answer.
    #[must_use]
    pub fn first_attempt(word_id: WordId, correct: bool, at: DateTime<Utc>) -> Self {
        let mut progress = Self {
            word_id,
            attempts: 0,
            correct_answers: 0,
            last_reviewed: at,
        };
        progress.record(correct, at);
        progress
    }

    pub fn record(&mut self, correct: bool, at: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        if correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
        }
        self.last_reviewed = at;
    }

    /// Share of correct answers as a percentage. Zero before any attempt.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        percentage(u64::from(self.correct_answers), u64::from(self.attempts))
    }
}

/// Totals shown on the progress screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressSummary {
    pub total_words: usize,
    pub reviewed_words: usize,
    pub total_attempts: u64,
    pub total_correct: u64,
}

impl ProgressSummary {
    #[must_use]
    pub fn from_progress<'a>(
        total_words: usize,
        progress: impl IntoIterator<Item = &'a WordProgress>,
    ) -> Self {
        progress.into_iter().fold(
            Self {
                total_words,
                ..Self::default()
            },
            |mut acc, p| {
                acc.reviewed_words += 1;
                acc.total_attempts += u64::from(p.attempts);
                acc.total_correct += u64::from(p.correct_answers);
                acc
            },
        )
    }

    #[must_use]
    pub fn overall_accuracy(&self) -> f64 {
        percentage(self.total_correct, self.total_attempts)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
