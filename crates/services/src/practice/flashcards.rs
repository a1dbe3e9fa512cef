use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use vocab_core::model::{Word, WordId};

use crate::error::PracticeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Flashcard {
    pub word: Word,
    /// Drawn because its review was due rather than at random.
    pub due: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashcardVerdict {
    pub word_id: WordId,
    pub correct: bool,
}

/// A stack of cards shown term side first.
#[derive(Debug, Clone)]
pub struct FlashcardSession {
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
    correct: usize,
}

impl FlashcardSession {
    /// Draw up to `limit` cards: due words first, in order, then random
    /// words from `pool` that were not drawn yet.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` if nothing can be drawn.
    pub fn new(due: Vec<Word>, pool: Vec<Word>, limit: u32) -> Result<Self, PracticeError> {
        Self::with_rng(due, pool, limit, &mut rand::rng())
    }

    /// Like [`new`](Self::new) with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` if nothing can be drawn.
    pub fn with_rng<R: Rng + ?Sized>(
        due: Vec<Word>,
        mut pool: Vec<Word>,
        limit: u32,
        rng: &mut R,
    ) -> Result<Self, PracticeError> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut seen = HashSet::new();
        let mut cards = Vec::new();

        for word in due {
            if cards.len() == limit {
                break;
            }
            if seen.insert(word.id) {
                cards.push(Flashcard { word, due: true });
            }
        }

        pool.shuffle(rng);
        for word in pool {
            if cards.len() == limit {
                break;
            }
            if seen.insert(word.id) {
                cards.push(Flashcard { word, due: false });
            }
        }

        if cards.is_empty() {
            return Err(PracticeError::Empty);
        }
        Ok(Self {
            cards,
            current: 0,
            flipped: false,
            correct: 0,
        })
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.current)
    }

    /// Whether the answer side of the current card is showing.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Turn the current card over. Returns the new side: `true` for the answer.
    pub fn flip(&mut self) -> bool {
        self.flipped = !self.flipped;
        self.flipped
    }

    /// Record the verdict on the current card and move on, term side up.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` when no cards are left.
    pub fn mark(&mut self, correct: bool) -> Result<FlashcardVerdict, PracticeError> {
        let card = self.current().ok_or(PracticeError::Completed)?;
        let verdict = FlashcardVerdict {
            word_id: card.word.id,
            correct,
        };
        if correct {
            self.correct += 1;
        }
        self.current += 1;
        self.flipped = false;
        Ok(verdict)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }
}
