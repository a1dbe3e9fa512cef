//! Quizzes and flashcard sessions over stored words.

mod flashcards;
mod quiz;
mod service;

pub use flashcards::{Flashcard, FlashcardSession, FlashcardVerdict};
pub use quiz::{Question, Quiz, QuizGrade, QuizKind, QuizResult, Submission};
pub use service::PracticeService;

/// Typed answers count when they equal the expected text after trimming,
/// ignoring case.
#[must_use]
pub fn answers_match(expected: &str, given: &str) -> bool {
    expected.trim().to_lowercase() == given.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::answers_match;

    #[test]
    fn matching_ignores_case_and_outer_whitespace() {
        assert!(answers_match("con mèo", "  Con Mèo "));
        assert!(answers_match("ĐẸP", "đẹp"));
        assert!(!answers_match("con mèo", "con  mèo"));
        assert!(!answers_match("mèo", "meo"));
    }
}
