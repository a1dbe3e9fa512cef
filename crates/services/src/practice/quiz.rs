use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use vocab_core::PracticeSettings;
use vocab_core::model::{Word, WordId};

use super::answers_match;
use crate::error::PracticeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKind {
    /// Pick the Vietnamese meaning from a list.
    MultipleChoice,
    /// Type the Vietnamese meaning.
    FillBlank,
}

/// One quiz question about a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub word: Word,
    /// Offered answers, shuffled. Empty for fill-in-the-blank questions.
    pub choices: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut prompt = if self.choices.is_empty() {
            format!("Enter the Vietnamese meaning of '{}':", self.word.term)
        } else {
            format!("What is the Vietnamese meaning of '{}'?", self.word.term)
        };
        if !self.word.pronunciation.is_empty() {
            prompt.push_str("\nPronunciation: ");
            prompt.push_str(&self.word.pronunciation);
        }
        prompt
    }

    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answers_match(&self.word.vietnamese_meaning, answer)
    }
}

/// Verdict on one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub word_id: WordId,
    pub correct: bool,
    pub expected: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizGrade {
    Excellent,
    Good,
    KeepStudying,
}

impl QuizGrade {
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Excellent
        } else if percentage >= 60.0 {
            Self::Good
        } else {
            Self::KeepStudying
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! Great job!",
            Self::Good => "Good work! Keep practicing!",
            Self::KeepStudying => "Keep studying! You'll improve!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub grade: QuizGrade,
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A fixed run of questions answered in order.
#[derive(Debug, Clone)]
pub struct Quiz {
    kind: QuizKind,
    questions: Vec<Question>,
    current: usize,
    score: usize,
    started_at: DateTime<Utc>,
    time_limit: Duration,
}

impl Quiz {
    /// Build a quiz from `quiz_length` randomly chosen words.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` if `words` is empty.
    pub fn new(
        kind: QuizKind,
        words: &[Word],
        settings: &PracticeSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, PracticeError> {
        Self::with_rng(kind, words, settings, started_at, &mut rand::rng())
    }

    /// Like [`new`](Self::new) with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` if `words` is empty.
    pub fn with_rng<R: Rng + ?Sized>(
        kind: QuizKind,
        words: &[Word],
        settings: &PracticeSettings,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, PracticeError> {
        if words.is_empty() {
            return Err(PracticeError::Empty);
        }

        let count = usize::try_from(settings.quiz_length)
            .unwrap_or(usize::MAX)
            .min(words.len());
        let mut picked: Vec<Word> = words.choose_multiple(rng, count).cloned().collect();
        picked.shuffle(rng);

        let options = usize::try_from(settings.multiple_choice_options).unwrap_or(usize::MAX);
        let questions = picked
            .into_iter()
            .map(|word| {
                let choices = match kind {
                    QuizKind::MultipleChoice => build_choices(&word, words, options, rng),
                    QuizKind::FillBlank => Vec::new(),
                };
                Question { word, choices }
            })
            .collect();

        Ok(Self {
            kind,
            questions,
            current: 0,
            score: 0,
            started_at,
            time_limit: i64::try_from(settings.quiz_time_limit_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        })
    }

    #[must_use]
    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question waiting for an answer, `None` once all are answered.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// 1-based number of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        (self.current + 1).min(self.questions.len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.started_at) >= self.time_limit
    }

    /// Time left before the limit, never negative.
    #[must_use]
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Duration {
        let elapsed = now.signed_duration_since(self.started_at);
        self.time_limit
            .checked_sub(&elapsed)
            .unwrap_or(self.time_limit)
            .max(Duration::zero())
    }

    /// Grade the current question and move to the next one.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` once every question is answered.
    pub fn submit(&mut self, answer: &str) -> Result<Submission, PracticeError> {
        let question = self.current().ok_or(PracticeError::Completed)?;
        let submission = Submission {
            word_id: question.word.id,
            correct: question.is_correct(answer),
            expected: question.word.vietnamese_meaning.clone(),
        };

        if submission.correct {
            self.score += 1;
        }
        self.current += 1;
        Ok(submission)
    }

    /// Submit the offered choice at `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` once every question is answered,
    /// or `PracticeError::InvalidChoice` for an index outside the choices.
    pub fn submit_choice(&mut self, index: usize) -> Result<Submission, PracticeError> {
        let question = self.current().ok_or(PracticeError::Completed)?;
        let choice = question
            .choices
            .get(index)
            .cloned()
            .ok_or(PracticeError::InvalidChoice(index))?;
        self.submit(&choice)
    }

    #[must_use]
    pub fn result(&self) -> QuizResult {
        let total = self.questions.len();
        #[allow(clippy::cast_precision_loss)]
        let percentage = if total == 0 {
            0.0
        } else {
            self.score as f64 / total as f64 * 100.0
        };
        QuizResult {
            score: self.score,
            total,
            percentage,
            grade: QuizGrade::from_percentage(percentage),
        }
    }
}

/// The correct meaning plus distractors from other words, padded with
/// placeholders when there are too few, then shuffled.
fn build_choices<R: Rng + ?Sized>(
    word: &Word,
    pool: &[Word],
    options: usize,
    rng: &mut R,
) -> Vec<String> {
    let wanted = options.saturating_sub(1);
    let mut others: Vec<&Word> = pool.iter().filter(|w| w.id != word.id).collect();
    others.shuffle(rng);

    let mut wrong: Vec<String> = Vec::with_capacity(wanted);
    for other in others {
        if wrong.len() == wanted {
            break;
        }
        let meaning = &other.vietnamese_meaning;
        let duplicate = answers_match(&word.vietnamese_meaning, meaning)
            || wrong.iter().any(|w| answers_match(w, meaning));
        if !duplicate {
            wrong.push(meaning.clone());
        }
    }
    while wrong.len() < wanted {
        wrong.push(format!("Wrong answer {}", wrong.len() + 1));
    }

    let mut choices = Vec::with_capacity(options);
    choices.push(word.vietnamese_meaning.clone());
    choices.extend(wrong);
    choices.shuffle(rng);
    choices
}
