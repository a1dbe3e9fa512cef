use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::WordId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WordError {
    #[error("english word must not be empty")]
    EmptyTerm,
    #[error("vietnamese meaning must not be empty")]
    EmptyMeaning,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown part of speech: {0:?}")]
pub struct PartOfSpeechError(pub String);

//
// ─── PART OF SPEECH ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Article,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 9] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Article,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Article => "article",
        }
    }

    /// Lenient parse used for free text coming from dictionaries and imports.
    /// Blank input means "not set".
    ///
    /// # Errors
    ///
    /// Returns `PartOfSpeechError` when the text is not blank and names no
    /// known part of speech.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, PartOfSpeechError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = PartOfSpeechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        PartOfSpeech::ALL
            .into_iter()
            .find(|pos| pos.as_str() == lowered)
            .ok_or_else(|| PartOfSpeechError(s.to_owned()))
    }
}

//
// ─── DICTIONARY INFO ───────────────────────────────────────────────────────────
//

/// What a dictionary lookup contributes to a word. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordInfo {
    pub english_meaning: String,
    pub pronunciation: String,
    pub part_of_speech: String,
    pub example: String,
}

impl WordInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.english_meaning.is_empty()
            && self.pronunciation.is_empty()
            && self.part_of_speech.is_empty()
            && self.example.is_empty()
    }
}

//
// ─── WORD DRAFT ────────────────────────────────────────────────────────────────
//

/// Unvalidated user input for a vocabulary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDraft {
    pub term: String,
    pub vietnamese_meaning: String,
    pub part_of_speech: Option<PartOfSpeech>,
    pub english_meaning: String,
    pub pronunciation: String,
    pub example: String,
}

impl WordDraft {
    #[must_use]
    pub fn new(term: impl Into<String>, vietnamese_meaning: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            vietnamese_meaning: vietnamese_meaning.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_part_of_speech(mut self, pos: Option<PartOfSpeech>) -> Self {
        self.part_of_speech = pos;
        self
    }

    /// Fill blanks from a dictionary result. Values the user typed win.
    #[must_use]
    pub fn enrich(mut self, info: &WordInfo) -> Self {
        fill_blank(&mut self.english_meaning, &info.english_meaning);
        fill_blank(&mut self.pronunciation, &info.pronunciation);
        fill_blank(&mut self.example, &info.example);
        if self.part_of_speech.is_none() {
            self.part_of_speech = PartOfSpeech::parse_optional(&info.part_of_speech)
                .ok()
                .flatten();
        }
        self
    }

    /// Trim and check the draft. The English term is stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the term or the Vietnamese meaning is blank.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedWord, WordError> {
        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return Err(WordError::EmptyTerm);
        }
        let vietnamese_meaning = self.vietnamese_meaning.trim().to_owned();
        if vietnamese_meaning.is_empty() {
            return Err(WordError::EmptyMeaning);
        }

        Ok(ValidatedWord {
            term,
            vietnamese_meaning,
            part_of_speech: self.part_of_speech,
            english_meaning: self.english_meaning.trim().to_owned(),
            pronunciation: self.pronunciation.trim().to_owned(),
            example: self.example.trim().to_owned(),
            created_at: now,
        })
    }
}

fn fill_blank(target: &mut String, source: &str) {
    if target.trim().is_empty() && !source.trim().is_empty() {
        *target = source.trim().to_owned();
    }
}

/// A checked draft waiting for the store to assign an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWord {
    pub term: String,
    pub vietnamese_meaning: String,
    pub part_of_speech: Option<PartOfSpeech>,
    pub english_meaning: String,
    pub pronunciation: String,
    pub example: String,
    pub created_at: DateTime<Utc>,
}

impl ValidatedWord {
    #[must_use]
    pub fn assign_id(self, id: WordId) -> Word {
        Word {
            id,
            term: self.term,
            vietnamese_meaning: self.vietnamese_meaning,
            part_of_speech: self.part_of_speech,
            english_meaning: self.english_meaning,
            pronunciation: self.pronunciation,
            example: self.example,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

//
// ─── WORD ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub term: String,
    pub vietnamese_meaning: String,
    pub part_of_speech: Option<PartOfSpeech>,
    pub english_meaning: String,
    pub pronunciation: String,
    pub example: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Word {
    /// Replace the editable fields, keeping id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the draft does not validate; the word is left
    /// untouched in that case.
    pub fn apply_edit(&mut self, draft: WordDraft, now: DateTime<Utc>) -> Result<(), WordError> {
        let validated = draft.validate(now)?;
        self.term = validated.term;
        self.vietnamese_meaning = validated.vietnamese_meaning;
        self.part_of_speech = validated.part_of_speech;
        self.english_meaning = validated.english_meaning;
        self.pronunciation = validated.pronunciation;
        self.example = validated.example;
        self.updated_at = now;
        Ok(())
    }

    /// Case-insensitive substring match over the term and both meanings.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.term, &self.vietnamese_meaning, &self.english_meaning]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    #[must_use]
    pub fn to_draft(&self) -> WordDraft {
        WordDraft {
            term: self.term.clone(),
            vietnamese_meaning: self.vietnamese_meaning.clone(),
            part_of_speech: self.part_of_speech,
            english_meaning: self.english_meaning.clone(),
            pronunciation: self.pronunciation.clone(),
            example: self.example.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
