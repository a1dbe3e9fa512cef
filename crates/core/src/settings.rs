use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{MAX_EASE_FACTOR, MIN_EASE_FACTOR};

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{field} must be at least {min}, got {provided}")]
    TooSmall {
        field: &'static str,
        min: u64,
        provided: u64,
    },
    #[error("initial ease factor must be within [1.3, 2.5], got {0}")]
    InitialEase(f64),
    #[error("dictionary base URL must not be empty")]
    EmptyDictionaryUrl,
}

/// Tunables for practice sessions, scheduling defaults and dictionary lookups.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSettings {
    /// Cards drawn per flashcard session.
    pub flashcard_limit: u32,
    /// Questions per quiz.
    pub quiz_length: u32,
    pub quiz_time_limit_secs: u64,
    /// Choices shown for a multiple-choice question, the correct one included.
    pub multiple_choice_options: u32,
    pub initial_interval_days: u32,
    pub initial_ease_factor: f64,
    pub dictionary_base_url: String,
    pub dictionary_timeout_secs: u64,
    /// Look words up in the dictionary when they are added.
    pub auto_lookup: bool,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            flashcard_limit: 10,
            quiz_length: 10,
            quiz_time_limit_secs: 300,
            multiple_choice_options: 4,
            initial_interval_days: 1,
            initial_ease_factor: MAX_EASE_FACTOR,
            dictionary_base_url: DEFAULT_DICTIONARY_URL.to_owned(),
            dictionary_timeout_secs: 5,
            auto_lookup: true,
        }
    }
}

impl PracticeSettings {
    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns the first `SettingsError` found.
    pub fn validate(self) -> Result<Self, SettingsError> {
        at_least("flashcard_limit", u64::from(self.flashcard_limit), 1)?;
        at_least("quiz_length", u64::from(self.quiz_length), 1)?;
        at_least("quiz_time_limit_secs", self.quiz_time_limit_secs, 1)?;
        at_least(
            "multiple_choice_options",
            u64::from(self.multiple_choice_options),
            2,
        )?;
        at_least(
            "initial_interval_days",
            u64::from(self.initial_interval_days),
            1,
        )?;
        at_least("dictionary_timeout_secs", self.dictionary_timeout_secs, 1)?;

        if !(MIN_EASE_FACTOR..=MAX_EASE_FACTOR).contains(&self.initial_ease_factor) {
            return Err(SettingsError::InitialEase(self.initial_ease_factor));
        }
        if self.dictionary_base_url.trim().is_empty() {
            return Err(SettingsError::EmptyDictionaryUrl);
        }

        Ok(self)
    }
}

fn at_least(field: &'static str, provided: u64, min: u64) -> Result<(), SettingsError> {
    if provided < min {
        return Err(SettingsError::TooSmall {
            field,
            min,
            provided,
        });
    }
    Ok(())
}
