use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use vocab_core::PracticeSettings;
use vocab_core::model::WordInfo;

use crate::error::DictionaryError;

/// Source of English details for a new word.
#[async_trait]
pub trait WordLookup: Send + Sync {
    /// Details for `term`. Failures come back as an empty `WordInfo`.
    async fn lookup(&self, term: &str) -> WordInfo;
}

/// Lookup that never finds anything. Used when lookups are switched off.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLookup;

#[async_trait]
impl WordLookup for NoLookup {
    async fn lookup(&self, _term: &str) -> WordInfo {
        WordInfo::default()
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// Client for the free dictionary API (`dictionaryapi.dev` format).
#[derive(Clone, Debug)]
pub struct DictionaryClient {
    client: Client,
    base_url: String,
}

impl DictionaryClient {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn from_settings(settings: &PracticeSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            settings.dictionary_base_url.clone(),
            Duration::from_secs(settings.dictionary_timeout_secs),
        )
    }

    /// Base URL with the term appended as one percent-encoded path segment.
    fn entry_url(&self, term: &str) -> Result<Url, DictionaryError> {
        let invalid = || DictionaryError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .push(&term.trim().to_lowercase());
        Ok(url)
    }

    /// Fetch details for `term`.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError` for a blank term, a failed request, a
    /// non-success status, or a body without usable entries.
    pub async fn try_lookup(&self, term: &str) -> Result<WordInfo, DictionaryError> {
        if term.trim().is_empty() {
            return Err(DictionaryError::EmptyTerm);
        }

        let url = self.entry_url(term)?;
        debug!(%url, "dictionary lookup");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DictionaryError::HttpStatus(response.status()));
        }

        let entries: Vec<Entry> = response.json().await?;
        info_from_entries(entries)
    }
}

#[async_trait]
impl WordLookup for DictionaryClient {
    async fn lookup(&self, term: &str) -> WordInfo {
        match self.try_lookup(term).await {
            Ok(info) => info,
            Err(err) => {
                warn!(term, error = %err, "dictionary lookup failed");
                WordInfo::default()
            }
        }
    }
}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// Only the first entry counts. Its first meaning that has a definition
/// supplies the text, and the first non-empty phonetic the pronunciation.
fn info_from_entries(entries: Vec<Entry>) -> Result<WordInfo, DictionaryError> {
    let entry = entries.into_iter().next().ok_or(DictionaryError::NoEntries)?;

    let pronunciation = entry
        .phonetics
        .into_iter()
        .filter_map(|p| p.text)
        .find(|text| !text.trim().is_empty())
        .unwrap_or_default();

    let mut info = WordInfo {
        pronunciation,
        ..WordInfo::default()
    };

    let first_meaning = entry
        .meanings
        .into_iter()
        .find_map(|m| m.definitions.into_iter().next().map(|d| (m.part_of_speech, d)));
    if let Some((part_of_speech, definition)) = first_meaning {
        info.part_of_speech = part_of_speech;
        info.english_meaning = definition.definition;
        info.example = definition.example.unwrap_or_default();
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<WordInfo, DictionaryError> {
        info_from_entries(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn picks_first_definition_and_phonetic_text() {
        let info = parse(
            r#"[{
                "word": "hello",
                "phonetics": [{"audio": "x.mp3"}, {"text": ""}, {"text": "/həˈləʊ/"}],
                "meanings": [
                    {"partOfSpeech": "exclamation", "definitions": []},
                    {"partOfSpeech": "noun", "definitions": [
                        {"definition": "An utterance of 'hello'.", "example": "she was getting polite nods and hellos"},
                        {"definition": "ignored"}
                    ]}
                ]
            }, {
                "word": "hello",
                "meanings": [{"partOfSpeech": "verb", "definitions": [{"definition": "second entry"}]}]
            }]"#,
        )
        .unwrap();

        assert_eq!(info.pronunciation, "/həˈləʊ/");
        assert_eq!(info.part_of_speech, "noun");
        assert_eq!(info.english_meaning, "An utterance of 'hello'.");
        assert_eq!(info.example, "she was getting polite nods and hellos");
    }

    #[test]
    fn missing_example_and_phonetics_are_blank() {
        let info = parse(
            r#"[{"meanings": [{"partOfSpeech": "verb", "definitions": [{"definition": "to run"}]}]}]"#,
        )
        .unwrap();
        assert_eq!(info.english_meaning, "to run");
        assert!(info.pronunciation.is_empty());
        assert!(info.example.is_empty());
    }

    #[test]
    fn empty_array_is_an_error() {
        assert!(matches!(parse("[]"), Err(DictionaryError::NoEntries)));
    }

    #[test]
    fn url_lowercases_term() {
        let client = DictionaryClient::new("https://dict.test/entries/en/", Duration::from_secs(1))
            .unwrap();
        let url = client.entry_url(" Apple ").unwrap();
        assert_eq!(url.as_str(), "https://dict.test/entries/en/apple");
    }

    #[test]
    fn reserved_characters_stay_inside_the_term_segment() {
        let client =
            DictionaryClient::new("https://dict.test/entries/en", Duration::from_secs(1)).unwrap();

        let url = client.entry_url("AC/DC?x#y").unwrap();
        assert_eq!(url.as_str(), "https://dict.test/entries/en/ac%2Fdc%3Fx%23y");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = client.entry_url("ice cream").unwrap();
        assert_eq!(url.path(), "/entries/en/ice%20cream");
    }

    #[tokio::test]
    async fn unusable_base_url_is_reported() {
        let client = DictionaryClient::new("not a url", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.try_lookup("apple").await,
            Err(DictionaryError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn blank_term_is_rejected_without_a_request() {
        let client = DictionaryClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.try_lookup("   ").await,
            Err(DictionaryError::EmptyTerm)
        ));
        assert!(client.lookup("").await.is_empty());
    }

    #[tokio::test]
    async fn no_lookup_finds_nothing() {
        assert!(NoLookup.lookup("apple").await.is_empty());
    }
}
