//! Word lists as JSON or CSV files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use vocab_core::model::{PartOfSpeech, Word, WordDraft};

use crate::error::ExchangeError;

const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeFormat {
    Json,
    Csv,
}

impl ExchangeFormat {
    /// CSV for a `.csv` extension, JSON for anything else.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

//
// ─── ROWS ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct JsonWord {
    word: String,
    vietnamese_meaning: String,
    part_of_speech: String,
    english_meaning: String,
    pronunciation: String,
    example: String,
    created_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CsvWord {
    #[serde(rename = "English Word")]
    word: String,
    #[serde(rename = "Vietnamese Meaning")]
    vietnamese_meaning: String,
    #[serde(rename = "Part of Speech")]
    part_of_speech: String,
    #[serde(rename = "English Meaning")]
    english_meaning: String,
    #[serde(rename = "Pronunciation")]
    pronunciation: String,
    #[serde(rename = "Example")]
    example: String,
    #[serde(rename = "Created Date")]
    created_at: String,
}

fn part_of_speech_label(word: &Word) -> String {
    word.part_of_speech
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default()
}

impl From<&Word> for JsonWord {
    fn from(word: &Word) -> Self {
        Self {
            word: word.term.clone(),
            vietnamese_meaning: word.vietnamese_meaning.clone(),
            part_of_speech: part_of_speech_label(word),
            english_meaning: word.english_meaning.clone(),
            pronunciation: word.pronunciation.clone(),
            example: word.example.clone(),
            created_at: word.created_at.to_rfc3339(),
        }
    }
}

impl From<&Word> for CsvWord {
    fn from(word: &Word) -> Self {
        Self {
            word: word.term.clone(),
            vietnamese_meaning: word.vietnamese_meaning.clone(),
            part_of_speech: part_of_speech_label(word),
            english_meaning: word.english_meaning.clone(),
            pronunciation: word.pronunciation.clone(),
            example: word.example.clone(),
            created_at: word.created_at.format(CSV_DATE_FORMAT).to_string(),
        }
    }
}

/// Unknown part-of-speech labels are dropped rather than failing the row.
fn draft_from_fields(
    word: String,
    vietnamese_meaning: String,
    part_of_speech: &str,
    english_meaning: String,
    pronunciation: String,
    example: String,
) -> WordDraft {
    let part_of_speech = PartOfSpeech::parse_optional(part_of_speech).unwrap_or_else(|err| {
        debug!(error = %err, "ignoring part of speech on import");
        None
    });
    WordDraft {
        english_meaning,
        pronunciation,
        example,
        ..WordDraft::new(word, vietnamese_meaning).with_part_of_speech(part_of_speech)
    }
}

impl From<JsonWord> for WordDraft {
    fn from(row: JsonWord) -> Self {
        draft_from_fields(
            row.word,
            row.vietnamese_meaning,
            &row.part_of_speech,
            row.english_meaning,
            row.pronunciation,
            row.example,
        )
    }
}

impl From<CsvWord> for WordDraft {
    fn from(row: CsvWord) -> Self {
        draft_from_fields(
            row.word,
            row.vietnamese_meaning,
            &row.part_of_speech,
            row.english_meaning,
            row.pronunciation,
            row.example,
        )
    }
}

//
// ─── EXPORT ────────────────────────────────────────────────────────────────────
//

/// Write words as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `ExchangeError` if serialization or writing fails.
pub fn export_json<W: Write>(words: &[Word], mut writer: W) -> Result<(), ExchangeError> {
    let rows: Vec<JsonWord> = words.iter().map(JsonWord::from).collect();
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.flush()?;
    Ok(())
}

/// Write words as CSV with a header row.
///
/// # Errors
///
/// Returns `ExchangeError` if serialization or writing fails.
pub fn export_csv<W: Write>(words: &[Word], writer: W) -> Result<(), ExchangeError> {
    let mut csv = csv::Writer::from_writer(writer);
    if words.is_empty() {
        // serde only emits headers alongside the first record.
        csv.write_record([
            "English Word",
            "Vietnamese Meaning",
            "Part of Speech",
            "English Meaning",
            "Pronunciation",
            "Example",
            "Created Date",
        ])?;
    }
    for word in words {
        csv.serialize(CsvWord::from(word))?;
    }
    csv.flush()?;
    Ok(())
}

//
// ─── IMPORT ────────────────────────────────────────────────────────────────────
//

/// Read drafts from a JSON array. Rows are not validated here.
///
/// # Errors
///
/// Returns `ExchangeError` if the input is not a JSON array of objects.
pub fn import_json<R: Read>(reader: R) -> Result<Vec<WordDraft>, ExchangeError> {
    let rows: Vec<JsonWord> = serde_json::from_reader(reader)?;
    Ok(rows.into_iter().map(WordDraft::from).collect())
}

/// Read drafts from CSV with the export header. Rows are not validated here.
///
/// # Errors
///
/// Returns `ExchangeError` if a record cannot be read.
pub fn import_csv<R: Read>(reader: R) -> Result<Vec<WordDraft>, ExchangeError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut drafts = Vec::new();
    for row in csv.deserialize::<CsvWord>() {
        drafts.push(row?.into());
    }
    Ok(drafts)
}

/// Export to `path`, choosing the format from its extension.
///
/// # Errors
///
/// Returns `ExchangeError` if the file cannot be created or written.
pub fn export_to_path(words: &[Word], path: &Path) -> Result<ExchangeFormat, ExchangeError> {
    let format = ExchangeFormat::from_path(path);
    let writer = BufWriter::new(File::create(path)?);
    match format {
        ExchangeFormat::Json => export_json(words, writer)?,
        ExchangeFormat::Csv => export_csv(words, writer)?,
    }
    debug!(path = %path.display(), count = words.len(), ?format, "words exported");
    Ok(format)
}

/// Import from `path`, choosing the format from its extension.
///
/// # Errors
///
/// Returns `ExchangeError` if the file cannot be opened or parsed.
pub fn import_from_path(path: &Path) -> Result<Vec<WordDraft>, ExchangeError> {
    let reader = BufReader::new(File::open(path)?);
    match ExchangeFormat::from_path(path) {
        ExchangeFormat::Json => import_json(reader),
        ExchangeFormat::Csv => import_csv(reader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::WordId;
    use vocab_core::time::fixed_now;

    fn sample() -> Vec<Word> {
        let mut apple = WordDraft::new("apple", "quả táo")
            .with_part_of_speech(Some(PartOfSpeech::Noun))
            .validate(fixed_now())
            .unwrap()
            .assign_id(WordId::new(1));
        apple.example = "An apple, a day".into();
        let run = WordDraft::new("run", "chạy")
            .validate(fixed_now())
            .unwrap()
            .assign_id(WordId::new(2));
        vec![apple, run]
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExchangeFormat::from_path(Path::new("a/words.CSV")), ExchangeFormat::Csv);
        assert_eq!(ExchangeFormat::from_path(Path::new("words.json")), ExchangeFormat::Json);
        assert_eq!(ExchangeFormat::from_path(Path::new("words")), ExchangeFormat::Json);
    }

    #[test]
    fn json_export_uses_plain_field_names() {
        let mut out = Vec::new();
        export_json(&sample(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value[0]["word"], "apple");
        assert_eq!(value[0]["vietnamese_meaning"], "quả táo");
        assert_eq!(value[0]["part_of_speech"], "noun");
        assert_eq!(value[1]["part_of_speech"], "");
        assert!(value[0]["created_at"].as_str().unwrap().starts_with("2023-11-14T22:13:20"));
    }

    #[test]
    fn csv_export_writes_header_and_quotes_commas() {
        let mut out = Vec::new();
        export_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "English Word,Vietnamese Meaning,Part of Speech,English Meaning,Pronunciation,Example,Created Date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "apple,quả táo,noun,,,\"An apple, a day\",2023-11-14 22:13:20"
        );
    }

    #[test]
    fn empty_csv_export_still_has_header() {
        let mut out = Vec::new();
        export_csv(&[], &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("English Word,"));
    }

    #[test]
    fn json_import_tolerates_missing_fields() {
        let drafts = import_json(
            r#"[{"word": "Cat", "vietnamese_meaning": "mèo", "part_of_speech": "Noun"},
                {"word": "", "vietnamese_meaning": "trống"},
                {"word": "wow", "vietnamese_meaning": "ồ", "part_of_speech": "exclamation"}]"#
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].term, "Cat");
        assert_eq!(drafts[0].part_of_speech, Some(PartOfSpeech::Noun));
        assert!(drafts[0].example.is_empty());
        assert_eq!(drafts[2].part_of_speech, None);
    }

    #[test]
    fn csv_import_reads_exported_file() {
        let mut out = Vec::new();
        export_csv(&sample(), &mut out).unwrap();

        let drafts = import_csv(out.as_slice()).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].term, "apple");
        assert_eq!(drafts[0].example, "An apple, a day");
        assert_eq!(drafts[1].vietnamese_meaning, "chạy");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            import_json("{not json".as_bytes()),
            Err(ExchangeError::Json(_))
        ));
    }
}
