use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use vocab_core::model::{PartOfSpeech, ReviewRecord, Word, WordId, WordProgress};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Map a driver error, turning foreign-key failures into `NotFound`:
/// every foreign key in the schema points at `words`.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    let missing_word = e
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if missing_word {
        StorageError::NotFound
    } else {
        StorageError::Connection(e.to_string())
    }
}

pub(crate) fn word_id_to_i64(id: WordId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("word_id overflow".into()))
}

pub(crate) fn word_id_from_i64(v: i64) -> Result<WordId, StorageError> {
    u64::try_from(v)
        .map(WordId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid word_id: {v}")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_word_row(row: &SqliteRow) -> Result<Word, StorageError> {
    let part_of_speech = row
        .try_get::<Option<String>, _>("part_of_speech")
        .map_err(ser)?
        .map(|raw| PartOfSpeech::parse_optional(&raw))
        .transpose()
        .map_err(ser)?
        .flatten();

    Ok(Word {
        id: word_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        term: row.try_get("term").map_err(ser)?,
        vietnamese_meaning: row.try_get("vietnamese_meaning").map_err(ser)?,
        part_of_speech,
        english_meaning: row.try_get("english_meaning").map_err(ser)?,
        pronunciation: row.try_get("pronunciation").map_err(ser)?,
        example: row.try_get("example").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<WordProgress, StorageError> {
    Ok(WordProgress {
        word_id: word_id_from_i64(row.try_get::<i64, _>("word_id").map_err(ser)?)?,
        attempts: u32_from_i64("attempts", row.try_get("attempts").map_err(ser)?)?,
        correct_answers: u32_from_i64(
            "correct_answers",
            row.try_get("correct_answers").map_err(ser)?,
        )?,
        last_reviewed: row.try_get("last_reviewed").map_err(ser)?,
    })
}

pub(crate) fn map_record_row(row: &SqliteRow) -> Result<ReviewRecord, StorageError> {
    Ok(ReviewRecord::new(
        word_id_from_i64(row.try_get::<i64, _>("word_id").map_err(ser)?)?,
        row.try_get("last_reviewed").map_err(ser)?,
        u32_from_i64("interval_days", row.try_get("interval_days").map_err(ser)?)?,
        row.try_get("ease_factor").map_err(ser)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_conversion_rejects_negative_values() {
        assert!(word_id_from_i64(-1).is_err());
        assert_eq!(word_id_from_i64(9).unwrap(), WordId::new(9));
        assert!(word_id_to_i64(WordId::new(u64::MAX)).is_err());
    }

    #[test]
    fn non_constraint_failures_surface_as_connection_errors() {
        let err = db_err(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Connection(msg) if msg.contains("timed out")));
    }
}
