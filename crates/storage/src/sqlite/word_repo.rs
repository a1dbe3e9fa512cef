use vocab_core::model::{ValidatedWord, Word, WordId};

use super::{
    SqliteRepository,
    mapping::{db_err, map_word_row, word_id_to_i64},
};
use crate::repository::{StorageError, WordRepository};

const WORD_COLUMNS: &str = "id, term, vietnamese_meaning, part_of_speech, english_meaning, \
                            pronunciation, example, created_at, updated_at";

#[async_trait::async_trait]
impl WordRepository for SqliteRepository {
    async fn insert_word(&self, word: ValidatedWord) -> Result<Word, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO words (
                term, vietnamese_meaning, part_of_speech, english_meaning,
                pronunciation, example, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ",
        )
        .bind(&word.term)
        .bind(&word.vietnamese_meaning)
        .bind(word.part_of_speech.map(|p| p.as_str()))
        .bind(&word.english_meaning)
        .bind(&word.pronunciation)
        .bind(&word.example)
        .bind(word.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = super::mapping::word_id_from_i64(res.last_insert_rowid())?;
        tracing::debug!(%id, term = %word.term, "inserted word");
        Ok(word.assign_id(id))
    }

    async fn update_word(&self, word: &Word) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE words SET
                term = ?2,
                vietnamese_meaning = ?3,
                part_of_speech = ?4,
                english_meaning = ?5,
                pronunciation = ?6,
                example = ?7,
                updated_at = ?8
            WHERE id = ?1
            ",
        )
        .bind(word_id_to_i64(word.id)?)
        .bind(&word.term)
        .bind(&word.vietnamese_meaning)
        .bind(word.part_of_speech.map(|p| p.as_str()))
        .bind(&word.english_meaning)
        .bind(&word.pronunciation)
        .bind(&word.example)
        .bind(word.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_word(&self, id: WordId) -> Result<Option<Word>, StorageError> {
        let sql = format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(word_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(map_word_row).transpose()
    }

    async fn delete_word(&self, id: WordId) -> Result<(), StorageError> {
        // Progress and review records go with the word through ON DELETE CASCADE.
        let res = sqlx::query("DELETE FROM words WHERE id = ?1")
            .bind(word_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        tracing::debug!(%id, "deleted word");
        Ok(())
    }

    async fn list_words(&self) -> Result<Vec<Word>, StorageError> {
        let sql = format!("SELECT {WORD_COLUMNS} FROM words ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_word_row).collect()
    }

    async fn recent_words(&self, limit: u32) -> Result<Vec<Word>, StorageError> {
        let sql = format!(
            "SELECT {WORD_COLUMNS} FROM words ORDER BY created_at DESC, id DESC LIMIT ?1"
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_word_row).collect()
    }

    async fn search_words(&self, query: &str) -> Result<Vec<Word>, StorageError> {
        // SQLite's LIKE and lower() only fold ASCII, which misses Vietnamese
        // diacritics, so matching happens on the domain side.
        let words = self.list_words().await?;
        Ok(words.into_iter().filter(|w| w.matches(query)).collect())
    }
}
