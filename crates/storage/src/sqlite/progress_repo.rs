use chrono::{DateTime, Utc};
use vocab_core::model::{WordId, WordProgress};

use super::{
    SqliteRepository,
    mapping::{db_err, map_progress_row, word_id_to_i64},
};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn record_attempt(
        &self,
        word_id: WordId,
        correct: bool,
        at: DateTime<Utc>,
    ) -> Result<WordProgress, StorageError> {
        let row = sqlx::query(
            r"
            INSERT INTO word_progress (word_id, attempts, correct_answers, last_reviewed)
            VALUES (?1, 1, ?2, ?3)
            ON CONFLICT(word_id) DO UPDATE SET
                attempts = attempts + 1,
                correct_answers = correct_answers + excluded.correct_answers,
                last_reviewed = excluded.last_reviewed
            RETURNING word_id, attempts, correct_answers, last_reviewed
            ",
        )
        .bind(word_id_to_i64(word_id)?)
        .bind(i64::from(correct))
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        map_progress_row(&row)
    }

    async fn get_progress(&self, word_id: WordId) -> Result<Option<WordProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT word_id, attempts, correct_answers, last_reviewed
            FROM word_progress
            WHERE word_id = ?1
            ",
        )
        .bind(word_id_to_i64(word_id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn list_progress(&self) -> Result<Vec<WordProgress>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT word_id, attempts, correct_answers, last_reviewed
            FROM word_progress
            ORDER BY word_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_progress_row).collect()
    }
}
