use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use services::exchange::{self, ExchangeFormat};
use services::{AppServices, Clock, NoLookup, VocabularyError, WordLookup};
use storage::repository::{ReviewRecordRepository, Storage};
use vocab_core::PracticeSettings;
use vocab_core::model::{PartOfSpeech, WordDraft, WordError, WordId, WordInfo};
use vocab_core::time::fixed_now;

struct StubLookup;

#[async_trait]
impl WordLookup for StubLookup {
    async fn lookup(&self, term: &str) -> WordInfo {
        match term {
            "apple" => WordInfo {
                english_meaning: "The round fruit of a tree.".into(),
                pronunciation: "/ˈæp.əl/".into(),
                part_of_speech: "noun".into(),
                example: "She ate an apple.".into(),
            },
            _ => WordInfo::default(),
        }
    }
}

async fn services(lookup: Arc<dyn WordLookup>) -> (Storage, AppServices) {
    let storage = Storage::in_memory();
    let app = AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        PracticeSettings::default(),
        lookup,
    )
    .await
    .expect("services");
    (storage, app)
}

#[tokio::test]
async fn add_word_enriches_and_tracks() {
    let (_storage, app) = services(Arc::new(StubLookup)).await;
    let vocabulary = app.vocabulary();

    let word = vocabulary
        .add_word(WordDraft::new("Apple", "quả táo"), true)
        .await
        .unwrap();

    assert_eq!(word.term, "apple");
    assert_eq!(word.english_meaning, "The round fruit of a tree.");
    assert_eq!(word.part_of_speech, Some(PartOfSpeech::Noun));

    let record = app.reviews().record(word.id).expect("tracked");
    assert_eq!(record.interval, 1);
    assert_eq!(record.ease_factor, 2.5);
    assert_eq!(
        app.reviews().next_review_date(word.id),
        Some(fixed_now() + Duration::days(1))
    );
}

#[tokio::test]
async fn add_word_without_lookup_keeps_blanks() {
    let (_storage, app) = services(Arc::new(StubLookup)).await;
    let word = app
        .vocabulary()
        .add_word(WordDraft::new("apple", "quả táo"), false)
        .await
        .unwrap();
    assert!(word.english_meaning.is_empty());
}

#[tokio::test]
async fn invalid_word_is_rejected_before_storage() {
    let (_storage, app) = services(Arc::new(NoLookup)).await;
    let err = app
        .vocabulary()
        .add_word(WordDraft::new("   ", "trống"), true)
        .await
        .unwrap_err();
    assert!(matches!(err, VocabularyError::Word(WordError::EmptyTerm)));
    assert_eq!(app.reviews().tracked_count(), 0);
}

#[tokio::test]
async fn edit_and_delete_word() {
    let (storage, app) = services(Arc::new(NoLookup)).await;
    let vocabulary = app.vocabulary();
    let word = vocabulary
        .add_word(WordDraft::new("dog", "chó"), false)
        .await
        .unwrap();
    app.reviews().answer(word.id, true).await.unwrap();

    let edited = vocabulary
        .edit_word(word.id, WordDraft::new("dog", "con chó"))
        .await
        .unwrap();
    assert_eq!(edited.vietnamese_meaning, "con chó");
    assert_eq!(edited.created_at, word.created_at);

    vocabulary.delete_word(word.id).await.unwrap();
    assert!(vocabulary.get_word(word.id).await.unwrap().is_none());
    assert!(app.reviews().record(word.id).is_none());
    assert!(storage.reviews.load_records().await.unwrap().is_empty());

    assert!(matches!(
        vocabulary.delete_word(word.id).await,
        Err(VocabularyError::NotFound(id)) if id == word.id
    ));
    assert!(matches!(
        vocabulary
            .edit_word(WordId::new(99), WordDraft::new("x", "y"))
            .await,
        Err(VocabularyError::NotFound(_))
    ));
}

#[tokio::test]
async fn search_and_progress_reports() {
    let (_storage, app) = services(Arc::new(NoLookup)).await;
    let vocabulary = app.vocabulary();
    let cat = vocabulary
        .add_word(WordDraft::new("cat", "con mèo"), false)
        .await
        .unwrap();
    vocabulary
        .add_word(WordDraft::new("catalog", "danh mục"), false)
        .await
        .unwrap();
    vocabulary
        .add_word(WordDraft::new("dog", "con chó"), false)
        .await
        .unwrap();

    assert_eq!(vocabulary.search("CAT").await.unwrap().len(), 2);
    assert_eq!(vocabulary.search("con").await.unwrap().len(), 2);

    app.reviews().answer(cat.id, true).await.unwrap();
    app.reviews().answer(cat.id, false).await.unwrap();

    let summary = vocabulary.progress_summary().await.unwrap();
    assert_eq!(summary.total_words, 3);
    assert_eq!(summary.reviewed_words, 1);
    assert_eq!(summary.total_attempts, 2);
    assert!((summary.overall_accuracy() - 50.0).abs() < 1e-9);

    let rows = vocabulary.progress_rows().await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].word.id, cat.id);
    assert_eq!(rows[0].progress.as_ref().map(|p| p.attempts), Some(2));
    assert!(rows[1].progress.is_none());
}

#[tokio::test]
async fn export_then_import_through_files() {
    let (_storage, app) = services(Arc::new(NoLookup)).await;
    let vocabulary = app.vocabulary();
    vocabulary
        .add_word(
            WordDraft::new("run", "chạy").with_part_of_speech(Some(PartOfSpeech::Verb)),
            false,
        )
        .await
        .unwrap();
    vocabulary
        .add_word(WordDraft::new("fast", "nhanh"), false)
        .await
        .unwrap();
    let words = vocabulary.list_words().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    for name in ["words.csv", "words.json"] {
        let path = dir.path().join(name);
        let format = exchange::export_to_path(&words, &path).unwrap();
        assert_eq!(format, ExchangeFormat::from_path(&path));

        let (_other_storage, other) = services(Arc::new(NoLookup)).await;
        let drafts = exchange::import_from_path(&path).unwrap();
        let report = other.vocabulary().import_drafts(drafts).await.unwrap();
        assert_eq!((report.imported, report.skipped), (2, 0));

        let imported = other.vocabulary().list_words().await.unwrap();
        assert_eq!(imported[0].term, "run");
        assert_eq!(imported[0].part_of_speech, Some(PartOfSpeech::Verb));
        assert_eq!(other.reviews().tracked_count(), 2);
    }
}

#[tokio::test]
async fn import_skips_incomplete_rows() {
    let (_storage, app) = services(Arc::new(StubLookup)).await;
    let drafts = exchange::import_json(
        r#"[
            {"word": "apple", "vietnamese_meaning": "quả táo"},
            {"word": "pear"},
            {"vietnamese_meaning": "không có từ"}
        ]"#
        .as_bytes(),
    )
    .unwrap();

    let report = app.vocabulary().import_drafts(drafts).await.unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 2);

    // Imports never consult the dictionary.
    let words = app.vocabulary().list_words().await.unwrap();
    assert!(words[0].english_meaning.is_empty());
}

#[tokio::test]
async fn sqlite_backed_services_reload_schedule() {
    let url = "sqlite:file:memdb_services_reload?mode=memory&cache=shared";
    let mut settings = PracticeSettings::default();
    settings.auto_lookup = false;

    let app = AppServices::new_sqlite(url, Clock::fixed(fixed_now()), settings.clone())
        .await
        .expect("sqlite services");
    let word = app
        .vocabulary()
        .add_word(WordDraft::new("tree", "cây"), true)
        .await
        .unwrap();
    app.reviews().answer(word.id, true).await.unwrap();

    let reopened = AppServices::new_sqlite(url, Clock::fixed(fixed_now()), settings)
        .await
        .expect("reopen");
    let record = reopened.reviews().record(word.id).expect("persisted");
    assert_eq!(record.interval, 3);
    assert_eq!(
        reopened.reviews().next_review_date(word.id),
        Some(fixed_now() + Duration::days(3))
    );
}
