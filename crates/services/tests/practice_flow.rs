use std::sync::Arc;

use chrono::Duration;
use services::{AppServices, Clock, NoLookup, PracticeError, QuizGrade, QuizKind};
use storage::repository::Storage;
use vocab_core::PracticeSettings;
use vocab_core::model::WordDraft;
use vocab_core::time::fixed_now;

async fn seeded(settings: PracticeSettings, terms: &[(&str, &str)]) -> AppServices {
    let storage = Storage::in_memory();
    let app = AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        settings,
        Arc::new(NoLookup),
    )
    .await
    .expect("services");
    for (term, meaning) in terms {
        app.vocabulary()
            .add_word(WordDraft::new(*term, *meaning), false)
            .await
            .unwrap();
    }
    app
}

const ANIMALS: [(&str, &str); 5] = [
    ("cat", "con mèo"),
    ("dog", "con chó"),
    ("bird", "con chim"),
    ("fish", "con cá"),
    ("cow", "con bò"),
];

#[tokio::test]
async fn practice_without_words_is_empty() {
    let app = seeded(PracticeSettings::default(), &[]).await;
    assert!(matches!(
        app.practice().start_quiz(QuizKind::FillBlank).await,
        Err(PracticeError::Empty)
    ));
    assert!(matches!(
        app.practice().start_flashcards().await,
        Err(PracticeError::Empty)
    ));
}

#[tokio::test]
async fn perfect_fill_blank_quiz_grows_intervals() {
    let settings = PracticeSettings {
        quiz_length: 3,
        ..PracticeSettings::default()
    };
    let app = seeded(settings, &ANIMALS).await;
    let practice = app.practice();

    let mut quiz = practice.start_quiz(QuizKind::FillBlank).await.unwrap();
    assert_eq!(quiz.questions().len(), 3);

    while let Some(question) = quiz.current() {
        let answer = format!(" {} ", question.word.vietnamese_meaning.to_uppercase());
        let submission = quiz.submit(&answer).unwrap();
        assert!(submission.correct);
        let result = practice
            .answer(submission.word_id, submission.correct)
            .await
            .unwrap();
        assert_eq!(result.record.map(|r| r.interval), Some(3));
    }

    let result = quiz.result();
    assert_eq!(result.score, 3);
    assert_eq!(result.grade, QuizGrade::Excellent);

    let summary = app.vocabulary().progress_summary().await.unwrap();
    assert_eq!(summary.reviewed_words, 3);
    assert_eq!(summary.total_correct, 3);
}

#[tokio::test]
async fn multiple_choice_quiz_offers_configured_options() {
    let settings = PracticeSettings {
        multiple_choice_options: 3,
        ..PracticeSettings::default()
    };
    let app = seeded(settings, &ANIMALS).await;

    let quiz = app
        .practice()
        .start_quiz(QuizKind::MultipleChoice)
        .await
        .unwrap();
    assert_eq!(quiz.questions().len(), 5);
    assert!(quiz.questions().iter().all(|q| q.choices.len() == 3));
}

#[tokio::test]
async fn flashcards_put_due_words_first() {
    let settings = PracticeSettings {
        flashcard_limit: 3,
        ..PracticeSettings::default()
    };
    let app = seeded(settings, &ANIMALS).await;
    let reviews = app.reviews();

    // Everything starts due tomorrow; push four words further out.
    let words = app.vocabulary().list_words().await.unwrap();
    for word in &words[1..] {
        reviews.answer(word.id, true).await.unwrap();
    }
    reviews.set_clock(Clock::fixed(fixed_now() + Duration::days(1)));

    let mut session = app.practice().start_flashcards().await.unwrap();
    assert_eq!(session.total(), 3);
    let first = session.current().unwrap();
    assert_eq!(first.word.id, words[0].id);
    assert!(first.due);
    assert!(session.cards()[1..].iter().all(|c| !c.due));

    session.flip();
    let verdict = session.mark(false).unwrap();
    let result = app
        .practice()
        .answer(verdict.word_id, verdict.correct)
        .await
        .unwrap();
    let record = result.record.unwrap();
    assert_eq!(record.interval, 1);
    assert_eq!(record.last_reviewed, fixed_now() + Duration::days(1));
}
