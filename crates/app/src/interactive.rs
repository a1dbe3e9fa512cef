use std::io::{BufRead, Write};

use anyhow::Result;
use services::{FlashcardSession, PracticeService, Quiz, QuizKind};

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

//
// ─── FLASHCARDS ────────────────────────────────────────────────────────────────
//

/// Walk a flashcard session on the terminal. `q` or end of input stops early.
pub async fn review<R: BufRead, W: Write>(
    practice: &PracticeService,
    mut session: FlashcardSession,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let total = session.total();

    while let Some(card) = session.current().cloned() {
        let number = total - session.remaining() + 1;
        let word = &card.word;
        writeln!(output)?;
        writeln!(output, "[{number}/{total}] {}", word.term)?;
        if !word.pronunciation.is_empty() {
            writeln!(output, "  {}", word.pronunciation)?;
        }
        if let Some(pos) = word.part_of_speech {
            writeln!(output, "  ({pos})")?;
        }

        if prompt(input, output, "Press Enter to show the answer ")?.is_none() {
            break;
        }
        session.flip();
        writeln!(output, "  Vietnamese: {}", word.vietnamese_meaning)?;
        if !word.english_meaning.is_empty() {
            writeln!(output, "  English: {}", word.english_meaning)?;
        }
        if !word.example.is_empty() {
            writeln!(output, "  Example: {}", word.example)?;
        }

        let correct = loop {
            match prompt(input, output, "Did you know it? [y/n/q] ")?.as_deref() {
                None | Some("q") => {
                    let reviewed = total - session.remaining();
                    writeln!(output, "Stopped. {reviewed} of {total} reviewed.")?;
                    return Ok(());
                }
                Some("y" | "Y") => break true,
                Some("n" | "N") => break false,
                Some(_) => {}
            }
        };

        let verdict = session.mark(correct)?;
        let result = practice.answer(verdict.word_id, verdict.correct).await?;
        if let Some(record) = result.record {
            writeln!(
                output,
                "  Next review: {}",
                record.next_review_at().format("%Y-%m-%d")
            )?;
        }
    }

    writeln!(
        output,
        "Session complete: {} of {} known.",
        session.correct_count(),
        session.total()
    )?;
    Ok(())
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// Run a quiz on the terminal until it is finished, abandoned, or out of time.
pub async fn quiz<R: BufRead, W: Write>(
    practice: &PracticeService,
    mut quiz: Quiz,
    input: &mut R,
    output: &mut W,
    now: impl Fn() -> chrono::DateTime<chrono::Utc>,
) -> Result<()> {
    let total = quiz.questions().len();

    while let Some(question) = quiz.current().cloned() {
        if quiz.is_expired(now()) {
            writeln!(output, "Time's up!")?;
            break;
        }

        writeln!(output)?;
        writeln!(output, "Question {}/{total}", quiz.position())?;
        writeln!(output, "{}", question.prompt())?;

        let submission = match quiz.kind() {
            QuizKind::MultipleChoice => {
                for (i, choice) in question.choices.iter().enumerate() {
                    writeln!(output, "  {}. {choice}", i + 1)?;
                }
                let picked = loop {
                    let Some(answer) = prompt(input, output, "Your choice: ")? else {
                        return finish(&quiz, output);
                    };
                    match answer.parse::<usize>() {
                        Ok(n) if (1..=question.choices.len()).contains(&n) => break n - 1,
                        _ => writeln!(
                            output,
                            "Enter a number from 1 to {}.",
                            question.choices.len()
                        )?,
                    }
                };
                quiz.submit_choice(picked)?
            }
            QuizKind::FillBlank => {
                let Some(answer) = prompt(input, output, "Your answer: ")? else {
                    return finish(&quiz, output);
                };
                quiz.submit(&answer)?
            }
        };

        if submission.correct {
            writeln!(output, "Correct!")?;
        } else {
            writeln!(output, "Incorrect. The correct answer is: {}", submission.expected)?;
        }
        practice
            .answer(submission.word_id, submission.correct)
            .await?;
    }

    finish(&quiz, output)
}

fn finish<W: Write>(quiz: &Quiz, output: &mut W) -> Result<()> {
    let result = quiz.result();
    writeln!(output)?;
    writeln!(
        output,
        "Your Score: {}/{} ({:.1}%)",
        result.score, result.total, result.percentage
    )?;
    writeln!(output, "{}", result.grade.message())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use services::{AppServices, Clock, NoLookup};
    use storage::repository::Storage;
    use vocab_core::PracticeSettings;
    use vocab_core::model::WordDraft;
    use vocab_core::time::fixed_now;

    async fn app(words: &[(&str, &str)]) -> AppServices {
        let settings = PracticeSettings {
            quiz_length: 2,
            ..PracticeSettings::default()
        };
        let app = AppServices::from_storage(
            &Storage::in_memory(),
            Clock::fixed(fixed_now()),
            settings,
            Arc::new(NoLookup),
        )
        .await
        .unwrap();
        for (term, meaning) in words {
            app.vocabulary()
                .add_word(WordDraft::new(*term, *meaning), false)
                .await
                .unwrap();
        }
        app
    }

    #[tokio::test]
    async fn flashcard_review_records_answers() {
        let app = app(&[("cat", "con mèo")]).await;
        let practice = app.practice();
        let session = practice.start_flashcards().await.unwrap();

        let mut input = "\nmaybe\ny\n".as_bytes();
        let mut output = Vec::new();
        review(&practice, session, &mut input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Vietnamese: con mèo"));
        assert!(text.contains("Session complete: 1 of 1 known."));
        let summary = app.vocabulary().progress_summary().await.unwrap();
        assert_eq!(summary.total_correct, 1);
    }

    #[tokio::test]
    async fn fill_blank_quiz_reports_score() {
        let app = app(&[("cat", "con mèo"), ("dog", "con chó")]).await;
        let practice = app.practice();
        let quiz_run = practice.start_quiz(QuizKind::FillBlank).await.unwrap();
        let first = quiz_run.questions()[0].word.vietnamese_meaning.clone();

        let input = format!("{first}\nsai\n");
        let mut reader = input.as_bytes();
        let mut output = Vec::new();
        quiz(&practice, quiz_run, &mut reader, &mut output, fixed_now)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Correct!"));
        assert!(text.contains("Incorrect. The correct answer is:"));
        assert!(text.contains("Your Score: 1/2 (50.0%)"));
        assert!(text.contains("Keep studying"));
    }

    #[tokio::test]
    async fn expired_quiz_stops_before_asking() {
        let app = app(&[("cat", "con mèo")]).await;
        let practice = app.practice();
        let quiz_run = practice.start_quiz(QuizKind::MultipleChoice).await.unwrap();

        let mut input = "1\n".as_bytes();
        let mut output = Vec::new();
        let late = || fixed_now() + chrono::Duration::hours(1);
        quiz(&practice, quiz_run, &mut input, &mut output, late)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Time's up!"));
        assert!(text.contains("Your Score: 0/1"));
    }
}
