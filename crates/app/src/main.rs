use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use services::exchange;
use services::{AppServices, Clock, VocabularyService, WordProgressRow};
use vocab_core::model::{Word, WordDraft, WordId};

mod cli;
mod config;
mod interactive;

use cli::{Cli, Command, WordDetails};

/// `RUST_LOG` when it is set and parses, warnings only otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    // Diagnostics go to stderr so command output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(io::stderr)
        .init();
}

fn apply_details(mut draft: WordDraft, details: WordDetails) -> WordDraft {
    if details.part_of_speech.is_some() {
        draft.part_of_speech = details.part_of_speech;
    }
    if let Some(english) = details.english {
        draft.english_meaning = english;
    }
    if let Some(pronunciation) = details.pronunciation {
        draft.pronunciation = pronunciation;
    }
    if let Some(example) = details.example {
        draft.example = example;
    }
    draft
}

fn print_word<W: Write>(out: &mut W, word: &Word) -> io::Result<()> {
    let pos = word
        .part_of_speech
        .map(|p| format!(" ({p})"))
        .unwrap_or_default();
    writeln!(
        out,
        "{:>4}  {}{pos}  {}",
        word.id.value(),
        word.term,
        word.vietnamese_meaning
    )?;
    if !word.english_meaning.is_empty() {
        writeln!(out, "      {}", word.english_meaning)?;
    }
    Ok(())
}

fn print_words<W: Write>(out: &mut W, words: &[Word]) -> io::Result<()> {
    if words.is_empty() {
        writeln!(out, "No words found.")?;
    }
    for word in words {
        print_word(out, word)?;
    }
    Ok(())
}

fn print_progress_row<W: Write>(out: &mut W, row: &WordProgressRow) -> io::Result<()> {
    match &row.progress {
        Some(p) => writeln!(
            out,
            "{:>4}  {:<20} {:>3}/{:<3} {:>5.1}%  last {}",
            row.word.id.value(),
            row.word.term,
            p.correct_answers,
            p.attempts,
            p.accuracy(),
            p.last_reviewed.format("%Y-%m-%d")
        ),
        None => writeln!(
            out,
            "{:>4}  {:<20} not practised yet",
            row.word.id.value(),
            row.word.term
        ),
    }
}

async fn require_word(vocabulary: &VocabularyService, id: WordId) -> Result<Word> {
    vocabulary
        .get_word(id)
        .await?
        .with_context(|| format!("no word with id {id}"))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = config::load_settings(cli.config.as_deref())?;
    let db_url = config::normalize_sqlite_url(&cli.db_url);
    config::prepare_sqlite_file(&db_url)?;

    let app = AppServices::new_sqlite(&db_url, Clock::system(), settings)
        .await
        .with_context(|| format!("opening {db_url}"))?;
    let vocabulary = app.vocabulary();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Add {
            term,
            meaning,
            details,
            no_lookup,
        } => {
            let draft = apply_details(WordDraft::new(term, meaning), details);
            let word = vocabulary.add_word(draft, !no_lookup).await?;
            writeln!(out, "Added:")?;
            print_word(&mut out, &word)?;
        }
        Command::Edit {
            id,
            term,
            meaning,
            details,
        } => {
            let id = WordId::new(id);
            let mut draft = require_word(&vocabulary, id).await?.to_draft();
            if let Some(term) = term {
                draft.term = term;
            }
            if let Some(meaning) = meaning {
                draft.vietnamese_meaning = meaning;
            }
            let word = vocabulary
                .edit_word(id, apply_details(draft, details))
                .await?;
            writeln!(out, "Updated:")?;
            print_word(&mut out, &word)?;
        }
        Command::Delete { id } => {
            let id = WordId::new(id);
            vocabulary.delete_word(id).await?;
            writeln!(out, "Deleted word {id}.")?;
        }
        Command::List => print_words(&mut out, &vocabulary.list_words().await?)?,
        Command::Search { query } => print_words(&mut out, &vocabulary.search(&query).await?)?,
        Command::Recent { limit } => {
            print_words(&mut out, &vocabulary.recent_words(limit).await?)?;
        }
        Command::Due => {
            let reviews = app.reviews();
            let due = reviews.due_now();
            if due.is_empty() {
                writeln!(out, "Nothing due.")?;
            }
            for record in &due {
                let Some(word) = vocabulary.get_word(record.item_id).await? else {
                    continue;
                };
                writeln!(
                    out,
                    "{:>4}  {:<20} due {}  every {} day(s)",
                    word.id.value(),
                    word.term,
                    record.next_review_at().format("%Y-%m-%d"),
                    record.interval
                )?;
            }
        }
        Command::Review => {
            let practice = app.practice();
            let session = practice.start_flashcards().await?;
            let stdin = io::stdin();
            interactive::review(&practice, session, &mut stdin.lock(), &mut out).await?;
        }
        Command::Quiz { kind } => {
            let practice = app.practice();
            let quiz = practice.start_quiz(kind.into()).await?;
            let reviews = app.reviews();
            let stdin = io::stdin();
            interactive::quiz(&practice, quiz, &mut stdin.lock(), &mut out, || reviews.now())
                .await?;
        }
        Command::Stats { words } => {
            let summary = vocabulary.progress_summary().await?;
            writeln!(out, "Words:          {}", summary.total_words)?;
            writeln!(out, "Practised:      {}", summary.reviewed_words)?;
            writeln!(out, "Attempts:       {}", summary.total_attempts)?;
            writeln!(out, "Correct:        {}", summary.total_correct)?;
            writeln!(out, "Accuracy:       {:.1}%", summary.overall_accuracy())?;
            writeln!(out, "Due for review: {}", app.reviews().due_now().len())?;
            if words {
                writeln!(out)?;
                for row in vocabulary.progress_rows().await? {
                    print_progress_row(&mut out, &row)?;
                }
            }
        }
        Command::Export { path } => {
            let words = vocabulary.list_words().await?;
            if words.is_empty() {
                bail!("no words to export");
            }
            exchange::export_to_path(&words, &path)
                .with_context(|| format!("exporting to {}", path.display()))?;
            writeln!(out, "Exported {} words to {}.", words.len(), path.display())?;
        }
        Command::Import { path } => {
            let drafts = exchange::import_from_path(&path)
                .with_context(|| format!("importing {}", path.display()))?;
            let report = vocabulary.import_drafts(drafts).await?;
            writeln!(
                out,
                "Imported {} words successfully ({} skipped).",
                report.imported, report.skipped
            )?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::PartOfSpeech;

    #[test]
    fn details_override_only_given_fields() {
        let mut draft = WordDraft::new("run", "chạy");
        draft.example = "keep me".into();
        let details = WordDetails {
            part_of_speech: Some(PartOfSpeech::Verb),
            english: Some("move fast".into()),
            ..WordDetails::default()
        };

        let draft = apply_details(draft, details);
        assert_eq!(draft.part_of_speech, Some(PartOfSpeech::Verb));
        assert_eq!(draft.english_meaning, "move fast");
        assert_eq!(draft.example, "keep me");
    }

    #[test]
    fn rust_log_sets_the_level_when_present() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            log_filter(Some("services=trace")).to_string(),
            "services=trace"
        );
        assert_eq!(log_filter(None).to_string(), "warn");
    }

    #[test]
    fn empty_word_list_prints_placeholder() {
        let mut out = Vec::new();
        print_words(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No words found.\n");
    }
}
