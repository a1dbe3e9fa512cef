use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use services::QuizKind;
use vocab_core::model::PartOfSpeech;

#[derive(Parser)]
#[command(name = "vocab")]
#[command(
    about = "English-Vietnamese vocabulary trainer with spaced repetition",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// SQLite database URL or file path
    #[arg(
        long = "db",
        env = "VOCAB_DB_URL",
        default_value = "sqlite://vocab.sqlite3",
        global = true
    )]
    pub db_url: String,

    /// Practice settings file (TOML)
    #[arg(long, env = "VOCAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a word
    Add {
        /// English word
        term: String,
        /// Vietnamese meaning
        meaning: String,
        #[command(flatten)]
        details: WordDetails,
        /// Do not fill blanks from the online dictionary
        #[arg(long)]
        no_lookup: bool,
    },
    /// Change fields of a stored word
    Edit {
        id: u64,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        meaning: Option<String>,
        #[command(flatten)]
        details: WordDetails,
    },
    /// Delete a word with its progress
    Delete { id: u64 },
    /// List every word
    List,
    /// Search terms and meanings
    Search { query: String },
    /// Show the newest words
    Recent {
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Show words whose review is due
    Due,
    /// Review flashcards, due words first
    Review,
    /// Take a quiz
    Quiz {
        #[arg(short, long, value_enum, default_value = "multiple-choice")]
        kind: QuizKindArg,
    },
    /// Show learning progress
    Stats {
        /// Include one line per word
        #[arg(long)]
        words: bool,
    },
    /// Write all words to a .json or .csv file
    Export { path: PathBuf },
    /// Add words from a .json or .csv file
    Import { path: PathBuf },
}

#[derive(Args, Default)]
pub struct WordDetails {
    /// Part of speech (noun, verb, adjective, ...)
    #[arg(long = "pos")]
    pub part_of_speech: Option<PartOfSpeech>,
    #[arg(long)]
    pub english: Option<String>,
    #[arg(long)]
    pub pronunciation: Option<String>,
    #[arg(long)]
    pub example: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum QuizKindArg {
    MultipleChoice,
    FillBlank,
}

impl From<QuizKindArg> for QuizKind {
    fn from(kind: QuizKindArg) -> Self {
        match kind {
            QuizKindArg::MultipleChoice => Self::MultipleChoice,
            QuizKindArg::FillBlank => Self::FillBlank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_details() {
        let cli = Cli::try_parse_from([
            "vocab",
            "add",
            "run",
            "chạy",
            "--pos",
            "Verb",
            "--no-lookup",
            "--db",
            "sqlite::memory:",
        ])
        .unwrap();

        assert_eq!(cli.db_url, "sqlite::memory:");
        let Command::Add {
            term,
            meaning,
            details,
            no_lookup,
        } = cli.command
        else {
            panic!("expected add");
        };
        assert_eq!((term.as_str(), meaning.as_str()), ("run", "chạy"));
        assert_eq!(details.part_of_speech, Some(PartOfSpeech::Verb));
        assert!(no_lookup);
    }

    #[test]
    fn quiz_kind_defaults_to_multiple_choice() {
        let cli = Cli::try_parse_from(["vocab", "quiz"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Quiz {
                kind: QuizKindArg::MultipleChoice
            }
        ));

        let cli = Cli::try_parse_from(["vocab", "quiz", "--kind", "fill-blank"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Quiz {
                kind: QuizKindArg::FillBlank
            }
        ));
    }

    #[test]
    fn unknown_part_of_speech_is_rejected() {
        assert!(Cli::try_parse_from(["vocab", "add", "a", "b", "--pos", "gerund"]).is_err());
    }
}
