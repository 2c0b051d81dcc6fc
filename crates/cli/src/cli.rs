use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vidhi_core::ModelChoice;

/// Summarise legal PDFs and ask general questions about Indian law.
///
/// Every analysis or question makes one billable call to the completion
/// service. Answers are general information, not legal advice.
#[derive(Parser, Debug)]
#[command(name = "vidhi-cli", version, about)]
pub struct CliArgs {
    /// Configuration profile (reads {PROFILE}_* variables)
    #[arg(long, global = true, env = "VIDHI_PROFILE")]
    pub profile: Option<String>,

    /// Secrets TOML consulted when OPENAI_API_KEY is unset
    #[arg(long, global = true)]
    pub secrets_file: Option<PathBuf>,

    /// Print machine-readable JSON instead of a report
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarise a PDF and list the clause types it contains
    Analyze {
        /// Path to the PDF
        file: PathBuf,

        /// standard, advanced, or a model identifier
        #[arg(long, default_value = "standard")]
        model: ModelChoice,

        /// Also print the extracted text
        #[arg(long)]
        show_text: bool,
    },
    /// Ask a question about Indian law
    Ask {
        /// The question; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// standard, advanced, or a model identifier
        #[arg(long, default_value = "standard")]
        model: ModelChoice,
    },
    /// List the selectable models
    Models,
    /// Show example questions
    Examples,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_defaults_to_standard_model() {
        let args = CliArgs::try_parse_from(["vidhi-cli", "analyze", "lease.pdf"]).unwrap();
        match args.command {
            Command::Analyze { file, model, show_text } => {
                assert_eq!(file, PathBuf::from("lease.pdf"));
                assert_eq!(model, ModelChoice::Standard);
                assert!(!show_text);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ask_joins_words_and_accepts_named_model() {
        let args = CliArgs::try_parse_from([
            "vidhi-cli", "ask", "--model", "gpt-4o-mini", "Is", "a", "verbal", "contract", "valid?",
        ])
        .unwrap();
        match args.command {
            Command::Ask { question, model } => {
                assert_eq!(question.join(" "), "Is a verbal contract valid?");
                assert_eq!(model, ModelChoice::Named("gpt-4o-mini".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from(["vidhi-cli", "models", "--json"]).unwrap();
        assert!(args.json);
        assert!(matches!(args.command, Command::Models));
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(CliArgs::try_parse_from(["vidhi-cli", "ask"]).is_err());
    }
}
