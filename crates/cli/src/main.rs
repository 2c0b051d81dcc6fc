mod cli;
mod terminal;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use vidhi_core::model::model_options;
use vidhi_core::{Config, ModelChoice};
use vidhi_ingest::UploadedDocument;
use vidhi_llm::{AnalysisOutcome, ErrorKind, LegalAssistant, EXAMPLE_QUESTIONS};

use crate::cli::{CliArgs, Command};
use crate::terminal::Terminal;

const NO_TEXT_MESSAGE: &str = "No text found in the PDF. Scanned documents are not supported.";

fn load_config(args: &CliArgs) -> Config {
    vidhi_core::config::load_dotenv();
    let mut config = match &args.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    if let Some(path) = &args.secrets_file {
        config.secrets_file = path.clone();
    }
    config
}

/// Build the assistant, or explain how to configure the credential and stop.
fn assistant(config: &Config, terminal: &Terminal) -> Result<Option<LegalAssistant>> {
    let assistant = LegalAssistant::from_config(config).context("failed to create completion client")?;
    if !assistant.is_configured() {
        terminal.print_error(
            "no API key for the completion service",
            ErrorKind::Configuration.remedy(),
        )?;
        return Ok(None);
    }
    Ok(Some(assistant))
}

async fn analyze(
    args: &CliArgs,
    config: &Config,
    terminal: &Terminal,
    file: &Path,
    model: &ModelChoice,
    show_text: bool,
) -> Result<ExitCode> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let Some(assistant) = assistant(config, terminal)? else {
        return Ok(ExitCode::from(2));
    };

    let spinner = terminal.start_spinner("Analyzing document...")?;
    let result = assistant
        .analyze_document(&UploadedDocument::new(filename, bytes), model)
        .await;
    spinner.stop();

    let mut outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            terminal.print_error(&e.to_string(), e.remedy())?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.json {
        if !show_text {
            match &mut outcome {
                AnalysisOutcome::Analyzed(analysis) => analysis.raw_text.clear(),
                AnalysisOutcome::SparseText { raw_text, .. } => raw_text.clear(),
                AnalysisOutcome::NoText { .. } => {}
            }
        }
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(ExitCode::SUCCESS);
    }

    match outcome {
        AnalysisOutcome::NoText { filename, page_count } => {
            debug!(%filename, page_count, "No text layer");
            terminal.print_warning(NO_TEXT_MESSAGE)?;
            Ok(ExitCode::FAILURE)
        }
        AnalysisOutcome::SparseText { char_count, clauses, .. } => {
            terminal.print_warning(&format!(
                "Very little text was extracted ({char_count} characters). \
                 The document might be scanned or have formatting issues; no summary was requested."
            ))?;
            for clause in &clauses {
                terminal.print_body(&format!("- {}", clause.label()))?;
            }
            Ok(ExitCode::FAILURE)
        }
        AnalysisOutcome::Analyzed(analysis) => {
            terminal.print_header(&format!("Analysis ({})", analysis.model))?;
            terminal.print_body(&analysis.render_report(show_text))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn ask(
    args: &CliArgs,
    config: &Config,
    terminal: &Terminal,
    question: &str,
    model: &ModelChoice,
) -> Result<ExitCode> {
    let Some(assistant) = assistant(config, terminal)? else {
        return Ok(ExitCode::from(2));
    };

    let spinner = terminal.start_spinner("Thinking...")?;
    let result = assistant.answer_question(question, model).await;
    spinner.stop();

    match result {
        Ok(answer) if args.json => {
            println!("{}", serde_json::to_string_pretty(&answer)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(answer) => {
            terminal.print_header(&format!("Answer ({})", answer.model))?;
            terminal.print_body(&answer.render())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            terminal.print_error(&e.to_string(), e.remedy())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let terminal = Terminal::new();
    let config = load_config(&args);

    match &args.command {
        Command::Models => {
            let models = model_options(&config.llm);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&models)?);
            } else {
                terminal.print_models(&models)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Examples => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(EXAMPLE_QUESTIONS)?);
            } else {
                terminal.print_examples(EXAMPLE_QUESTIONS)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze { file, model, show_text } => {
            analyze(&args, &config, &terminal, file, model, *show_text).await
        }
        Command::Ask { question, model } => {
            ask(&args, &config, &terminal, &question.join(" "), model).await
        }
    }
}
