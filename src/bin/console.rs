//! Interactive terminal front-end. Shares the validation, prompt, session,
//! and history code with the HTTP server; only the input/output wiring
//! lives here.

use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use product_copy_generator::Config;
use product_copy_generator::history::HistoryLedger;
use product_copy_generator::llm::LlmClient;
use product_copy_generator::session::{
    self, GenerateRequest, ImproveRequest, SeoRequest, SessionOutcome, TranslateRequest,
};
use product_copy_generator::vocab;

// Legacy output markers; the session itself is marker-free.
const WARNING_MARKER: &str = "⚠️ ";
const ERROR_MARKER: &str = "❌ ";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = Config::from_env();
    let llm = LlmClient::from_config(&config);
    let history = Mutex::new(HistoryLedger::new());
    let mut editor = DefaultEditor::new()?;

    println!("{}", "Product Copy Generator".bold());
    println!("Model: {}", config.model_id);
    if !config.api_configured() {
        println!(
            "{}",
            format!(
                "{WARNING_MARKER}Hugging Face API token not configured, \
                set HF_API_TOKEN in your environment"
            )
            .yellow()
        );
    }

    loop {
        println!();
        println!("  1) Generate a description");
        println!("  2) Improve a description");
        println!("  3) SEO & keyword analysis");
        println!("  4) Translate a description");
        println!("  5) Show history");
        println!("  6) Quit");

        let choice = match editor.readline("> ") {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let result = match choice.as_str() {
            "1" => generate_flow(&mut editor, &llm, &history).await,
            "2" => improve_flow(&mut editor, &llm, &history).await,
            "3" => seo_flow(&mut editor, &llm).await,
            "4" => translate_flow(&mut editor, &llm).await,
            "5" => {
                let ledger = history.lock().unwrap_or_else(PoisonError::into_inner);
                println!("\n{}", ledger.render());
                Ok(())
            }
            "6" | "q" | "quit" => break,
            _ => {
                println!("{}", format!("{WARNING_MARKER}Unknown choice").yellow());
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn generate_flow(
    editor: &mut DefaultEditor,
    llm: &LlmClient,
    history: &Mutex<HistoryLedger>,
) -> Result<(), ReadlineError> {
    let request = GenerateRequest {
        product_name: read_field(editor, "Product name", "")?,
        category: pick(editor, "Category", vocab::CATEGORIES, vocab::DEFAULT_CATEGORY)?,
        features: read_field(editor, "Key features", "")?,
        target_audience: read_field(editor, "Target audience", "")?,
        tone: pick(editor, "Tone", vocab::TONES, vocab::DEFAULT_TONE)?,
        language: pick_language(editor, "Language", vocab::DEFAULT_LANGUAGE)?,
        length: pick_length(editor)?,
        num_variants: read_variants(editor)?,
    };

    let outcome = session::run_generate(llm, history, &request).await;
    present(&outcome);
    if outcome.is_success() {
        show_history(history);
    }
    Ok(())
}

async fn improve_flow(
    editor: &mut DefaultEditor,
    llm: &LlmClient,
    history: &Mutex<HistoryLedger>,
) -> Result<(), ReadlineError> {
    let request = ImproveRequest {
        original_description: read_field(editor, "Original description", "")?,
        improvement_focus: read_focus(editor)?,
        tone: pick(editor, "Desired tone", vocab::TONES, vocab::DEFAULT_TONE)?,
        language: pick_language(editor, "Language", vocab::DEFAULT_LANGUAGE)?,
    };

    let outcome = session::run_improve(llm, history, &request).await;
    present(&outcome);
    if outcome.is_success() {
        show_history(history);
    }
    Ok(())
}

async fn seo_flow(editor: &mut DefaultEditor, llm: &LlmClient) -> Result<(), ReadlineError> {
    let request = SeoRequest {
        product_name: read_field(editor, "Product name", "")?,
        description: read_field(editor, "Description (optional)", "")?,
        category: pick(editor, "Category", vocab::CATEGORIES, vocab::DEFAULT_CATEGORY)?,
        language: pick_language(editor, "Target language", vocab::DEFAULT_LANGUAGE)?,
    };

    present(&session::run_seo(llm, &request).await);
    Ok(())
}

async fn translate_flow(editor: &mut DefaultEditor, llm: &LlmClient) -> Result<(), ReadlineError> {
    let request = TranslateRequest {
        description: read_field(editor, "Description to translate", "")?,
        source_language: pick_language(editor, "Source language", vocab::DEFAULT_LANGUAGE)?,
        target_language: pick_language(editor, "Target language", vocab::DEFAULT_TARGET_LANGUAGE)?,
        adapt_culturally: read_bool(editor, "Adapt culturally", true)?,
    };

    present(&session::run_translate(llm, &request).await);
    Ok(())
}

fn present(outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::Success { text } => {
            println!("\n{text}");
            println!("\n{}", count_words(text).dimmed());
        }
        SessionOutcome::Failure { error, partial } => {
            if let Some(text) = partial {
                println!("\n{text}");
                println!("\n{}", count_words(text).dimmed());
            }
            let message = error.to_string();
            if error.is_warning() {
                println!("\n{}", format!("{WARNING_MARKER}{message}").yellow());
            } else {
                println!("\n{}", format!("{ERROR_MARKER}{message}").red());
            }
        }
    }
}

fn show_history(history: &Mutex<HistoryLedger>) {
    let ledger = history.lock().unwrap_or_else(PoisonError::into_inner);
    println!("\n{}", ledger.render().dimmed());
}

/// Prompt for a free-text field; blank input keeps the default.
fn read_field(
    editor: &mut DefaultEditor,
    label: &str,
    default: &str,
) -> Result<String, ReadlineError> {
    let prompt = if default.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{default}]: ")
    };
    let line = editor.readline(&prompt)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Numbered single-choice picker over a closed vocabulary; blank input keeps
/// the default.
fn pick(
    editor: &mut DefaultEditor,
    label: &str,
    options: &[&str],
    default: &str,
) -> Result<String, ReadlineError> {
    println!("{label}:");
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
    let line = editor.readline(&format!("{label} [{default}]: "))?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(default.to_string());
    }
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Ok(options[n - 1].to_string()),
        _ => Ok(trimmed.to_string()),
    }
}

fn pick_language(
    editor: &mut DefaultEditor,
    label: &str,
    default: &str,
) -> Result<String, ReadlineError> {
    let labels: Vec<&str> = vocab::LANGUAGES.iter().map(|(ui, _)| *ui).collect();
    pick(editor, label, &labels, default)
}

fn pick_length(editor: &mut DefaultEditor) -> Result<String, ReadlineError> {
    let labels: Vec<&str> = vocab::LENGTH_BANDS.iter().map(|(ui, _)| *ui).collect();
    pick(editor, "Length", &labels, vocab::DEFAULT_LENGTH)
}

fn read_variants(editor: &mut DefaultEditor) -> Result<u8, ReadlineError> {
    let line = editor.readline("Number of variants (1-3) [1]: ")?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(1);
    }
    // Out-of-range values are passed through so the validator reports them.
    Ok(trimmed.parse::<u8>().unwrap_or(u8::MAX))
}

/// Multi-choice picker for the improvement axes; blank input means general
/// improvement.
fn read_focus(editor: &mut DefaultEditor) -> Result<Vec<String>, ReadlineError> {
    println!("Improvement focus (comma-separated numbers, blank for general):");
    for (i, axis) in vocab::IMPROVEMENT_AXES.iter().enumerate() {
        println!("  {}) {axis}", i + 1);
    }
    let line = editor.readline("Focus []: ")?;
    let picks = line
        .split(',')
        .filter_map(|token| token.trim().parse::<usize>().ok())
        .filter(|n| (1..=vocab::IMPROVEMENT_AXES.len()).contains(n))
        .map(|n| vocab::IMPROVEMENT_AXES[n - 1].to_string())
        .collect();
    Ok(picks)
}

fn read_bool(
    editor: &mut DefaultEditor,
    label: &str,
    default: bool,
) -> Result<bool, ReadlineError> {
    let hint = if default { "Y/n" } else { "y/N" };
    let line = editor.readline(&format!("{label} [{hint}]: "))?;
    match line.trim().to_lowercase().as_str() {
        "" => Ok(default),
        "y" | "yes" | "o" | "oui" => Ok(true),
        _ => Ok(false),
    }
}

/// Word/character counter shown under every output.
fn count_words(text: &str) -> String {
    let words = text.split_whitespace().count();
    let chars = text.chars().count();
    format!("{words} words | {chars} characters")
}
