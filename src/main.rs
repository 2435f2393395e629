//! txt2xlsx command-line interface
//!
//! Extracts a table from unstructured text, prints a preview and saves the
//! result as an Excel workbook.
//!
//! # Usage
//!
//! ```bash
//! # Extract from a file and write ./<filename>.xlsx
//! GEMINI_API_KEY=... txt2xlsx notes.txt
//!
//! # Read stdin, preview as HTML with the dark theme, save into ./out
//! cat email.txt | txt2xlsx - -o out --format html --theme dark
//!
//! # Replay a saved model reply without calling the API
//! txt2xlsx notes.txt --dry-run-reply reply.json --calendar
//!
//! # Pass the text directly
//! txt2xlsx --paste "Sales: Jan $100, Feb $200"
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use txt2xlsx::{
    ExportOptions, ExtractorBuilder, PreviewFormat, ProcessingStatus, Session, StaticBackend,
    Txt2XlsxError, GENERIC_ERROR_MESSAGE,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Turn unstructured text into an Excel workbook
#[derive(Parser, Debug)]
#[command(name = "txt2xlsx")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input text file ("-" or omitted for stdin)
    input: Option<PathBuf>,

    /// Use the given text instead of reading INPUT
    #[arg(long, conflicts_with = "input")]
    paste: Option<String>,

    /// Directory to save the workbook into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Preview format printed to stdout
    #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
    format: FormatArg,

    /// Maximum number of rows shown in the preview
    #[arg(long)]
    preview_limit: Option<usize>,

    /// Do not add the summary sheet to the workbook
    #[arg(long)]
    no_summary: bool,

    /// Do not set an autofilter on the data range
    #[arg(long)]
    no_autofilter: bool,

    /// Print a Google Calendar link for the extracted event
    #[arg(long)]
    calendar: bool,

    /// Preview theme (HTML only)
    #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,

    /// Model name (overrides TXT2XLSX_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// API key (overrides GEMINI_API_KEY / API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Use a saved JSON reply instead of calling the API
    #[arg(long)]
    dry_run_reply: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Markdown,
    Html,
    Json,
    Csv,
}

impl From<FormatArg> for PreviewFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => PreviewFormat::Markdown,
            FormatArg::Html => PreviewFormat::Html,
            FormatArg::Json => PreviewFormat::Json,
            FormatArg::Csv => PreviewFormat::Csv,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Txt2XlsxError> {
    let mut builder = ExtractorBuilder::from_env().with_export_options(ExportOptions {
        include_summary: !args.no_summary,
        auto_filter: !args.no_autofilter,
    });
    if let Some(api_key) = &args.api_key {
        builder = builder.with_api_key(api_key);
    }
    if let Some(model) = &args.model {
        builder = builder.with_model(model);
    }
    if let Some(limit) = args.preview_limit {
        builder = builder.with_preview_limit(limit);
    }
    if let Some(path) = &args.dry_run_reply {
        log::info!("Replaying saved reply from {}", path.display());
        builder = builder.with_backend(StaticBackend::new(std::fs::read_to_string(path)?));
    }
    let extractor = builder.build()?;

    let mut session = Session::new();
    if args.theme == ThemeArg::Dark {
        session.toggle_theme();
    }
    match &args.paste {
        Some(text) => session.paste(text.as_str())?,
        None => session.set_input(read_input(args.input.as_ref())?)?,
    }
    if !session.can_submit() {
        return Err(Txt2XlsxError::InvalidState(
            "input text is empty".to_string(),
        ));
    }

    if session.submit(&extractor)? == ProcessingStatus::Error {
        // 詳細はsubmit内でログ出力済み
        eprintln!("{}", session.error().unwrap_or(GENERIC_ERROR_MESSAGE));
        return Ok(ExitCode::FAILURE);
    }

    let table = session
        .table()
        .ok_or_else(|| Txt2XlsxError::InvalidState("no extracted table".to_string()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    extractor.preview(table, args.format.into(), session.theme(), &mut out)?;

    // 標準出力はプレビュー専用、保存先はsave_workbookがログ出力する
    std::fs::create_dir_all(&args.output_dir)?;
    session.download(&extractor, &args.output_dir)?;

    if args.calendar {
        let url = session.calendar_url(chrono::Utc::now())?;
        eprintln!("Add to calendar: {url}");
    }

    Ok(ExitCode::SUCCESS)
}

/// 入力テキストを読み込む（`-`または未指定は標準入力）
fn read_input(input: Option<&PathBuf>) -> Result<String, Txt2XlsxError> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
