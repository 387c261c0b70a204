// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use app_controller::Controller;
use book_scaffold::BookScaffold;
use pdf_images::PdfExtractor;

mod app_config;
mod glossary_parser;
mod page_ranges;
mod image_catalog;
mod card_assembler;
mod anki_export;
mod report;
mod file_utils;
mod app_controller;
mod book_scaffold;
mod pdf_images;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one book's glossary into flashcard import files (default command)
    Convert(ConvertArgs),

    /// Convert every book under a books directory and write a batch report
    Batch(BatchArgs),

    /// Create a new book project skeleton
    Init(InitArgs),

    /// Extract text and page images from the book's PDF via Poppler
    Pdf(PdfArgs),

    /// Generate shell completions for ankigloss
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Book directory containing book.json
    #[arg(value_name = "BOOK_DIR")]
    book_dir: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory whose immediate subdirectories are book projects
    #[arg(value_name = "BOOKS_DIR", default_value = "books")]
    books_dir: PathBuf,

    /// Write the JSON batch report to this path instead of a timestamped default
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Book identifier: ASCII letters, digits and underscores, starting with a letter
    #[arg(value_name = "NAME")]
    name: String,

    /// Directory to create the book under
    #[arg(short, long, default_value = "books")]
    books_dir: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct PdfArgs {
    /// Book directory containing book.json
    #[arg(value_name = "BOOK_DIR")]
    book_dir: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// ankigloss - Chinese-English glossary to Anki converter
///
/// Turns the bilingual glossary at the back of a textbook into tab-separated
/// import files for the Anki flashcard program, one deck and tag hierarchy
/// per configured chapter.
#[derive(Parser, Debug)]
#[command(name = "ankigloss")]
#[command(author = "ankigloss team")]
#[command(version = "1.0.0")]
#[command(about = "Glossary to Anki flashcard converter")]
#[command(long_about = "ankigloss converts Chinese-English textbook glossaries into tab-separated files the Anki flashcard program imports directly.

EXAMPLES:
    ankigloss books/cell_biology                 # Convert one book
    ankigloss convert books/cell_biology         # Same, spelled out
    ankigloss batch books                        # Convert every book under books/
    ankigloss batch books -r report.json         # Choose the batch report path
    ankigloss init cell_biology                  # Scaffold books/cell_biology
    ankigloss pdf books/cell_biology             # Extract text and page images from the PDF
    ankigloss --log-level debug books/anatomy    # Convert with debug logging
    ankigloss completions bash > ankigloss.bash  # Generate bash completions

CONFIGURATION:
    Each book directory carries a book.json describing the glossary file, the
    chapter page ranges with their deck and tag hierarchies, and optional
    image and PDF settings. Scaffold a new book with the init command and
    edit the generated file; a missing book.json is an error.

OUTPUT:
    Conversion writes two files into the book directory: the import file with
    one card per usable glossary line, and a companion file listing every
    line that could not be converted together with the reason.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Book directory containing book.json
    #[arg(value_name = "BOOK_DIR")]
    book_dir: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let _ = match record.level() {
                Level::Error => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;31m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Warn => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;33m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Info => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;32m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Debug => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;36m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Trace => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;35m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ankigloss", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Batch(args)) => run_batch(args),
        Some(Commands::Init(args)) => run_init(args),
        Some(Commands::Pdf(args)) => run_pdf(args),
        None => {
            // Default behavior - treat a bare path as the convert command
            let book_dir = cli.book_dir.ok_or_else(|| {
                anyhow!("BOOK_DIR is required when no subcommand is specified")
            })?;

            run_convert(ConvertArgs {
                book_dir,
                log_level: cli.log_level,
            })
        }
    }
}

// @returns: LevelFilter for a configured log level
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

// If a log level is set via command line, apply it immediately
fn apply_cli_log_level(cli_level: &Option<CliLogLevel>) {
    if let Some(cmd_log_level) = cli_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    apply_cli_log_level(&options.log_level);

    let controller = Controller::open(&options.book_dir)?;

    // If log level was not set via command line, update it from config now
    // Just update the max level without reinitializing the logger
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&controller.config().log_level));
    }

    controller.run()?;

    Ok(())
}

fn run_batch(options: BatchArgs) -> Result<()> {
    apply_cli_log_level(&options.log_level);

    let report = Controller::run_books_dir(&options.books_dir, options.report.as_deref())?;

    // The report records per-book failures; surface them in the exit code
    if report.books_failed > 0 {
        return Err(anyhow!(
            "{} of {} books failed to convert",
            report.books_failed,
            report.books_processed
        ));
    }

    Ok(())
}

fn run_init(options: InitArgs) -> Result<()> {
    apply_cli_log_level(&options.log_level);

    BookScaffold::create(&options.books_dir, &options.name)?;

    Ok(())
}

fn run_pdf(options: PdfArgs) -> Result<()> {
    apply_cli_log_level(&options.log_level);

    let controller = Controller::open(&options.book_dir)?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&controller.config().log_level));
    }

    let completed = PdfExtractor::run(&options.book_dir, controller.config())?;
    if completed == 0 {
        warn!("Nothing extracted: configure toc_pages, glossary_pages or index_pages in book.json");
    }

    Ok(())
}
