use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use crate::anki_export::AnkiExporter;
use crate::app_config::BookConfig;
use crate::book_scaffold::BOOK_CONFIG_FILE;
use crate::card_assembler::CardAssembler;
use crate::file_utils::FileManager;
use crate::glossary_parser::GlossaryParser;
use crate::image_catalog::ImageCatalog;
use crate::page_ranges::PageRangeIndex;
use crate::report::{BatchReport, BookOutcome, RunStats};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

// @module: Application controller for glossary conversion

/// Main application controller for converting one book
#[derive(Debug)]
pub struct Controller {
    // @field: Book directory all configured paths resolve against
    book_dir: PathBuf,

    // @field: Book configuration
    config: BookConfig,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(PathBuf::from("."), BookConfig::default())
    }

    // @method: Create a controller with an already loaded configuration
    pub fn with_config(book_dir: PathBuf, config: BookConfig) -> Result<Self> {
        let controller = Self { book_dir, config };

        Ok(controller)
    }

    /// Open a book directory by loading and validating its configuration
    pub fn open(book_dir: &Path) -> Result<Self> {
        let config_path = book_dir.join(BOOK_CONFIG_FILE);
        if !FileManager::file_exists(&config_path) {
            return Err(anyhow!(
                "No {} found in {:?} (create a book with the init command)",
                BOOK_CONFIG_FILE,
                book_dir
            ));
        }

        let config = BookConfig::from_file(&config_path)?;
        config.validate().context("Configuration validation failed")?;

        Self::with_config(book_dir.to_path_buf(), config)
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.book_name.is_empty() && !self.config.glossary_file.is_empty()
    }

    /// The loaded book configuration
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Run the conversion workflow for this book
    pub fn run(&self) -> Result<RunStats> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the glossary file exists
        let glossary_path = self.config.glossary_path(&self.book_dir);
        if !FileManager::file_exists(&glossary_path) {
            return Err(anyhow!("Glossary file does not exist: {:?}", glossary_path));
        }

        info!("Converting '{}' from {:?}", self.config.book_name, glossary_path);

        // Build the immutable lookups first so bad configuration aborts the
        // run before any output file is touched
        let ranges = PageRangeIndex::new(self.config.chapters.clone())?;
        let images = self.load_image_catalog()?;

        // Classify every input line
        let content = FileManager::read_to_string(&glossary_path)?;
        let outcomes = GlossaryParser::parse_text(&content);
        let total_lines = outcomes.len();

        // Join entries with chapters and images
        let assembler = CardAssembler::new(&ranges, &images);
        let output = assembler.assemble(outcomes);

        // Every input line must land in exactly one output stream
        if output.total() != total_lines {
            error!(
                "CRITICAL ERROR: Lost lines during assembly! Input: {}, classified: {}",
                total_lines,
                output.total()
            );
            return Err(anyhow!(
                "Line accounting mismatch: {} input lines but {} classified",
                total_lines,
                output.total()
            ));
        }

        // Write both streams
        let output_path = self.config.output_path(&self.book_dir);
        let failed_path = self.config.failed_output_path(&self.book_dir);
        AnkiExporter::write_streams(&output.cards, &output.failures, &output_path, &failed_path)?;

        let stats = RunStats::collect(output.cards.len(), &output.failures);
        stats.log_summary(&self.config.book_name);
        info!(
            "Success: {} ({} cards) in {}",
            output_path.display(),
            stats.parsed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(stats)
    }

    /// Catalog the book's page images, downgrading a missing directory to a
    /// conversion without images
    fn load_image_catalog(&self) -> Result<ImageCatalog> {
        let images_dir = self.config.images_dir_path(&self.book_dir);
        if !FileManager::dir_exists(&images_dir) {
            warn!(
                "Image directory {:?} does not exist, converting without images",
                images_dir
            );
            return Ok(ImageCatalog::empty());
        }

        let catalog = ImageCatalog::build(&images_dir, &self.config.images.prefix)?;
        info!(
            "Catalogued {} image files across {} pages",
            catalog.file_count(),
            catalog.page_count()
        );

        Ok(catalog)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run every book under a books directory, collecting a batch report.
    /// A fatal error in one book is recorded and processing continues.
    pub fn run_books_dir(books_dir: &Path, report_path: Option<&Path>) -> Result<BatchReport> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the books directory exists
        if !books_dir.exists() {
            return Err(anyhow!("Books directory does not exist: {:?}", books_dir));
        }

        // Find all book directories (immediate subdirectories with a config)
        let book_dirs = FileManager::find_marked_dirs(books_dir, BOOK_CONFIG_FILE)?;

        // If no book directories found, return error
        if book_dirs.is_empty() {
            return Err(anyhow!(
                "No book directories with {} found in {:?}",
                BOOK_CONFIG_FILE,
                books_dir
            ));
        }

        // Create a progress bar for batch processing
        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(book_dirs.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} books ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting books");

        // Track success and failure counts
        let mut outcomes = Vec::new();
        let mut success_count = 0;
        let mut error_count = 0;

        // Convert each book
        for book_dir in &book_dirs {
            // Get the directory name for display
            let dir_name = book_dir
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            // Update the batch progress bar to show the current book
            folder_pb.set_message(format!("Converting: {}", dir_name));

            let directory = book_dir.to_string_lossy().to_string();
            match Self::convert_one(book_dir) {
                Ok((book_name, stats)) => {
                    outcomes.push(BookOutcome::completed(&book_name, &directory, &stats));
                    success_count += 1;
                }
                Err(e) => {
                    error!("Error converting book {}: {}", dir_name, e);
                    outcomes.push(BookOutcome::aborted(&dir_name, &directory, &e.to_string()));
                    error_count += 1;
                }
            }

            // Update the batch progress bar
            folder_pb.inc(1);
        }

        // Finish the batch progress bar
        folder_pb.finish_with_message("Batch conversion complete");

        // Give summary results - important for batch operations
        info!(
            "Batch conversion completed: {} converted, {} errors in {}",
            success_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );

        // Write the batch report
        let report = BatchReport::new(outcomes);
        let report_file = match report_path {
            Some(path) => path.to_path_buf(),
            None => books_dir.join(BatchReport::default_file_name()),
        };
        report.write_to(&report_file)?;

        Ok(report)
    }

    /// Open and convert a single book directory
    fn convert_one(book_dir: &Path) -> Result<(String, RunStats)> {
        let controller = Self::open(book_dir)?;
        let stats = controller.run()?;
        Ok((controller.config.book_name.clone(), stats))
    }
}
