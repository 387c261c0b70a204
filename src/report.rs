/*!
 * Per-run statistics and the aggregated batch report.
 *
 * The two output streams of a conversion stay timestamp-free so reruns are
 * byte-identical; run time is recorded only here, in the optional JSON
 * report written by batch mode.
 */

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use serde::Serialize;

use crate::file_utils::FileManager;
use crate::glossary_parser::ParseFailure;

/// Counters for a single book conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Classified input lines (parsed + failed)
    pub total_lines: usize,

    /// Lines that became cards
    pub parsed: usize,

    /// Lines recorded in the failure stream
    pub failed: usize,

    /// Failure counts keyed by reason code, in stable key order
    pub failure_histogram: BTreeMap<String, usize>,
}

impl RunStats {
    /// Collect statistics from the two finished streams.
    pub fn collect(card_count: usize, failures: &[ParseFailure]) -> Self {
        let mut histogram = BTreeMap::new();
        for failure in failures {
            *histogram.entry(failure.reason.code().to_string()).or_insert(0) += 1;
        }

        RunStats {
            total_lines: card_count + failures.len(),
            parsed: card_count,
            failed: failures.len(),
            failure_histogram: histogram,
        }
    }

    /// Share of lines that became cards, as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.parsed as f64 / self.total_lines as f64 * 100.0
    }

    /// Log the post-run summary block.
    pub fn log_summary(&self, book_name: &str) {
        info!("Conversion summary for '{}':", book_name);
        info!(
            "  Lines: {} total, {} parsed, {} failed ({:.1}% success)",
            self.total_lines,
            self.parsed,
            self.failed,
            self.success_rate()
        );
        for (reason, count) in &self.failure_histogram {
            info!("  {}: {}", reason, count);
        }
    }
}

/// Outcome of one book inside a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BookOutcome {
    pub book_name: String,
    pub directory: String,
    pub total_lines: usize,
    pub parsed: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub failure_histogram: BTreeMap<String, usize>,

    /// Present only when the book aborted before producing output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<String>,
}

impl BookOutcome {
    /// Record a book that converted to completion.
    pub fn completed(book_name: &str, directory: &str, stats: &RunStats) -> Self {
        BookOutcome {
            book_name: book_name.to_string(),
            directory: directory.to_string(),
            total_lines: stats.total_lines,
            parsed: stats.parsed,
            failed: stats.failed,
            success_rate: stats.success_rate(),
            failure_histogram: stats.failure_histogram.clone(),
            fatal_error: None,
        }
    }

    /// Record a book whose run aborted with a fatal error.
    pub fn aborted(book_name: &str, directory: &str, error: &str) -> Self {
        BookOutcome {
            book_name: book_name.to_string(),
            directory: directory.to_string(),
            total_lines: 0,
            parsed: 0,
            failed: 0,
            success_rate: 0.0,
            failure_histogram: BTreeMap::new(),
            fatal_error: Some(error.to_string()),
        }
    }
}

/// Aggregated result of a batch run over a books directory.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Local wall-clock time the report was generated
    pub generated_at: String,

    pub books_processed: usize,
    pub books_failed: usize,
    pub books: Vec<BookOutcome>,
}

impl BatchReport {
    /// Build a report over the collected per-book outcomes.
    pub fn new(books: Vec<BookOutcome>) -> Self {
        let books_failed = books.iter().filter(|book| book.fatal_error.is_some()).count();

        BatchReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            books_processed: books.len(),
            books_failed,
            books,
        }
    }

    /// Timestamped default filename used when `--report` gives no path.
    pub fn default_file_name() -> String {
        format!("batch_report_{}.json", Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Serialize the report as pretty JSON and write it out.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize batch report")?;
        FileManager::write_to_file(path, &json)?;
        info!("Batch report written to {:?}", path);
        Ok(())
    }
}
