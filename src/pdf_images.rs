/*!
 * PDF page extraction driver built on the Poppler command-line tools.
 *
 * Shells out to `pdftotext` for the table-of-contents and glossary page
 * spans, and to `pdftoppm` for rasterizing the index pages into the book's
 * image directory. `pdftoppm` names its output `<prefix>-<page>.png` using
 * the source page number, which is exactly the filename convention the
 * image catalog resolves pages from.
 *
 * The conversion pipeline never calls into this module; it only consumes
 * the files left behind.
 */

use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};

use crate::app_config::BookConfig;
use crate::book_scaffold::BOOK_CONFIG_FILE;
use crate::errors::PdfError;
use crate::file_utils::FileManager;

/// Prefix used for rasterized pages when the book configures none.
const FALLBACK_IMAGE_PREFIX: &str = "page";

/// Drives the Poppler tools over one book's configured page spans.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Run every extraction the book's pdf section configures. Spans left
    /// unconfigured are skipped with a note; a missing pdf section is an
    /// error because there is nothing to do.
    pub fn run(book_dir: &Path, config: &BookConfig) -> Result<u32> {
        let Some(pdf) = &config.pdf else {
            return Err(PdfError::MissingSection.into());
        };

        if pdf.path.trim().is_empty() {
            return Err(anyhow!("pdf.path is not set in {}", BOOK_CONFIG_FILE));
        }

        let pdf_path = book_dir.join(&pdf.path);
        if !FileManager::file_exists(&pdf_path) {
            return Err(anyhow!("PDF file does not exist: {:?}", pdf_path));
        }

        let mut completed = 0;

        match pdf.toc_pages {
            Some(span) => {
                let target = config.toc_path(book_dir);
                info!("Extracting table of contents (pages {}-{}) to {:?}", span.0, span.1, target);
                Self::extract_text(&pdf_path, span, &target)?;
                completed += 1;
            }
            None => info!("Skipping table of contents (toc_pages not configured)"),
        }

        match pdf.glossary_pages {
            Some(span) => {
                let target = config.glossary_path(book_dir);
                info!("Extracting glossary (pages {}-{}) to {:?}", span.0, span.1, target);
                Self::extract_text(&pdf_path, span, &target)?;
                completed += 1;
            }
            None => info!("Skipping glossary extraction (glossary_pages not configured)"),
        }

        match pdf.index_pages {
            Some(span) => {
                let images_dir = config.images_dir_path(book_dir);
                info!("Rasterizing index (pages {}-{}) into {:?}", span.0, span.1, images_dir);
                Self::extract_page_images(&pdf_path, span, &images_dir, &config.images.prefix, pdf.dpi)?;
                completed += 1;
            }
            None => info!("Skipping page images (index_pages not configured)"),
        }

        Ok(completed)
    }

    /// Extract one inclusive page span as plain text.
    fn extract_text(pdf_path: &Path, span: (u32, u32), target: &Path) -> Result<()> {
        check_span(span)?;
        if let Some(parent) = target.parent() {
            FileManager::ensure_dir(parent)?;
        }

        run_tool(
            "pdftotext",
            &[
                "-f", &span.0.to_string(),
                "-l", &span.1.to_string(),
                "-layout",
                pdf_path.to_str().unwrap_or_default(),
                target.to_str().unwrap_or_default(),
            ],
        )
    }

    /// Rasterize one inclusive page span into `<images_dir>/<prefix>-<page>.png`.
    fn extract_page_images(
        pdf_path: &Path,
        span: (u32, u32),
        images_dir: &Path,
        prefix: &str,
        dpi: u32,
    ) -> Result<()> {
        check_span(span)?;
        FileManager::ensure_dir(images_dir)?;

        let prefix = if prefix.is_empty() {
            warn!("images.prefix is not configured, naming files '{}-<page>.png'", FALLBACK_IMAGE_PREFIX);
            FALLBACK_IMAGE_PREFIX
        } else {
            prefix
        };
        let output_root = images_dir.join(prefix);

        run_tool(
            "pdftoppm",
            &[
                "-png",
                "-r", &dpi.to_string(),
                "-f", &span.0.to_string(),
                "-l", &span.1.to_string(),
                pdf_path.to_str().unwrap_or_default(),
                output_root.to_str().unwrap_or_default(),
            ],
        )
    }
}

fn check_span(span: (u32, u32)) -> Result<()> {
    if span.0 == 0 || span.0 > span.1 {
        return Err(anyhow!("Invalid page span {}-{}: pages are 1-based and the span must not be inverted", span.0, span.1));
    }
    Ok(())
}

fn run_tool(tool: &str, args: &[&str]) -> Result<()> {
    debug!("Running {} {:?}", tool, args);

    let output = Command::new(tool).args(args).output().map_err(|e| PdfError::ToolUnavailable {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_poppler_stderr(&stderr);
        error!("{} failed: {}", tool, filtered);
        return Err(PdfError::ToolFailed {
            tool: tool.to_string(),
            message: filtered,
        }
        .into());
    }

    Ok(())
}

/// Filter Poppler tool stderr to only show meaningful error lines, stripping
/// the per-object syntax warnings scanned PDFs produce in bulk.
fn filter_poppler_stderr(stderr: &str) -> String {
    let noise_prefixes = ["Syntax Warning", "Config Error"];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !noise_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
