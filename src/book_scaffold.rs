/*!
 * Book project scaffolding.
 *
 * Creates the on-disk layout a conversion run expects: a book directory
 * under `books/` holding an images directory, empty glossary and
 * table-of-contents text files, and a template `book.json` with example
 * chapters to edit. The conversion pipeline never depends on this module;
 * it only consumes the files it lays out.
 */

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{BookConfig, ImagesConfig, LogLevel, PdfConfig};
use crate::file_utils::FileManager;
use crate::page_ranges::ChapterRange;

/// Name of the per-book configuration file
pub const BOOK_CONFIG_FILE: &str = "book.json";

static BOOK_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Check that a book identifier is usable as a directory name and image
/// prefix: ASCII letters, digits and underscores, starting with a letter.
pub fn is_valid_book_name(name: &str) -> bool {
    BOOK_NAME_REGEX.is_match(name)
}

/// Creates new book project directories.
pub struct BookScaffold;

impl BookScaffold {
    /// Create `books_dir/<name>` with its images directory, empty source
    /// files and a template configuration. Refuses to touch an existing
    /// directory.
    pub fn create(books_dir: &Path, name: &str) -> Result<PathBuf> {
        if !is_valid_book_name(name) {
            return Err(anyhow!(
                "Invalid book name '{}': use ASCII letters, digits and underscores, starting with a letter",
                name
            ));
        }

        let book_dir = books_dir.join(name);
        if book_dir.exists() {
            return Err(anyhow!(
                "Book directory already exists: {}",
                book_dir.display()
            ));
        }

        FileManager::ensure_dir(&book_dir)
            .context(format!("Failed to create book directory: {}", book_dir.display()))?;
        FileManager::ensure_dir(book_dir.join("images"))?;

        let config = Self::template_config(name);
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize template config to JSON")?;
        FileManager::write_to_file(book_dir.join(BOOK_CONFIG_FILE), &config_json)?;

        FileManager::write_to_file(book_dir.join(format!("{}_glossary.txt", name)), "")?;
        FileManager::write_to_file(book_dir.join(format!("{}_toc.txt", name)), "")?;

        info!("Created book project at {}", book_dir.display());
        info!("Edit {}/{} to configure chapters before converting", book_dir.display(), BOOK_CONFIG_FILE);

        Ok(book_dir)
    }

    /// Template configuration with example chapters to edit.
    fn template_config(name: &str) -> BookConfig {
        let title = display_title(name);

        BookConfig {
            book_name: title.clone(),
            glossary_file: format!("{}_glossary.txt", name),
            toc_file: format!("{}_toc.txt", name),
            images: ImagesConfig {
                dir: "images".to_string(),
                prefix: name.to_string(),
            },
            chapters: vec![
                ChapterRange::new(
                    1,
                    50,
                    vec!["glossary".to_string(), title.clone(), "01 Chapter One".to_string()],
                    vec![name.to_string(), "ch01".to_string()],
                ),
                ChapterRange::new(
                    51,
                    100,
                    vec!["glossary".to_string(), title, "02 Chapter Two".to_string()],
                    vec![name.to_string(), "ch02".to_string()],
                ),
            ],
            pdf: Some(PdfConfig {
                path: String::new(),
                toc_pages: None,
                glossary_pages: None,
                index_pages: None,
                dpi: 150,
            }),
            log_level: LogLevel::Info,
            ..BookConfig::default()
        }
    }
}

/// Turn a book identifier into a display title: underscores to spaces,
/// each word capitalized.
fn display_title(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
