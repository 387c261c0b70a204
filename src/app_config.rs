use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::page_ranges::ChapterRange;

/// Book configuration module
/// This module handles the per-book configuration including loading and
/// validating the settings that drive a conversion run.
/// Represents one book's configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookConfig {
    /// Display name used in logs and reports
    pub book_name: String,

    /// Glossary text file, relative to the book directory
    pub glossary_file: String,

    /// Table-of-contents text file, written by the pdf subcommand
    #[serde(default = "default_toc_file")]
    pub toc_file: String,

    /// Success stream file name
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Failure stream file name
    #[serde(default = "default_failed_output_file")]
    pub failed_output_file: String,

    /// Page image settings
    #[serde(default)]
    pub images: ImagesConfig,

    /// Ordered chapter list mapping page ranges to deck/tag hierarchies
    #[serde(default)]
    pub chapters: Vec<ChapterRange>,

    /// Source-document extraction settings, used only by the pdf subcommand
    #[serde(default)]
    pub pdf: Option<PdfConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Page image configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImagesConfig {
    // @field: Image directory, relative to the book directory
    #[serde(default = "default_images_dir")]
    pub dir: String,

    // @field: Filename prefix shared by the page image files
    #[serde(default = "String::new")]
    pub prefix: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: default_images_dir(),
            prefix: String::new(),
        }
    }
}

/// Source-document extraction configuration for the pdf subcommand
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PdfConfig {
    // @field: Source document path, relative to the book directory
    pub path: String,

    // @field: Inclusive page span of the table of contents
    #[serde(default)]
    pub toc_pages: Option<(u32, u32)>,

    // @field: Inclusive page span of the glossary word list
    #[serde(default)]
    pub glossary_pages: Option<(u32, u32)>,

    // @field: Inclusive page span of the index to rasterize into page images
    #[serde(default)]
    pub index_pages: Option<(u32, u32)>,

    // @field: Rasterization resolution in dots per inch
    #[serde(default = "default_pdf_dpi")]
    pub dpi: u32,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_toc_file() -> String {
    "toc.txt".to_string()
}

fn default_output_file() -> String {
    "anki_cards.tsv".to_string()
}

fn default_failed_output_file() -> String {
    "anki_cards_failed.tsv".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_pdf_dpi() -> u32 {
    150
}

impl BookConfig {
    /// Load a book configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: BookConfig = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.book_name.trim().is_empty() {
            return Err(anyhow!("Book name must not be empty"));
        }

        if self.glossary_file.trim().is_empty() {
            return Err(anyhow!("Glossary file must be configured"));
        }

        for chapter in &self.chapters {
            if chapter.start_page > chapter.end_page {
                return Err(ConfigError::InvertedRange {
                    start: chapter.start_page,
                    end: chapter.end_page,
                }
                .into());
            }

            for level in &chapter.deck_path {
                Self::check_level("deck", level)?;
            }
            for level in &chapter.tag_path {
                Self::check_level("tag", level)?;
                // Tag fields are split on spaces downstream, so a space would
                // silently break one level into several tags
                if level.contains(' ') {
                    return Err(level_error("tag", level, "contains a space"));
                }
            }
        }

        Ok(())
    }

    // @checks: A hierarchy level survives '::' flattening and tab-separated output
    fn check_level(kind: &str, level: &str) -> Result<()> {
        if level.is_empty() {
            return Err(level_error(kind, level, "level is empty"));
        }
        if level.contains("::") {
            return Err(level_error(kind, level, "contains the '::' separator"));
        }
        if level.contains('\t') {
            return Err(level_error(kind, level, "contains a tab character"));
        }
        Ok(())
    }

    // @returns: Glossary file path resolved against the book directory
    pub fn glossary_path(&self, book_dir: &Path) -> PathBuf {
        book_dir.join(&self.glossary_file)
    }

    // @returns: Table-of-contents file path resolved against the book directory
    pub fn toc_path(&self, book_dir: &Path) -> PathBuf {
        book_dir.join(&self.toc_file)
    }

    // @returns: Success stream path resolved against the book directory
    pub fn output_path(&self, book_dir: &Path) -> PathBuf {
        book_dir.join(&self.output_file)
    }

    // @returns: Failure stream path resolved against the book directory
    pub fn failed_output_path(&self, book_dir: &Path) -> PathBuf {
        book_dir.join(&self.failed_output_file)
    }

    // @returns: Image directory path resolved against the book directory
    pub fn images_dir_path(&self, book_dir: &Path) -> PathBuf {
        book_dir.join(&self.images.dir)
    }
}

fn level_error(kind: &str, level: &str, problem: &str) -> anyhow::Error {
    ConfigError::InvalidHierarchyLevel {
        kind: kind.to_string(),
        level: level.to_string(),
        problem: problem.to_string(),
    }
    .into()
}

/// Default implementation for BookConfig
impl Default for BookConfig {
    fn default() -> Self {
        BookConfig {
            book_name: String::new(),
            glossary_file: String::new(),
            toc_file: default_toc_file(),
            output_file: default_output_file(),
            failed_output_file: default_failed_output_file(),
            images: ImagesConfig::default(),
            chapters: Vec::new(),
            pdf: None,
            log_level: LogLevel::default(),
        }
    }
}
