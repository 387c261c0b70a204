/*!
 * Error types for the ankigloss application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that reject a chapter-range configuration at construction time
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two configured chapter ranges cover the same page
    #[error("chapter ranges overlap: pages {first_start}-{first_end} and {second_start}-{second_end}")]
    OverlappingRanges {
        /// Start page of the earlier range
        first_start: u32,
        /// End page of the earlier range
        first_end: u32,
        /// Start page of the conflicting range
        second_start: u32,
        /// End page of the conflicting range
        second_end: u32,
    },

    /// A chapter range ends before it starts
    #[error("chapter range is inverted: start page {start} is after end page {end}")]
    InvertedRange {
        /// Configured start page
        start: u32,
        /// Configured end page
        end: u32,
    },

    /// A deck or tag hierarchy level is unusable in the output format
    #[error("invalid {kind} level '{level}': {problem}")]
    InvalidHierarchyLevel {
        /// Either "deck" or "tag"
        kind: String,
        /// The offending level text
        level: String,
        /// What makes the level unusable
        problem: String,
    },
}

/// Errors that reject the page-image directory at catalog construction time
#[derive(Error, Debug)]
pub enum CatalogError {
    /// An image file name contains whitespace
    #[error("image file name contains spaces: {0}")]
    SpaceInFilename(String),

    /// An image file name contains Han script characters
    #[error("image file name contains Chinese characters: {0}")]
    NativeScriptInFilename(String),

    /// The image directory could not be walked
    #[error("failed to scan image directory: {0}")]
    Scan(#[from] walkdir::Error),
}

/// Errors that can occur while driving the external PDF tools
#[derive(Error, Debug)]
pub enum PdfError {
    /// The book configuration has no pdf section to work from
    #[error("book configuration has no pdf section")]
    MissingSection,

    /// An external tool could not be started, usually because it is not installed
    #[error("could not run {tool} (is poppler-utils installed?): {message}")]
    ToolUnavailable {
        /// Tool binary name
        tool: String,
        /// Underlying launch error
        message: String,
    },

    /// An external tool ran but reported failure
    #[error("{tool} failed: {message}")]
    ToolFailed {
        /// Tool binary name
        tool: String,
        /// Filtered stderr from the tool
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from chapter-range configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the image catalog
    #[error("Image catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from the PDF extraction driver
    #[error("PDF extraction error: {0}")]
    Pdf(#[from] PdfError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
