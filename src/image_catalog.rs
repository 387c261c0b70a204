/*!
 * Page-image catalog.
 *
 * The catalog is built once by scanning the book's image directory and is an
 * immutable page-number to file-name lookup afterwards. Image files follow a
 * filename convention that embeds the page number in the stem, optionally
 * behind a configured prefix and a `-`/`_` separator, with or without zero
 * padding (`page-0077.png`, `page77.png`, `scan_077.jpg`).
 *
 * File names must be free of whitespace and Han script so they survive the
 * tab-separated output and the downstream media import; violations reject
 * the directory outright. Files that merely fail to carry a page token are
 * skipped with a debug note.
 */

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::errors::CatalogError;
use crate::glossary_parser::contains_han;

// Trailing page-number token of an image file stem
static PAGE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)$").unwrap());

/// Accepted raster formats, anything else is ignored
const IMAGE_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// Immutable page-number to image-file lookup for one book.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    by_page: HashMap<u32, Vec<String>>,
}

impl ImageCatalog {
    /// Catalog with no images, used when a book has no image directory.
    pub fn empty() -> Self {
        ImageCatalog::default()
    }

    /// Scan an image directory and build the lookup.
    ///
    /// Only the directory itself is scanned, not subdirectories. When a
    /// prefix is configured, only stems of the form `prefix`, separator,
    /// digits qualify; with an empty prefix any stem ending in a digit run
    /// qualifies.
    pub fn build<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<Self, CatalogError> {
        let mut by_page: HashMap<u32, Vec<String>> = HashMap::new();

        for entry in WalkDir::new(dir.as_ref()).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let is_image = path.extension().is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.to_string_lossy().eq_ignore_ascii_case(accepted))
            });
            if !is_image {
                continue;
            }

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            if file_name.chars().any(char::is_whitespace) {
                return Err(CatalogError::SpaceInFilename(file_name));
            }
            if contains_han(&file_name) {
                return Err(CatalogError::NativeScriptInFilename(file_name));
            }

            match Self::page_token(&file_name, prefix) {
                Some(page) => by_page.entry(page).or_default().push(file_name),
                None => debug!("No page token in image file name: {}", file_name),
            }
        }

        // Deterministic attachment order for pages with several images
        for files in by_page.values_mut() {
            files.sort();
        }

        Ok(ImageCatalog { by_page })
    }

    /// Extract the page number embedded in an image file name.
    fn page_token(file_name: &str, prefix: &str) -> Option<u32> {
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _ext)| stem)
            .unwrap_or(file_name);

        let rest = if prefix.is_empty() {
            stem
        } else {
            stem.strip_prefix(prefix)?
        };

        let digits = PAGE_TOKEN_REGEX.captures(rest)?.get(1)?.as_str();
        let between = &rest[..rest.len() - digits.len()];
        if !prefix.is_empty() && !(between.is_empty() || between == "-" || between == "_") {
            return None;
        }

        digits.parse::<u32>().ok().filter(|page| *page > 0)
    }

    /// All image file names attached to a page, sorted; empty when none match.
    pub fn images_for_page(&self, page: u32) -> &[String] {
        self.by_page
            .get(&page)
            .map(|files| files.as_slice())
            .unwrap_or(&[])
    }

    /// Number of pages that have at least one image
    pub fn page_count(&self) -> usize {
        self.by_page.len()
    }

    /// Total number of catalogued image files
    pub fn file_count(&self) -> usize {
        self.by_page.values().map(|files| files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_page.is_empty()
    }
}
