/*!
 * Common test utilities for the ankigloss test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a ready-to-convert book directory with a two-chapter configuration,
/// the given glossary content and an empty images directory
pub fn create_test_book(parent: &PathBuf, name: &str, glossary: &str) -> Result<PathBuf> {
    let config = r#"{
    "book_name": "Test Book",
    "glossary_file": "glossary.txt",
    "images": {
        "dir": "images",
        "prefix": "page"
    },
    "chapters": [
        {
            "start_page": 1,
            "end_page": 50,
            "deck": ["Test Book", "01 Basics"],
            "tags": ["test_book", "ch01"]
        },
        {
            "start_page": 51,
            "end_page": 100,
            "deck": ["Test Book", "02 Advanced"],
            "tags": ["test_book", "ch02"]
        }
    ]
}"#;

    let book_dir = parent.join(name);
    fs::create_dir_all(book_dir.join("images"))?;
    create_test_file(&book_dir, "book.json", config)?;
    create_test_file(&book_dir, "glossary.txt", glossary)?;
    Ok(book_dir)
}
