/*!
 * Tests for book configuration functionality
 */

use anyhow::Result;
use ankigloss::app_config::{BookConfig, LogLevel};
use ankigloss::errors::ConfigError;
use ankigloss::page_ranges::ChapterRange;
use crate::common;

/// Build a configuration that passes validation
fn valid_config() -> BookConfig {
    BookConfig {
        book_name: "Test Book".to_string(),
        glossary_file: "glossary.txt".to_string(),
        chapters: vec![ChapterRange::new(
            1,
            50,
            vec!["Test Book".to_string(), "01 Basics".to_string()],
            vec!["test_book".to_string(), "ch01".to_string()],
        )],
        ..BookConfig::default()
    }
}

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = BookConfig::default();

    // Test default values
    assert_eq!(config.book_name, "");
    assert_eq!(config.glossary_file, "");
    assert_eq!(config.toc_file, "toc.txt");
    assert_eq!(config.output_file, "anki_cards.tsv");
    assert_eq!(config.failed_output_file, "anki_cards_failed.tsv");
    assert_eq!(config.images.dir, "images");
    assert_eq!(config.images.prefix, "");
    assert!(config.chapters.is_empty());
    assert!(config.pdf.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test loading a minimal configuration file, everything else defaulted
#[test]
fn test_from_file_withMinimalJson_shouldApplyDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_file = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "book.json",
        r#"{ "book_name": "Biology", "glossary_file": "biology_glossary.txt" }"#,
    )?;

    let config = BookConfig::from_file(&config_file)?;

    assert_eq!(config.book_name, "Biology");
    assert_eq!(config.glossary_file, "biology_glossary.txt");
    assert_eq!(config.output_file, "anki_cards.tsv");
    assert_eq!(config.images.dir, "images");
    assert!(config.chapters.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

/// Test loading a full configuration with chapters, images and pdf settings
#[test]
fn test_from_file_withFullJson_shouldParseAllSections() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = r#"{
        "book_name": "Cell Biology",
        "glossary_file": "glossary.txt",
        "output_file": "cards.tsv",
        "images": { "dir": "scans", "prefix": "cb" },
        "chapters": [
            {
                "start_page": 1,
                "end_page": 50,
                "deck": ["glossary", "Cell Biology", "01 The Cell"],
                "tags": ["cell_biology", "ch01"]
            }
        ],
        "pdf": {
            "path": "cell_biology.pdf",
            "glossary_pages": [401, 420],
            "dpi": 200
        },
        "log_level": "debug"
    }"#;
    let config_file =
        common::create_test_file(&temp_dir.path().to_path_buf(), "book.json", content)?;

    let config = BookConfig::from_file(&config_file)?;

    assert_eq!(config.output_file, "cards.tsv");
    assert_eq!(config.images.dir, "scans");
    assert_eq!(config.images.prefix, "cb");
    assert_eq!(config.chapters.len(), 1);
    assert_eq!(config.chapters[0].deck_path[2], "01 The Cell");
    assert_eq!(config.chapters[0].tag_path, vec!["cell_biology", "ch01"]);

    let pdf = config.pdf.as_ref().unwrap();
    assert_eq!(pdf.path, "cell_biology.pdf");
    assert_eq!(pdf.glossary_pages, Some((401, 420)));
    assert_eq!(pdf.toc_pages, None);
    assert_eq!(pdf.dpi, 200);

    assert_eq!(config.log_level, LogLevel::Debug);

    Ok(())
}

/// Test loading from a path that does not exist
#[test]
fn test_from_file_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = BookConfig::from_file(temp_dir.path().join("absent.json"));

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to open"));

    Ok(())
}

/// Test loading a file that is not valid JSON
#[test]
fn test_from_file_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_file = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "book.json",
        "not a json document",
    )?;

    let result = BookConfig::from_file(&config_file);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to parse"));

    Ok(())
}

/// Test configuration validation over valid and broken variants
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() -> Result<()> {
    // Start with a valid config, a space inside a deck level is fine
    let config = valid_config();
    assert!(config.validate().is_ok());

    // Empty book name
    let mut config = valid_config();
    config.book_name = "  ".to_string();
    assert!(config.validate().is_err());

    // Missing glossary file
    let mut config = valid_config();
    config.glossary_file = String::new();
    assert!(config.validate().is_err());

    // Empty hierarchy level
    let mut config = valid_config();
    config.chapters[0].deck_path.push(String::new());
    assert!(config.validate().is_err());

    // A level embedding the '::' separator would change the hierarchy depth
    let mut config = valid_config();
    config.chapters[0].deck_path[0] = "Test::Book".to_string();
    assert!(config.validate().is_err());

    // A tab inside a level would break the column layout
    let mut config = valid_config();
    config.chapters[0].tag_path[0] = "test\tbook".to_string();
    assert!(config.validate().is_err());

    Ok(())
}

/// Test that an inverted chapter range surfaces as a typed error
#[test]
fn test_config_validation_withInvertedChapter_shouldReturnTypedError() -> Result<()> {
    let mut config = valid_config();
    config.chapters[0].start_page = 50;
    config.chapters[0].end_page = 10;

    let err = config.validate().unwrap_err();

    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::InvertedRange { start, end }) => {
            assert_eq!(*start, 50);
            assert_eq!(*end, 10);
        }
        other => panic!("Expected InvertedRange, got {:?}", other),
    }

    Ok(())
}

/// Test that a space is rejected in tag levels but allowed in deck levels
#[test]
fn test_config_validation_withSpaceInTagLevel_shouldFail() -> Result<()> {
    // Deck levels may contain spaces, "01 Basics" is already one
    let config = valid_config();
    assert!(config.validate().is_ok());

    // The same text as a tag level would split into two tags on import
    let mut config = valid_config();
    config.chapters[0].tag_path[1] = "ch 01".to_string();

    let err = config.validate().unwrap_err();
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::InvalidHierarchyLevel { kind, problem, .. }) => {
            assert_eq!(kind, "tag");
            assert!(problem.contains("space"));
        }
        other => panic!("Expected InvalidHierarchyLevel, got {:?}", other),
    }

    Ok(())
}

/// Test path resolution against a book directory
#[test]
fn test_config_paths_withBookDir_shouldResolveRelativeNames() {
    let config = valid_config();
    let book_dir = std::path::Path::new("books/biology");

    assert_eq!(
        config.glossary_path(book_dir),
        book_dir.join("glossary.txt")
    );
    assert_eq!(config.toc_path(book_dir), book_dir.join("toc.txt"));
    assert_eq!(config.output_path(book_dir), book_dir.join("anki_cards.tsv"));
    assert_eq!(
        config.failed_output_path(book_dir),
        book_dir.join("anki_cards_failed.tsv")
    );
    assert_eq!(config.images_dir_path(book_dir), book_dir.join("images"));
}
