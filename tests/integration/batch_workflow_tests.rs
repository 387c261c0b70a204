/*!
 * Integration tests for batch conversion over a books directory
 */

use std::fs;
use anyhow::Result;

use ankigloss::app_controller::Controller;
use crate::common;

/// Test that a batch run converts every book, survives a broken one and
/// writes the JSON report
#[test]
fn test_batch_workflow_withMixedBooks_shouldContinueAndReport() -> Result<()> {
    // 1. Create a books directory with two good books and one broken book
    let temp_dir = common::create_temp_dir()?;
    let books_dir = temp_dir.path().join("books");
    fs::create_dir_all(&books_dir)?;

    common::create_test_book(&books_dir, "alpha", "细胞 cell 12\n")?;
    let beta_dir = common::create_test_book(&books_dir, "beta", "细胞 cell 12\n")?;
    common::create_test_book(&books_dir, "gamma", "组织 tissue 51\n线粒体 mitochondrion 120\n")?;

    // Break beta after scaffolding so it still carries a book.json marker
    fs::remove_file(beta_dir.join("glossary.txt"))?;

    // 2. Run the batch with an explicit report path
    let report_path = temp_dir.path().join("report.json");
    let report = Controller::run_books_dir(&books_dir, Some(&report_path))?;

    // 3. All three books are accounted for, in sorted directory order
    assert_eq!(report.books_processed, 3);
    assert_eq!(report.books_failed, 1);
    assert!(report.books[0].directory.ends_with("alpha"));
    assert!(report.books[1].directory.ends_with("beta"));
    assert!(report.books[2].directory.ends_with("gamma"));

    // 4. The good books completed with per-book counters
    assert!(report.books[0].fatal_error.is_none());
    assert_eq!(report.books[0].parsed, 1);
    assert!(report.books[2].fatal_error.is_none());
    assert_eq!(report.books[2].parsed, 1);
    assert_eq!(report.books[2].failed, 1);

    // 5. The broken book recorded its fatal error and produced no output
    let beta = &report.books[1];
    assert!(beta.fatal_error.as_deref().unwrap_or("").contains("Glossary file does not exist"));
    assert!(!beta_dir.join("anki_cards.tsv").exists());

    // 6. The good books wrote their streams despite the failure in between
    assert!(books_dir.join("alpha").join("anki_cards.tsv").exists());
    assert!(books_dir.join("gamma").join("anki_cards.tsv").exists());

    // 7. The report landed at the requested path and is valid JSON
    let report_json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(report_json["books_processed"], 3);
    assert_eq!(report_json["books_failed"], 1);
    assert_eq!(report_json["books"][1]["book_name"], "beta");
    assert!(report_json["books"][0].get("fatal_error").is_none());

    Ok(())
}

/// Test that a books directory without any configured book fails
#[test]
fn test_batch_workflow_withEmptyBooksDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = Controller::run_books_dir(temp_dir.path(), None);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No book directories"));

    Ok(())
}

/// Test that a missing books directory fails up front
#[test]
fn test_batch_workflow_withMissingBooksDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = Controller::run_books_dir(&temp_dir.path().join("absent"), None);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("does not exist"));

    Ok(())
}

/// Test that without an explicit path the report lands in the books directory
#[test]
fn test_batch_workflow_withoutReportPath_shouldWriteTimestampedReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let books_dir = temp_dir.path().join("books");
    fs::create_dir_all(&books_dir)?;
    common::create_test_book(&books_dir, "alpha", "细胞 cell 12\n")?;

    Controller::run_books_dir(&books_dir, None)?;

    // Exactly one batch_report_<timestamp>.json appears next to the books
    let reports: Vec<_> = fs::read_dir(&books_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("batch_report_") && name.ends_with(".json"))
        .collect();

    assert_eq!(reports.len(), 1, "Expected one report file, found {:?}", reports);

    Ok(())
}
