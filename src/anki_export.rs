/*!
 * Serialization of assembled cards into the two tab-separated import streams.
 *
 * Both streams are rendered fully in memory and written only afterwards, so
 * an aborted run never leaves a truncated file behind. Rendering is
 * deterministic: re-running a conversion over unchanged inputs produces
 * byte-identical output.
 */

use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::card_assembler::AssembledCard;
use crate::file_utils::FileManager;
use crate::glossary_parser::ParseFailure;

/// Level separator the import tool reconstructs nested decks and tags from.
pub const HIERARCHY_SEPARATOR: &str = "::";

/// File-header directives matching the success stream's column layout.
const FILE_HEADERS: [&str; 4] = [
    "#separator:tab",
    "#html:true",
    "#deck column:4",
    "#tags column:5",
];

/// Flatten hierarchy levels into the import tool's `::` notation.
pub fn join_hierarchy(levels: &[String]) -> String {
    levels.join(HIERARCHY_SEPARATOR)
}

/// Renders and writes the success and failure streams.
pub struct AnkiExporter;

impl AnkiExporter {
    /// Render the success stream: header directives followed by one
    /// six-column record per card, in card order.
    pub fn render_cards(cards: &[AssembledCard]) -> String {
        let mut output = String::new();

        for header in FILE_HEADERS {
            output.push_str(header);
            output.push('\n');
        }

        for card in cards {
            let columns = [
                card.chinese_term.as_str(),
                card.english_term.as_str(),
                &card.page_number.to_string(),
                &join_hierarchy(&card.deck_path),
                &join_hierarchy(&card.tag_path),
                card.image_html.as_deref().unwrap_or(""),
            ]
            .join("\t");
            output.push_str(&columns);
            output.push('\n');
        }

        output
    }

    /// Render the failure stream: one two-column record per failure, in
    /// failure order. Tabs inside the raw line are normalized to spaces so
    /// the record shape survives.
    pub fn render_failures(failures: &[ParseFailure]) -> String {
        let mut output = String::new();

        for failure in failures {
            output.push_str(&failure.raw.replace('\t', " "));
            output.push('\t');
            output.push_str(failure.reason.code());
            output.push('\n');
        }

        output
    }

    /// Write both streams, overwriting any previous run's files.
    pub fn write_streams(
        cards: &[AssembledCard],
        failures: &[ParseFailure],
        success_path: &Path,
        failure_path: &Path,
    ) -> Result<()> {
        let success_content = Self::render_cards(cards);
        let failure_content = Self::render_failures(failures);

        debug!(
            "Writing {} cards to {:?} and {} failures to {:?}",
            cards.len(),
            success_path,
            failures.len(),
            failure_path
        );

        FileManager::write_to_file(success_path, &success_content)?;
        FileManager::write_to_file(failure_path, &failure_content)?;
        Ok(())
    }
}
