/*!
 * Card assembly: joins parsed entries with chapter resolution and page images.
 *
 * The assembler owns no lookup state of its own; it borrows the immutable
 * range index and image catalog built at run start. Entries whose page falls
 * outside every configured chapter are demoted to the failure stream with a
 * reason of their own, so a configuration hole is never mistaken for a
 * parsing defect.
 */

use log::debug;

use crate::glossary_parser::{FailureReason, LineOutcome, ParseFailure, ParsedEntry};
use crate::image_catalog::ImageCatalog;
use crate::page_ranges::{ChapterRange, PageRangeIndex};

/// Fully resolved card, ready for serialization.
#[derive(Debug, Clone)]
pub struct AssembledCard {
    /// Chinese term
    pub chinese_term: String,

    /// English term
    pub english_term: String,

    /// Page reference
    pub page_number: u32,

    /// Deck hierarchy levels from the resolved chapter
    pub deck_path: Vec<String>,

    /// Tag hierarchy levels from the resolved chapter
    pub tag_path: Vec<String>,

    /// Inline-image fragment, one `<img>` per attached file; None when the
    /// page has no images
    pub image_html: Option<String>,
}

/// Ordered result of one assembly pass. Cards and failures each preserve the
/// input line order of the lines that produced them.
#[derive(Debug, Default)]
pub struct AssemblyOutput {
    pub cards: Vec<AssembledCard>,
    pub failures: Vec<ParseFailure>,
}

impl AssemblyOutput {
    /// Total number of classified lines in this output
    pub fn total(&self) -> usize {
        self.cards.len() + self.failures.len()
    }
}

/// Joins parsed entries with the range index and image catalog.
pub struct CardAssembler<'a> {
    ranges: &'a PageRangeIndex,
    images: &'a ImageCatalog,
}

impl<'a> CardAssembler<'a> {
    /// Create an assembler over the run's immutable lookups.
    pub fn new(ranges: &'a PageRangeIndex, images: &'a ImageCatalog) -> Self {
        CardAssembler { ranges, images }
    }

    /// Assemble a classified line stream into cards and failures.
    pub fn assemble(&self, outcomes: Vec<LineOutcome>) -> AssemblyOutput {
        let mut output = AssemblyOutput::default();

        for outcome in outcomes {
            match outcome {
                LineOutcome::Failure(failure) => output.failures.push(failure),
                LineOutcome::Entry(entry) => match self.ranges.lookup(entry.page_number) {
                    Some(chapter) => output.cards.push(self.build_card(entry, chapter)),
                    None => {
                        debug!(
                            "Line {}: page {} not covered by any chapter range",
                            entry.line_number, entry.page_number
                        );
                        output
                            .failures
                            .push(entry.into_failure(FailureReason::PageOutOfConfiguredRange));
                    }
                },
            }
        }

        output
    }

    fn build_card(&self, entry: ParsedEntry, chapter: &ChapterRange) -> AssembledCard {
        let files = self.images.images_for_page(entry.page_number);
        let image_html = if files.is_empty() {
            None
        } else {
            Some(files.iter().map(|name| image_tag(name)).collect::<String>())
        };

        AssembledCard {
            chinese_term: entry.chinese_term,
            english_term: entry.english_term,
            page_number: entry.page_number,
            deck_path: chapter.deck_path.clone(),
            tag_path: chapter.tag_path.clone(),
            image_html,
        }
    }
}

/// Wrap one image file name in the inline-image tag the import tool renders.
pub fn image_tag(file_name: &str) -> String {
    format!("<img src=\"{}\">", file_name)
}
