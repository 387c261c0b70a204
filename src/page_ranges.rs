/*!
 * Chapter-range index mapping page numbers to deck and tag hierarchies.
 *
 * The index is built once per book from the configured chapter list and is
 * immutable afterwards. Construction validates the configuration: inverted
 * or overlapping ranges are rejected outright, while gaps between chapters
 * only produce a warning because uncovered pages surface later as per-line
 * failures.
 */

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// One configured chapter: an inclusive page interval mapped to a deck path
/// and a tag path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRange {
    /// First page of the chapter, inclusive
    pub start_page: u32,

    /// Last page of the chapter, inclusive
    pub end_page: u32,

    /// Deck hierarchy levels, outermost first
    #[serde(rename = "deck")]
    pub deck_path: Vec<String>,

    /// Tag hierarchy levels, outermost first
    #[serde(rename = "tags")]
    pub tag_path: Vec<String>,
}

impl ChapterRange {
    /// Create a new chapter range
    pub fn new(start_page: u32, end_page: u32, deck_path: Vec<String>, tag_path: Vec<String>) -> Self {
        ChapterRange {
            start_page,
            end_page,
            deck_path,
            tag_path,
        }
    }

    /// Whether the given page falls inside this chapter
    pub fn contains(&self, page: u32) -> bool {
        self.start_page <= page && page <= self.end_page
    }
}

/// Sorted, validated chapter list with binary-search page lookup.
#[derive(Debug, Clone)]
pub struct PageRangeIndex {
    ranges: Vec<ChapterRange>,
}

impl PageRangeIndex {
    /// Build the index from a configured chapter list.
    ///
    /// Ranges are sorted by start page. An inverted range or any overlap
    /// between two ranges rejects the whole configuration before any line
    /// is processed.
    pub fn new(mut ranges: Vec<ChapterRange>) -> Result<Self, ConfigError> {
        for range in &ranges {
            if range.start_page > range.end_page {
                return Err(ConfigError::InvertedRange {
                    start: range.start_page,
                    end: range.end_page,
                });
            }
        }

        ranges.sort_by_key(|range| range.start_page);

        for pair in ranges.windows(2) {
            if pair[1].start_page <= pair[0].end_page {
                return Err(ConfigError::OverlappingRanges {
                    first_start: pair[0].start_page,
                    first_end: pair[0].end_page,
                    second_start: pair[1].start_page,
                    second_end: pair[1].end_page,
                });
            }
            if pair[1].start_page > pair[0].end_page.saturating_add(1) {
                warn!(
                    "Chapter ranges leave pages {}-{} uncovered",
                    pair[0].end_page + 1,
                    pair[1].start_page - 1
                );
            }
        }

        if ranges.is_empty() {
            warn!("No chapter ranges configured, every page will resolve out of range");
        }

        Ok(PageRangeIndex { ranges })
    }

    /// Resolve the chapter covering the given page, if any.
    pub fn lookup(&self, page: u32) -> Option<&ChapterRange> {
        let idx = self.ranges.partition_point(|range| range.start_page <= page);
        if idx == 0 {
            return None;
        }
        let candidate = &self.ranges[idx - 1];
        candidate.contains(page).then_some(candidate)
    }

    /// Number of configured chapters
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Chapters in lookup order
    pub fn ranges(&self) -> &[ChapterRange] {
        &self.ranges
    }
}
