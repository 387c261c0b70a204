use std::fmt;
use log::debug;

// @module: Glossary line parsing and classification

// Han ideograph range used to locate the Chinese segment of a line
const HAN_RANGE: std::ops::RangeInclusive<char> = '\u{4e00}'..='\u{9fa5}';

/// Check whether a string contains at least one Han ideograph
pub fn contains_han(text: &str) -> bool {
    text.chars().any(|c| HAN_RANGE.contains(&c))
}

// @struct: One raw line of the source word list
#[derive(Debug, Clone)]
pub struct GlossaryLine {
    // @field: 1-based position in the input file
    pub line_number: usize,

    // @field: Raw line text, unmodified
    pub raw: String,
}

impl GlossaryLine {
    /// Create a new glossary line
    pub fn new(line_number: usize, raw: &str) -> Self {
        GlossaryLine {
            line_number,
            raw: raw.to_string(),
        }
    }
}

/// Why a line could not be turned into a parsed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The line has no usable trailing page token
    NoPageNumber,
    /// A trailing digit run exists but cannot be told apart from term content
    AmbiguousTrailingNumber,
    /// The remainder could not be split into two non-empty term segments
    MalformedSplit,
    /// The page parsed but no configured chapter range covers it
    PageOutOfConfiguredRange,
}

impl FailureReason {
    /// Stable reason code written to the failure stream
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoPageNumber => "NoPageNumber",
            Self::AmbiguousTrailingNumber => "AmbiguousTrailingNumber",
            Self::MalformedSplit => "MalformedSplit",
            Self::PageOutOfConfiguredRange => "PageOutOfConfiguredRange",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// @struct: Successfully parsed term pair with page reference
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    // @field: 1-based source line number
    pub line_number: usize,

    // @field: Raw source line, kept for demotion to the failure stream
    pub raw: String,

    // @field: Chinese term
    pub chinese_term: String,

    // @field: English term
    pub english_term: String,

    // @field: Page reference
    pub page_number: u32,
}

impl ParsedEntry {
    /// Demote this entry to a failure, keeping the original line text
    pub fn into_failure(self, reason: FailureReason) -> ParseFailure {
        ParseFailure {
            line_number: self.line_number,
            raw: self.raw,
            reason,
        }
    }
}

// @struct: Terminal classification of an unusable line
#[derive(Debug, Clone)]
pub struct ParseFailure {
    // @field: 1-based source line number
    pub line_number: usize,

    // @field: Raw source line
    pub raw: String,

    // @field: Classified reason
    pub reason: FailureReason,
}

/// Outcome of classifying one input line: exactly one entry or one failure
#[derive(Debug, Clone)]
pub enum LineOutcome {
    Entry(ParsedEntry),
    Failure(ParseFailure),
}

impl LineOutcome {
    /// Source line number of either outcome
    pub fn line_number(&self) -> usize {
        match self {
            Self::Entry(entry) => entry.line_number,
            Self::Failure(failure) => failure.line_number,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Self::Entry(_))
    }
}

// @struct: Line classifier for the word-list format
pub struct GlossaryParser;

impl GlossaryParser {
    /// Parse a whole glossary text, one outcome per input line, in input order
    pub fn parse_text(content: &str) -> Vec<LineOutcome> {
        content
            .lines()
            .enumerate()
            .map(|(idx, raw)| Self::parse_line(&GlossaryLine::new(idx + 1, raw)))
            .collect()
    }

    /// Classify a single line into a parsed entry or a parse failure
    ///
    /// The final whitespace token is the page candidate. It only counts as the
    /// page when it is a pure digit run; a digit run glued to letters is term
    /// content the parser refuses to split, and two adjacent digit runs at the
    /// line end cannot be told apart (the page could be either), so both cases
    /// classify as ambiguous rather than guessing.
    pub fn parse_line(line: &GlossaryLine) -> LineOutcome {
        let tokens: Vec<&str> = line.raw.split_whitespace().collect();

        let Some((page_token, term_tokens)) = tokens.split_last() else {
            return Self::fail(line, FailureReason::NoPageNumber);
        };

        if !Self::is_pure_digits(page_token) {
            let reason = if page_token.bytes().any(|b| b.is_ascii_digit()) {
                FailureReason::AmbiguousTrailingNumber
            } else {
                FailureReason::NoPageNumber
            };
            return Self::fail(line, reason);
        }

        // Zero or an overflowing digit run is not a usable page reference
        let page_number = match page_token.parse::<u32>() {
            Ok(page) if page > 0 => page,
            _ => return Self::fail(line, FailureReason::NoPageNumber),
        };

        // "receptor 2 45" - the page could be 2 or 45, refuse to pick one
        if let Some(previous) = term_tokens.last() {
            if Self::is_pure_digits(previous) {
                return Self::fail(line, FailureReason::AmbiguousTrailingNumber);
            }
        }

        // The Chinese segment is the maximal leading run of Han-bearing tokens,
        // everything after it up to the page token is the English term
        let chinese_len = term_tokens
            .iter()
            .take_while(|token| contains_han(token))
            .count();
        let chinese_term = term_tokens[..chinese_len].join(" ");
        let english_term = term_tokens[chinese_len..].join(" ");

        if chinese_term.is_empty() || english_term.is_empty() || contains_han(&english_term) {
            return Self::fail(line, FailureReason::MalformedSplit);
        }

        LineOutcome::Entry(ParsedEntry {
            line_number: line.line_number,
            raw: line.raw.clone(),
            chinese_term,
            english_term,
            page_number,
        })
    }

    fn is_pure_digits(token: &str) -> bool {
        !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
    }

    fn fail(line: &GlossaryLine, reason: FailureReason) -> LineOutcome {
        debug!("Line {} classified {}: {}", line.line_number, reason, line.raw);
        LineOutcome::Failure(ParseFailure {
            line_number: line.line_number,
            raw: line.raw.clone(),
            reason,
        })
    }
}
