//! Chapter heading detection for unstructured text
//!
//! Headings are found by a cascade of heuristics. Each tier is tried in order and
//! the first one that yields at least one heading wins; later tiers are never
//! consulted and tiers are never merged.

use crate::lines::lines_with_offsets;
use crate::types::Chapter;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Numerals accepted inside a `第…章` style heading
const CJK_NUMERALS: &str = "0-9０-９零〇一二三四五六七八九十百千万萬两兩";

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*\S)").expect("valid heading pattern"));

static LOCALIZED_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?:第\s*[{CJK_NUMERALS}]+\s*[章節节篇]|(?i:chapter)\s+(?:[0-9]+|(?i:[ivxlcdm]+))\b|[0-9]+[、.])"
    ))
    .expect("valid localized chapter pattern")
});

static NUMBERED_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*第[{CJK_NUMERALS}]+章")).expect("valid numbered chapter pattern")
});

static CHAPTER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[章節节卷篇]|(?i)\b(?:chapter|section|part)\b").expect("valid keyword pattern")
});

static BARE_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+(?:、|\.\s)\s*\S").expect("valid numbering pattern"));

/// Whether a line is a `#`..`######` heading, the boundary between pagination units
pub(crate) fn is_heading_line(line: &str) -> bool {
    MARKDOWN_HEADING.is_match(line.trim_end())
}

/// One heuristic in the classification cascade, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// `#`..`######` headings; level is the marker count
    StructuredHeadings,
    /// `第N章/節/篇`, `Chapter N`, `N、` and `N.` at line start
    LocalizedChapterWords,
    /// The exact `第N章` shape
    NumberedChapters,
    /// Any line containing a chapter, section or part keyword
    LooseKeywords,
    /// `N、` or `N. ` followed by text
    BareNumbering,
}

impl Tier {
    /// All tiers in the order they are attempted
    pub const CASCADE: [Tier; 5] = [
        Tier::StructuredHeadings,
        Tier::LocalizedChapterWords,
        Tier::NumberedChapters,
        Tier::LooseKeywords,
        Tier::BareNumbering,
    ];

    /// Run this tier alone over the text
    pub fn scan(self, text: &str) -> TierOutcome {
        let chapters: Vec<Chapter> = lines_with_offsets(text)
            .filter_map(|(offset, line)| self.match_line(line, offset))
            .collect();

        if chapters.is_empty() {
            TierOutcome::NoMatch
        } else {
            TierOutcome::Matches(chapters)
        }
    }

    fn match_line(self, line: &str, offset: usize) -> Option<Chapter> {
        let line = line.trim_end();
        match self {
            Tier::StructuredHeadings => {
                let caps = MARKDOWN_HEADING.captures(line)?;
                let level = caps[1].len() as u8;
                Some(Chapter::new(caps[2].trim(), offset).with_level(level))
            }
            Tier::LocalizedChapterWords => whole_line(&LOCALIZED_CHAPTER, line, offset),
            Tier::NumberedChapters => whole_line(&NUMBERED_CHAPTER, line, offset),
            Tier::LooseKeywords => whole_line(&CHAPTER_KEYWORD, line, offset),
            Tier::BareNumbering => whole_line(&BARE_NUMBERING, line, offset),
        }
    }
}

fn whole_line(pattern: &Regex, line: &str, offset: usize) -> Option<Chapter> {
    let title = line.trim();
    if title.is_empty() || !pattern.is_match(line) {
        return None;
    }
    Some(Chapter::new(title, offset))
}

/// Result of running a single tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    NoMatch,
    Matches(Vec<Chapter>),
}

/// Outcome of the full cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The tier that produced the headings, or `None` if every tier missed
    pub tier: Option<Tier>,
    pub chapters: Vec<Chapter>,
}

/// Run the cascade and report which tier fired
pub fn classify_with_tier(text: &str) -> Classification {
    if text.trim().is_empty() {
        return Classification {
            tier: None,
            chapters: Vec::new(),
        };
    }

    for tier in Tier::CASCADE {
        if let TierOutcome::Matches(chapters) = tier.scan(text) {
            tracing::debug!(?tier, count = chapters.len(), "chapter tier matched");
            return Classification {
                tier: Some(tier),
                chapters,
            };
        }
    }

    tracing::debug!("no chapter headings detected");
    Classification {
        tier: None,
        chapters: Vec::new(),
    }
}

/// Detect chapter headings in document order
///
/// `page_index` on the returned chapters is left at 0 for the binder to fill in.
pub fn classify(text: &str) -> Vec<Chapter> {
    classify_with_tier(text).chapters
}
