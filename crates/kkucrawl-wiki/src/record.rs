//! Record types produced by the extractors

use std::collections::BTreeSet;

use serde::Serialize;

/// Result of running an extractor over one page's wikitext.
///
/// `NotFound` is not an error: it means the page had no matching structure.
/// Only genuinely broken structure uses `Malformed`.
#[derive(Debug, PartialEq)]
pub enum Extraction<T> {
    Found(T),
    NotFound,
    Malformed(String),
}

/// Acceptance flag (어인정) for a word in the word-game ruleset.
///
/// Serializes as 1 / 0 / -1, matching the snapshot format consumers expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Injeong {
    Accepted,
    Rejected,
    Unknown,
}

impl Injeong {
    /// Parse a table cell value. `None` means the cell text is neither
    /// "O" nor "X"; the caller decides whether that warrants a warning.
    pub fn from_flag(cell: &str) -> Option<Self> {
        match cell {
            "O" => Some(Self::Accepted),
            "X" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Self::Accepted => 1,
            Self::Rejected => 0,
            Self::Unknown => -1,
        }
    }
}

impl serde::Serialize for Injeong {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// One data row from a word-list table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordRow {
    pub word: String,
    pub injeong: Injeong,
    pub subject: String,
}

/// Everything extracted from the word-list tables of a single page.
#[derive(Debug, Default, PartialEq)]
pub struct WordListPage {
    pub rows: Vec<WordRow>,
    /// Distinct terminal-node (끝말) values; fed downstream to discover
    /// candidate new targets
    pub nodes: BTreeSet<String>,
}

/// Field map from one 단어 template instance, in source order.
pub type WordFields = serde_json::Map<String, serde_json::Value>;
