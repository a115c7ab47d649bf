//! Parsed message types

use serde::{Deserialize, Serialize};

/// Title given to notes that announce breaking changes
pub const BREAKING_CHANGE: &str = "BREAKING CHANGE";

/// The `type(scope)!: subject` line of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Commit type, lowercased
    pub commit_type: String,
    /// Optional scope
    pub scope: Option<String>,
    /// Whether the header carried a `!`
    pub breaking_marker: bool,
    /// Text after the colon
    pub subject: String,
}

/// A `Token: value` or `Token #value` trailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    /// Footer token as written
    pub token: String,
    /// Footer value, continuation lines joined with newlines
    pub value: String,
}

impl Footer {
    /// Whether this footer announces a breaking change
    pub fn is_breaking(&self) -> bool {
        self.token == BREAKING_CHANGE || self.token == "BREAKING-CHANGE"
    }
}

/// A note extracted from the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note title, e.g. [`BREAKING_CHANGE`]
    pub title: String,
    /// Note text
    pub text: String,
}

/// Structured form of a commit message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Header, when the first line follows the grammar
    pub header: Option<Header>,
    /// Free-form body between header and footers
    pub body: Option<String>,
    /// Trailers in message order
    pub footers: Vec<Footer>,
    /// Notes in message order
    pub notes: Vec<Note>,
}

impl ParsedMessage {
    /// The first breaking-change note, if any
    pub fn breaking_note(&self) -> Option<&Note> {
        self.notes.iter().find(|n| n.title == BREAKING_CHANGE)
    }
}
