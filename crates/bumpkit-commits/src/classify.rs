//! Release impact classification
//!
//! Maps a commit message to the semantic-versioning impact it implies:
//!
//! 1. any breaking-change note → major
//! 2. `feat` → minor
//! 3. `fix`, `perf` and everything else → patch

use serde::{Deserialize, Serialize};
use tracing::debug;

use bumpkit_core::types::ReleaseImpact;

use crate::parser::{CommitGrammar, ConventionalParser, ParsedMessage};

/// Type reported for messages whose header does not follow the grammar
pub const UNKNOWN_TYPE: &str = "unknown";

/// Classification of one commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Commit type, or [`UNKNOWN_TYPE`]
    pub commit_type: String,
    /// Optional scope
    pub scope: Option<String>,
    /// Header subject, or the first line for unparseable headers
    pub description: String,
    /// Free-form body
    pub body: Option<String>,
    /// Text of the first breaking-change note
    pub breaking_note: Option<String>,
    /// Whether a breaking-change note exists
    pub is_breaking: bool,
    /// Implied release impact
    pub impact: ReleaseImpact,
}

/// Impact implied by a commit type when no breaking note exists
pub fn impact_for_type(commit_type: &str) -> ReleaseImpact {
    match commit_type {
        "feat" => ReleaseImpact::Minor,
        "fix" | "perf" => ReleaseImpact::Patch,
        _ => ReleaseImpact::Patch,
    }
}

/// Classifies commit messages with a grammar
#[derive(Debug, Clone, Default)]
pub struct Classifier<G = ConventionalParser> {
    grammar: G,
}

impl Classifier {
    /// Create a classifier for Conventional Commits
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: CommitGrammar> Classifier<G> {
    /// Create a classifier using a custom grammar
    pub fn with_grammar(grammar: G) -> Self {
        Self { grammar }
    }

    /// Classify a full commit message. Never fails.
    pub fn classify(&self, message: &str) -> Classification {
        let parsed = self.grammar.parse(message);
        let classification = Self::from_parsed(message, parsed);

        debug!(
            commit_type = %classification.commit_type,
            impact = %classification.impact,
            breaking = classification.is_breaking,
            "classified commit"
        );
        classification
    }

    fn from_parsed(message: &str, parsed: ParsedMessage) -> Classification {
        let breaking_note = parsed.breaking_note().map(|n| n.text.clone());
        let is_breaking = breaking_note.is_some();

        let (commit_type, scope, description) = match parsed.header {
            Some(header) => (header.commit_type, header.scope, header.subject),
            None => (
                UNKNOWN_TYPE.to_string(),
                None,
                message.lines().next().unwrap_or_default().trim().to_string(),
            ),
        };

        let impact = if is_breaking {
            ReleaseImpact::Major
        } else {
            impact_for_type(&commit_type)
        };

        Classification {
            commit_type,
            scope,
            description,
            body: parsed.body,
            breaking_note,
            is_breaking,
            impact,
        }
    }
}

/// Classify a message with the Conventional Commits grammar
pub fn classify(message: &str) -> Classification {
    Classifier::new().classify(message)
}
