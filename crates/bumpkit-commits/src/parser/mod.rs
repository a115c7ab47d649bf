//! Commit message grammars

mod conventional;
mod types;

pub use conventional::ConventionalParser;
pub use types::*;

/// A commit message grammar
///
/// Parsing is total: a message the grammar does not recognise yields a
/// [`ParsedMessage`] without a header rather than an error.
pub trait CommitGrammar: Send + Sync {
    /// Split a full commit message into header, body, footers and notes
    fn parse(&self, message: &str) -> ParsedMessage;
}
