//! bumpkit commits - commit message parsing and release impact classification
//!
//! This crate turns raw commit messages into structured form and decides the
//! semantic-versioning impact each one implies.

pub mod classify;
pub mod parser;

pub use classify::{classify, Classification, Classifier, UNKNOWN_TYPE};
pub use parser::{CommitGrammar, ConventionalParser, ParsedMessage};
