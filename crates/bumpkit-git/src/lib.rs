//! bumpkit git - history, tags and commit assembly
//!
//! This crate reads tags and commit ranges from a repository, indexes
//! version tags and assembles classified commit records for impact analysis.

pub mod backend;
mod commits;
pub mod date;
pub mod history;
pub mod mock;
mod repository;
mod status;
pub mod tags;
mod tagging;

pub use backend::{GitBackend, RevRange};
pub use history::{Assembled, HistoryFetcher, HEAD};
pub use mock::{MockBackend, MockCommit};
pub use repository::{GitRepo, Result};
pub use tags::{latest_version_tag, parse_tags, SemverTag, TagVersion};
