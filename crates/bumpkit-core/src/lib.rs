//! bumpkit core - shared types for release impact analysis
//!
//! This crate provides the error taxonomy, configuration, commit and impact
//! types, package manifests and workspace resolution used by the rest of
//! bumpkit.

pub mod config;
pub mod error;
pub mod manifest;
pub mod monorepo;
pub mod skip;
pub mod types;

pub use config::Config;
pub use error::{BumpkitError, ConfigError, ExpandError, GitError, ManifestError, Result};
pub use manifest::{FsManifestReader, Manifest, ManifestReader};
pub use monorepo::{
    aggregate, aggregate_with, AttributionFilter, GlobExpander, PackageImpact, PathExpander,
    WorkspaceMember, WorkspaceResolver,
};
pub use skip::{Collected, Skipped};
pub use types::{CommitAuthor, CommitRecord, ReleaseImpact};
