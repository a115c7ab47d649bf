//! Workspace support for multi-package repositories
//!
//! This module provides:
//! - Workspace member discovery from manifest workspace patterns
//! - Path-to-member lookup bounded by path separators
//! - Aggregation of commit impacts into per-package release recommendations

pub mod expand;
pub mod impact;
pub mod member;
pub mod paths;
pub mod resolver;

pub use expand::{GlobExpander, PathExpander};
pub use impact::{aggregate, aggregate_with, AttributionFilter, PackageImpact};
pub use member::WorkspaceMember;
pub use resolver::WorkspaceResolver;
