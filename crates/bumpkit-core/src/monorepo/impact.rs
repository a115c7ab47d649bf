//! Per-package release impact
//!
//! Attributes commits to the workspace members whose files they touched and
//! folds the per-commit impacts into one recommendation per package.

use std::collections::BTreeSet;

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::{CommitRecord, ReleaseImpact};

use super::member::WorkspaceMember;
use super::paths;

/// Release recommendation for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageImpact {
    /// Package name
    pub name: String,
    /// Package path relative to the repository root
    pub path: String,
    /// Version declared in the package manifest
    pub version: String,
    /// Commits attributed to the package, oldest first
    pub commits: Vec<CommitRecord>,
    /// Highest impact among the attributed commits
    pub impact: ReleaseImpact,
}

impl PackageImpact {
    fn empty(member: &WorkspaceMember) -> Self {
        Self {
            name: member.name.clone(),
            path: member.relative_path.clone(),
            version: member.version.clone(),
            commits: Vec::new(),
            impact: ReleaseImpact::Patch,
        }
    }

    /// Attribute a commit, raising the impact if the commit is more severe
    pub fn record(&mut self, commit: &CommitRecord) {
        self.impact = self.impact.max(commit.impact);
        self.commits.push(commit.clone());
    }

    /// The version this package should be released as, when its current
    /// version is valid semver
    pub fn next_version(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version)
            .ok()
            .map(|current| self.impact.apply(&current))
    }
}

/// Files that never count towards attribution
#[derive(Debug, Clone, Default)]
pub struct AttributionFilter {
    ignore: Vec<Pattern>,
}

impl AttributionFilter {
    /// Build a filter from glob patterns; invalid patterns are dropped with a warning
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignore = patterns
            .into_iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = p.as_ref(), error = %e, "ignoring invalid attribution pattern");
                    None
                }
            })
            .collect();
        Self { ignore }
    }

    /// Whether `path` takes part in attribution
    pub fn accepts(&self, path: &str) -> bool {
        !self.ignore.iter().any(|p| p.matches(path))
    }
}

/// Aggregate commits into per-package impacts, considering every file
pub fn aggregate(commits: &[CommitRecord], members: &[WorkspaceMember]) -> Vec<PackageImpact> {
    aggregate_with(commits, members, &AttributionFilter::default())
}

/// Aggregate commits into per-package impacts.
///
/// Only members with at least one attributed commit are returned, ordered by
/// package name.
pub fn aggregate_with(
    commits: &[CommitRecord],
    members: &[WorkspaceMember],
    filter: &AttributionFilter,
) -> Vec<PackageImpact> {
    debug!(
        commits = commits.len(),
        members = members.len(),
        "aggregating package impact"
    );

    let mut impacts: Vec<PackageImpact> = members.iter().map(PackageImpact::empty).collect();

    for commit in commits {
        let touched = touched_members(commit, members, filter);
        for index in touched {
            impacts[index].record(commit);
        }
    }

    let mut affected: Vec<PackageImpact> = impacts
        .into_iter()
        .filter(|impact| !impact.commits.is_empty())
        .collect();
    affected.sort_by(|a, b| a.name.cmp(&b.name));

    info!(affected = affected.len(), "package impact aggregated");
    affected
}

/// Indices of the members owning at least one file of `commit`
fn touched_members(
    commit: &CommitRecord,
    members: &[WorkspaceMember],
    filter: &AttributionFilter,
) -> BTreeSet<usize> {
    commit
        .files
        .iter()
        .filter(|file| filter.accepts(file))
        .filter_map(|file| paths::owner_of(members, file))
        .filter_map(|owner| {
            members
                .iter()
                .position(|m| m.relative_path == owner.relative_path)
        })
        .collect()
}
