//! Commit history queries

use git2::{Oid, Sort};
use tracing::{debug, instrument};

use bumpkit_core::error::GitError;
use bumpkit_core::monorepo::paths;

use crate::backend::{format_log_record, RevRange};
use crate::date::from_git_time;
use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Raw log records for `range`, oldest first
    #[instrument(skip(self), fields(range = %range))]
    pub fn log_records(&self, range: &RevRange) -> Result<Vec<String>> {
        let failed = |e: git2::Error| GitError::RangeQueryFailed {
            range: range.to_string(),
            reason: e.message().to_string(),
        };

        let oids = self.walk(range).map_err(failed)?;
        let mut records = Vec::with_capacity(oids.len());
        for oid in oids {
            let commit = self.repo.find_commit(oid).map_err(failed)?;
            records.push(log_record(&commit));
        }

        debug!(count = records.len(), "walked commit range");
        Ok(records)
    }

    fn walk(&self, range: &RevRange) -> std::result::Result<Vec<Oid>, git2::Error> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;

        match range {
            RevRange::Between { from, to } => {
                revwalk.push(self.resolve_commit(to)?.id())?;
                revwalk.hide(self.resolve_commit(from)?.id())?;
            }
            RevRange::Through { from, to } => {
                revwalk.push(self.resolve_commit(to)?.id())?;
                for parent in self.resolve_commit(from)?.parent_ids() {
                    revwalk.hide(parent)?;
                }
            }
            RevRange::Single { rev } => return Ok(vec![self.resolve_commit(rev)?.id()]),
        }

        revwalk.collect()
    }

    /// Files changed by a commit, compared with its first parent
    #[instrument(skip(self))]
    pub fn changed_files(&self, hash: &str) -> Result<Vec<String>> {
        let files = self
            .diff_paths(hash)
            .map_err(|e| GitError::ChangedFilesFailed {
                hash: hash.to_string(),
                reason: e.message().to_string(),
            })?;

        debug!(hash, count = files.len(), "listed changed files");
        Ok(files)
    }

    fn diff_paths(&self, hash: &str) -> std::result::Result<Vec<String>, git2::Error> {
        let commit = self.resolve_commit(hash)?;
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        Ok(diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
            .map(paths::normalize)
            .collect())
    }

    /// Number of parents of a commit
    pub fn parent_count(&self, hash: &str) -> Result<usize> {
        let commit = self
            .resolve_commit(hash)
            .map_err(|e| GitError::RangeQueryFailed {
                range: hash.to_string(),
                reason: e.message().to_string(),
            })?;
        Ok(commit.parent_count())
    }

    /// Hash of the root commit reached by following first parents from `rev`
    #[instrument(skip(self))]
    pub fn root_commit(&self, rev: &str) -> Result<String> {
        if self.repo.is_empty()? {
            return Err(GitError::NoCommits);
        }

        let failed = |e: git2::Error| GitError::RangeQueryFailed {
            range: rev.to_string(),
            reason: e.message().to_string(),
        };

        let mut commit = self.resolve_commit(rev).map_err(failed)?;
        while commit.parent_count() > 0 {
            commit = commit.parent(0).map_err(failed)?;
        }

        Ok(commit.id().to_string())
    }
}

fn log_record(commit: &git2::Commit<'_>) -> String {
    let hash = commit.id().to_string();
    let short_hash: String = hash.chars().take(7).collect();
    let author = commit.author();
    let date = from_git_time(author.when())
        .map(|d| d.to_rfc3339())
        .unwrap_or_default();

    format_log_record(
        &hash,
        &short_hash,
        author.name().unwrap_or_default(),
        author.email().unwrap_or_default(),
        &date,
        commit.summary().unwrap_or_default(),
        commit.body().unwrap_or_default(),
    )
}
