//! In-memory backend for tests
//!
//! History is a single line of commits, oldest first. Revisions resolve by
//! full hash, short hash, tag name or `HEAD`.

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

use bumpkit_core::error::GitError;

use crate::backend::{format_log_record, format_tag_line, GitBackend, RevRange};
use crate::repository::Result;

/// A commit of the mock history
#[derive(Debug, Clone)]
pub struct MockCommit {
    pub hash: String,
    pub subject: String,
    pub body: String,
    pub author_name: String,
    pub author_email: String,
    pub date: DateTime<FixedOffset>,
    pub files: Vec<String>,
    pub merge: bool,
}

impl MockCommit {
    /// A commit by a default author
    pub fn new(hash: impl Into<String>, message: &str, date: DateTime<FixedOffset>) -> Self {
        let (subject, body) = match message.split_once("\n\n") {
            Some((subject, body)) => (subject.to_string(), body.to_string()),
            None => (message.to_string(), String::new()),
        };

        Self {
            hash: hash.into(),
            subject,
            body,
            author_name: "Mock Author".to_string(),
            author_email: "mock@example.com".to_string(),
            date,
            files: Vec::new(),
            merge: false,
        }
    }

    /// Set the files this commit touched
    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Mark this commit as having a second parent
    pub fn as_merge(mut self) -> Self {
        self.merge = true;
        self
    }

    fn short_hash(&self) -> String {
        self.hash.chars().take(7).collect()
    }
}

#[derive(Debug, Clone)]
struct MockTag {
    name: String,
    hash: String,
    date: DateTime<FixedOffset>,
}

/// Mock backend for testing without a repository
#[derive(Debug, Default)]
pub struct MockBackend {
    commits: Vec<MockCommit>,
    tags: RefCell<Vec<MockTag>>,
    raw_tag_lines: Vec<String>,
    raw_log_records: Vec<String>,
    broken_files: HashSet<String>,
    created: RefCell<Vec<(String, Option<String>)>>,
}

impl MockBackend {
    /// Create a new empty mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit to the history
    pub fn add_commit(&mut self, commit: MockCommit) {
        self.commits.push(commit);
    }

    /// Tag a commit
    pub fn add_tag(&mut self, name: impl Into<String>, hash: &str, date: DateTime<FixedOffset>) {
        self.tags.get_mut().push(MockTag {
            name: name.into(),
            hash: hash.to_string(),
            date,
        });
    }

    /// Append a raw line to every tag listing
    pub fn add_raw_tag_line(&mut self, line: impl Into<String>) {
        self.raw_tag_lines.push(line.into());
    }

    /// Append a raw record to every log listing
    pub fn add_raw_log_record(&mut self, record: impl Into<String>) {
        self.raw_log_records.push(record.into());
    }

    /// Make changed-file lookups fail for `hash`
    pub fn break_changed_files(&mut self, hash: &str) {
        self.broken_files.insert(hash.to_string());
    }

    /// Tags created through [`GitBackend::create_tag`]
    pub fn created_tags(&self) -> Vec<(String, Option<String>)> {
        self.created.borrow().clone()
    }

    fn position(&self, rev: &str, range: &RevRange) -> Result<usize> {
        let hash = if rev == "HEAD" {
            self.commits.last().map(|c| c.hash.clone())
        } else {
            self.tags
                .borrow()
                .iter()
                .find(|t| t.name == rev)
                .map(|t| t.hash.clone())
                .or_else(|| Some(rev.to_string()))
        };

        hash.and_then(|hash| {
            self.commits
                .iter()
                .position(|c| c.hash == hash || c.short_hash() == hash)
        })
        .ok_or_else(|| GitError::RangeQueryFailed {
            range: range.to_string(),
            reason: format!("unknown revision '{}'", rev),
        })
    }
}

impl GitBackend for MockBackend {
    fn list_tags_raw(&self) -> Result<Vec<String>> {
        let mut lines: Vec<String> = self
            .tags
            .borrow()
            .iter()
            .map(|t| format_tag_line(&t.hash, &t.date.to_rfc3339(), &t.name))
            .collect();
        lines.extend(self.raw_tag_lines.iter().cloned());
        Ok(lines)
    }

    fn log_raw(&self, range: &RevRange) -> Result<Vec<String>> {
        let selected = match range {
            RevRange::Between { from, to } => {
                let start = self.position(from, range)? + 1;
                let end = self.position(to, range)?;
                start..end + 1
            }
            RevRange::Through { from, to } => {
                self.position(from, range)?..self.position(to, range)? + 1
            }
            RevRange::Single { rev } => {
                let at = self.position(rev, range)?;
                at..at + 1
            }
        };

        let mut records: Vec<String> = self
            .commits
            .get(selected)
            .unwrap_or_default()
            .iter()
            .map(|c| {
                format_log_record(
                    &c.hash,
                    &c.short_hash(),
                    &c.author_name,
                    &c.author_email,
                    &c.date.to_rfc3339(),
                    &c.subject,
                    &c.body,
                )
            })
            .collect();
        records.extend(self.raw_log_records.iter().cloned());
        Ok(records)
    }

    fn changed_files(&self, hash: &str) -> Result<Vec<String>> {
        if self.broken_files.contains(hash) {
            return Err(GitError::ChangedFilesFailed {
                hash: hash.to_string(),
                reason: "object not found".to_string(),
            });
        }

        Ok(self
            .commits
            .iter()
            .find(|c| c.hash == hash)
            .map(|c| c.files.clone())
            .unwrap_or_default())
    }

    fn is_merge(&self, hash: &str) -> Result<bool> {
        Ok(self.commits.iter().any(|c| c.hash == hash && c.merge))
    }

    fn root_commit_hash(&self, _rev: &str) -> Result<String> {
        self.commits
            .first()
            .map(|c| c.hash.clone())
            .ok_or(GitError::NoCommits)
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(false)
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()> {
        let head = self
            .commits
            .last()
            .ok_or_else(|| GitError::TagCreationFailed {
                name: name.to_string(),
                reason: GitError::NoCommits.to_string(),
            })?;
        if self.tags.borrow().iter().any(|t| t.name == name) {
            return Err(GitError::TagExists(name.to_string()));
        }

        self.tags.borrow_mut().push(MockTag {
            name: name.to_string(),
            hash: head.hash.clone(),
            date: head.date,
        });
        self.created
            .borrow_mut()
            .push((name.to_string(), message.map(str::to_string)));
        Ok(())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(Some("main".to_string()))
    }
}
