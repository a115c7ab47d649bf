//! Commit assembly
//!
//! Resolves a history range, reads the raw log and turns every record into a
//! classified [`CommitRecord`] with its changed files.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use bumpkit_commits::classify::Classifier;
use bumpkit_core::skip::{Collected, Skipped};
use bumpkit_core::types::{CommitAuthor, CommitRecord};

use crate::backend::{split_log_record, GitBackend, RevRange};
use crate::date::parse_git_date;
use crate::repository::Result;
use crate::tags::{latest_version_tag, parse_tags, SemverTag};

/// Default end of a range
pub const HEAD: &str = "HEAD";

/// Commits of a range, plus the records that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembled {
    /// The range that was walked
    pub range: RevRange,
    /// Assembled commits, oldest first
    pub commits: Vec<CommitRecord>,
    /// Raw records that were dropped, and merges when they are excluded
    pub skipped: Vec<Skipped>,
}

/// One raw log record, split but not yet classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub hash: String,
    pub short_hash: String,
    pub author: CommitAuthor,
    pub subject: String,
    pub body: String,
}

impl RawCommit {
    /// Subject, or subject, blank line and body
    pub fn message(&self) -> String {
        if self.body.trim().is_empty() {
            self.subject.clone()
        } else {
            format!("{}\n\n{}", self.subject, self.body.trim_end())
        }
    }
}

/// Split a `hash|short|name|email|date|subject|body` record.
///
/// The body is optional and may itself contain separators.
pub fn parse_log_record(record: &str) -> std::result::Result<RawCommit, String> {
    let fields = split_log_record(record, 7);
    if fields.len() < 6 {
        return Err(format!("expected at least 6 fields, found {}", fields.len()));
    }
    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();
    let (hash, short_hash, name, email, date, subject, body) =
        (next(), next(), next(), next(), next(), next(), next());

    let date =
        parse_git_date(&date).ok_or_else(|| format!("unparseable author date '{}'", date))?;

    Ok(RawCommit {
        hash: hash.trim().to_string(),
        short_hash: short_hash.trim().to_string(),
        author: CommitAuthor { name, email, date },
        subject,
        body,
    })
}

/// Reads history from a backend and assembles classified commits
pub struct HistoryFetcher<B> {
    backend: B,
    classifier: Classifier,
    include_merges: bool,
}

impl<B: GitBackend> HistoryFetcher<B> {
    /// Create a fetcher that assembles every commit, merges included
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            classifier: Classifier::new(),
            include_merges: true,
        }
    }

    /// Keep merge commits, or drop them as skip records
    pub fn with_merges(mut self, include: bool) -> Self {
        self.include_merges = include;
        self
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All tags, newest first
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Collected<SemverTag>> {
        let collected = parse_tags(self.backend.list_tags_raw()?);
        debug!(
            tags = collected.items.len(),
            skipped = collected.skipped.len(),
            "indexed tags"
        );
        Ok(collected)
    }

    /// The newest version tag, if any
    pub fn latest_version_tag(&self) -> Result<Option<SemverTag>> {
        let tags = self.tags()?;
        Ok(latest_version_tag(&tags.items).cloned())
    }

    /// Decide which commits `from..to` covers.
    ///
    /// Without `from` the range starts after the latest version tag, or at
    /// the root commit (inclusive) when there is none.
    #[instrument(skip(self))]
    pub fn resolve_range(&self, from: Option<&str>, to: &str) -> Result<RevRange> {
        let from = match from {
            Some(from) => from.to_string(),
            None => match self.latest_version_tag()? {
                Some(tag) => {
                    debug!(tag = %tag.name, "starting after latest version tag");
                    tag.name
                }
                None => {
                    let root = self.backend.root_commit_hash(to)?;
                    debug!(root = %root, "no version tag, starting at root commit");
                    return Ok(RevRange::Through {
                        from: root,
                        to: to.to_string(),
                    });
                }
            },
        };

        if from == to {
            Ok(RevRange::Single { rev: from })
        } else {
            Ok(RevRange::Between {
                from,
                to: to.to_string(),
            })
        }
    }

    /// Resolve `from..to` and assemble its commits
    pub fn assemble_range(&self, from: Option<&str>, to: &str) -> Result<Assembled> {
        let range = self.resolve_range(from, to)?;
        self.assemble(range)
    }

    /// Assemble the commits of `range`, oldest first
    #[instrument(skip(self), fields(range = %range))]
    pub fn assemble(&self, range: RevRange) -> Result<Assembled> {
        let records = self.backend.log_raw(&range)?;
        let raw = Collected::fold(&records, parse_log_record);

        for skipped in &raw.skipped {
            warn!(record = %skipped.input, reason = %skipped.reason, "skipping log record");
        }

        let mut skipped = raw.skipped;
        let mut commits = Vec::with_capacity(raw.items.len());
        for commit in raw.items {
            if !self.include_merges && self.backend.is_merge(&commit.hash)? {
                info!(hash = %commit.short_hash, subject = %commit.subject, "skipping merge commit");
                skipped.push(Skipped::new(commit.hash, "merge commit"));
                continue;
            }
            let files = self.backend.changed_files(&commit.hash)?;
            commits.push(self.build(commit, files));
        }

        info!(
            commits = commits.len(),
            skipped = skipped.len(),
            "assembled commit range"
        );

        Ok(Assembled {
            range,
            commits,
            skipped,
        })
    }

    fn build(&self, raw: RawCommit, files: Vec<String>) -> CommitRecord {
        let message = raw.message();
        let c = self.classifier.classify(&message);

        CommitRecord {
            hash: raw.hash,
            short_hash: raw.short_hash,
            message,
            commit_type: c.commit_type,
            scope: c.scope,
            description: c.description,
            body: c.body,
            breaking_note: c.breaking_note,
            is_breaking: c.is_breaking,
            impact: c.impact,
            author: raw.author,
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockCommit};
    use crate::repository::fixtures::Fixture;
    use bumpkit_core::error::GitError;
    use bumpkit_core::types::ReleaseImpact;
    use chrono::{DateTime, FixedOffset};

    fn date(day: u32) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("2024-01-{:02}T10:00:00+00:00", day)).unwrap()
    }

    fn history() -> MockBackend {
        let mut mock = MockBackend::new();
        mock.add_commit(MockCommit::new("a000000001", "chore: init", date(1)).with_files(&["package.json"]));
        mock.add_commit(
            MockCommit::new("b000000002", "feat(a): add thing", date(2))
                .with_files(&["packages/a/index.ts"]),
        );
        mock.add_commit(
            MockCommit::new(
                "c000000003",
                "fix(b): repair\n\nBREAKING CHANGE: options renamed",
                date(3),
            )
            .with_files(&["packages/b/index.ts"]),
        );
        mock
    }

    #[test]
    fn test_parse_log_record() {
        let raw = parse_log_record(
            "abc|ab|Jane|jane@example.com|2024-01-15 10:00:00 +0000|feat: x|line | with bar",
        )
        .unwrap();

        assert_eq!(raw.hash, "abc");
        assert_eq!(raw.author.name, "Jane");
        assert_eq!(raw.subject, "feat: x");
        assert_eq!(raw.body, "line | with bar");
        assert_eq!(raw.message(), "feat: x\n\nline | with bar");
    }

    #[test]
    fn test_parse_log_record_without_body_field() {
        let raw = parse_log_record("abc|ab|Jane|j@x|2024-01-15T10:00:00Z|chore: y").unwrap();
        assert_eq!(raw.body, "");
        assert_eq!(raw.message(), "chore: y");
    }

    #[test]
    fn test_parse_log_record_rejects_short_and_bad_dates() {
        assert!(parse_log_record("abc|ab|Jane|j@x|2024-01-15T10:00:00Z").is_err());
        assert!(parse_log_record("abc|ab|Jane|j@x|someday|feat: x|").is_err());
    }

    #[test]
    fn test_root_fallback_includes_root_commit() {
        let mut mock = MockBackend::new();
        mock.add_commit(MockCommit::new("a000000001", "feat: first", date(1)).with_files(&["index.ts"]));
        let fetcher = HistoryFetcher::new(mock);

        let assembled = fetcher.assemble_range(None, HEAD).unwrap();

        assert_eq!(
            assembled.range,
            RevRange::Through {
                from: "a000000001".into(),
                to: HEAD.into()
            }
        );
        assert_eq!(assembled.commits.len(), 1);
        assert_eq!(assembled.commits[0].impact, ReleaseImpact::Minor);
    }

    #[test]
    fn test_starts_after_latest_version_tag() {
        let mut mock = history();
        mock.add_tag("v1.0.0", "a000000001", date(1));
        mock.add_tag("nightly", "b000000002", date(2));
        let fetcher = HistoryFetcher::new(mock);

        let assembled = fetcher.assemble_range(None, HEAD).unwrap();

        assert_eq!(assembled.range.to_string(), "v1.0.0..HEAD");
        let hashes: Vec<_> = assembled.commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["b000000002", "c000000003"]);
    }

    #[test]
    fn test_from_equal_to_is_single_commit() {
        let fetcher = HistoryFetcher::new(history());

        let range = fetcher.resolve_range(Some("b000000002"), "b000000002").unwrap();
        assert_eq!(range, RevRange::Single { rev: "b000000002".into() });
        assert_eq!(fetcher.assemble(range).unwrap().commits.len(), 1);
    }

    #[test]
    fn test_records_are_classified_with_files() {
        let fetcher = HistoryFetcher::new(history());
        let assembled = fetcher.assemble_range(Some("a000000001"), HEAD).unwrap();

        let fix = &assembled.commits[1];
        assert_eq!(fix.commit_type, "fix");
        assert_eq!(fix.scope.as_deref(), Some("b"));
        assert!(fix.is_breaking);
        assert_eq!(fix.breaking_note.as_deref(), Some("options renamed"));
        assert_eq!(fix.impact, ReleaseImpact::Major);
        assert_eq!(fix.files, vec!["packages/b/index.ts"]);
        assert_eq!(fix.message, "fix(b): repair\n\nBREAKING CHANGE: options renamed");
        assert_eq!(fix.short_hash, "c000000");
    }

    #[test]
    fn test_malformed_tag_lines_are_dropped() {
        let mut mock = history();
        mock.add_tag("v1.0.0", "a000000001", date(1));
        mock.add_raw_tag_line("abc1234\t2024-01-15");
        let fetcher = HistoryFetcher::new(mock);

        let tags = fetcher.tags().unwrap();
        assert_eq!(tags.items.len(), 1);
        assert_eq!(tags.skipped[0].input, "abc1234\t2024-01-15");
        assert_eq!(fetcher.latest_version_tag().unwrap().unwrap().name, "v1.0.0");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let mut mock = history();
        mock.add_raw_log_record("garbage");
        mock.add_raw_log_record("d|d|X|x@x|not a date|feat: z|");
        let fetcher = HistoryFetcher::new(mock);

        let assembled = fetcher.assemble_range(Some("a000000001"), HEAD).unwrap();

        assert_eq!(assembled.commits.len(), 2);
        assert_eq!(assembled.skipped.len(), 2);
        assert_eq!(assembled.skipped[0].input, "garbage");
    }

    fn history_with_merge() -> MockBackend {
        let mut mock = history();
        mock.add_commit(MockCommit::new("d000000004", "Merge branch 'topic'", date(4)).as_merge());
        mock
    }

    #[test]
    fn test_merge_commits_kept_by_default() {
        let fetcher = HistoryFetcher::new(history_with_merge());
        let assembled = fetcher.assemble_range(Some("a000000001"), HEAD).unwrap();

        assert_eq!(assembled.commits.len(), 3);
        assert_eq!(assembled.commits[2].commit_type, "unknown");
        assert!(assembled.skipped.is_empty());
    }

    #[test]
    fn test_excluded_merges_become_skip_records() {
        let fetcher = HistoryFetcher::new(history_with_merge()).with_merges(false);
        let assembled = fetcher.assemble_range(Some("a000000001"), HEAD).unwrap();

        assert_eq!(assembled.commits.len(), 2);
        assert_eq!(assembled.skipped.len(), 1);
        assert_eq!(assembled.skipped[0].input, "d000000004");
        assert_eq!(assembled.skipped[0].reason, "merge commit");
    }

    #[test]
    fn test_merge_is_detected_by_parents_not_subject() {
        let mut mock = history();
        mock.add_commit(
            MockCommit::new("d000000004", "Merge sort implementation for lists", date(4))
                .with_files(&["src/sort.ts"]),
        );
        let fetcher = HistoryFetcher::new(mock).with_merges(false);

        let assembled = fetcher.assemble_range(Some("a000000001"), HEAD).unwrap();

        assert_eq!(assembled.commits.len(), 3);
        assert_eq!(assembled.commits[2].files, vec!["src/sort.ts"]);
        assert!(assembled.skipped.is_empty());
    }

    #[test]
    fn test_separator_in_subject_and_author_is_preserved() {
        let mut mock = MockBackend::new();
        let mut commit = MockCommit::new("a000000001", "feat: pipe a|b into c", date(1))
            .with_files(&["index.ts"]);
        commit.author_name = "Build | Bot".to_string();
        mock.add_commit(commit);
        let fetcher = HistoryFetcher::new(mock);

        let assembled = fetcher.assemble_range(None, HEAD).unwrap();

        assert!(assembled.skipped.is_empty());
        let commit = &assembled.commits[0];
        assert_eq!(commit.description, "pipe a|b into c");
        assert_eq!(commit.author.name, "Build | Bot");
    }

    #[test]
    fn test_changed_files_failure_is_terminal() {
        let mut mock = history();
        mock.break_changed_files("b000000002");
        let fetcher = HistoryFetcher::new(mock);

        match fetcher.assemble_range(Some("a000000001"), HEAD) {
            Err(GitError::ChangedFilesFailed { hash, .. }) => assert_eq!(hash, "b000000002"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_from_is_range_error() {
        let fetcher = HistoryFetcher::new(history());
        assert!(matches!(
            fetcher.assemble_range(Some("v9.9.9"), HEAD),
            Err(GitError::RangeQueryFailed { .. })
        ));
    }

    #[test]
    fn test_empty_history_has_no_root() {
        let fetcher = HistoryFetcher::new(MockBackend::new());
        assert!(matches!(
            fetcher.assemble_range(None, HEAD),
            Err(GitError::NoCommits)
        ));
    }

    #[test]
    fn test_assemble_real_repository() {
        let mut fx = Fixture::new();
        let first = fx.commit("chore: init", &["package.json"]);
        fx.tag("v0.1.0", &first);
        fx.commit("feat(a): add\n\nsome body", &["packages/a/src/index.ts"]);
        fx.commit("fix(b)!: drop option", &["packages/b/index.ts", "README.md"]);
        let fetcher = HistoryFetcher::new(fx.open());

        let assembled = fetcher.assemble_range(None, HEAD).unwrap();

        assert!(assembled.skipped.is_empty());
        assert_eq!(assembled.commits.len(), 2);
        assert_eq!(assembled.commits[0].description, "add");
        assert_eq!(assembled.commits[0].body.as_deref(), Some("some body"));
        assert_eq!(assembled.commits[1].impact, ReleaseImpact::Major);
        assert_eq!(
            assembled.commits[1].files,
            vec!["README.md", "packages/b/index.ts"]
        );
    }

    #[test]
    fn test_real_repository_merge_exclusion() {
        let mut fx = Fixture::new();
        let first = fx.commit("chore: init", &["package.json"]);
        fx.tag("v0.1.0", &first);
        fx.commit("feat: add", &["src/index.ts"]);
        let merge = fx.merge("Merge branch 'topic'", &first);

        let assembled = HistoryFetcher::new(fx.open())
            .assemble_range(None, HEAD)
            .unwrap();
        assert_eq!(assembled.commits.len(), 2);

        let assembled = HistoryFetcher::new(fx.open())
            .with_merges(false)
            .assemble_range(None, HEAD)
            .unwrap();
        assert_eq!(assembled.commits.len(), 1);
        assert_eq!(assembled.skipped[0].input, merge);
    }

    #[test]
    fn test_real_repository_root_fallback() {
        let mut fx = Fixture::new();
        fx.commit("feat: first", &["index.ts"]);
        let fetcher = HistoryFetcher::new(fx.open());

        let assembled = fetcher.assemble_range(None, HEAD).unwrap();
        assert_eq!(assembled.commits.len(), 1);
        assert_eq!(assembled.commits[0].files, vec!["index.ts"]);
    }
}
