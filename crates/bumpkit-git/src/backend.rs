//! Version-control backend abstraction
//!
//! History assembly depends on the [`GitBackend`] trait rather than on git2
//! directly, so it can run against a real repository ([`GitRepo`]) or an
//! in-memory one ([`MockBackend`]).
//!
//! [`GitRepo`]: crate::GitRepo
//! [`MockBackend`]: crate::MockBackend

use serde::{Deserialize, Serialize};

use crate::repository::Result;

/// Separator between fields of a raw log record
pub const LOG_FIELD_SEPARATOR: char = '|';

/// Escapes a separator or itself inside the leading log record fields
pub const LOG_FIELD_ESCAPE: char = '\\';

/// Separator between fields of a raw tag line
pub const TAG_FIELD_SEPARATOR: &str = "\t";

/// A span of history to walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevRange {
    /// Commits reachable from `to` but not from `from`
    Between { from: String, to: String },
    /// Like `Between`, but `from` itself is included
    Through { from: String, to: String },
    /// Exactly one commit
    Single { rev: String },
}

impl RevRange {
    /// The revision the range ends at
    pub fn end(&self) -> &str {
        match self {
            Self::Between { to, .. } | Self::Through { to, .. } => to,
            Self::Single { rev } => rev,
        }
    }
}

impl std::fmt::Display for RevRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Between { from, to } => write!(f, "{}..{}", from, to),
            Self::Through { from, to } => write!(f, "{}^..{}", from, to),
            Self::Single { rev } => write!(f, "{}^!", rev),
        }
    }
}

/// Version-control operations needed for release analysis
pub trait GitBackend {
    /// Every tag as `hash<TAB>date<TAB>name`, in no particular order
    fn list_tags_raw(&self) -> Result<Vec<String>>;

    /// One record per commit in `range`, oldest first, formatted with
    /// [`format_log_record`]
    fn log_raw(&self, range: &RevRange) -> Result<Vec<String>>;

    /// Repository-relative paths changed by a commit
    fn changed_files(&self, hash: &str) -> Result<Vec<String>>;

    /// Whether a commit has more than one parent
    fn is_merge(&self, hash: &str) -> Result<bool>;

    /// The root commit of the history leading to `rev`
    fn root_commit_hash(&self, rev: &str) -> Result<String>;

    /// Whether the working tree or index has changes
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Tag HEAD; annotated when a message is given
    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()>;

    /// The checked-out branch, `None` when HEAD is detached or unborn
    fn current_branch(&self) -> Result<Option<String>>;
}

/// Format one raw log record as
/// `hash|short|author name|author email|author date|subject|body`.
///
/// Separators and backslashes inside the first six fields are escaped with a
/// backslash.
/// The body is the last field and is written verbatim.
pub fn format_log_record(
    hash: &str,
    short_hash: &str,
    author_name: &str,
    author_email: &str,
    date: &str,
    subject: &str,
    body: &str,
) -> String {
    let mut record = String::new();
    for field in [hash, short_hash, author_name, author_email, date, subject] {
        for c in field.chars() {
            if c == LOG_FIELD_SEPARATOR || c == LOG_FIELD_ESCAPE {
                record.push(LOG_FIELD_ESCAPE);
            }
            record.push(c);
        }
        record.push(LOG_FIELD_SEPARATOR);
    }
    record.push_str(body);
    record
}

/// Split a raw log record into at most `limit` fields, undoing the escaping
/// of [`format_log_record`]. The last field is taken verbatim.
pub fn split_log_record(record: &str, limit: usize) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = record.char_indices();

    while let Some((at, c)) = chars.next() {
        if fields.len() + 1 == limit {
            current.push_str(&record[at..]);
            break;
        }
        match c {
            LOG_FIELD_ESCAPE => match chars.next() {
                Some((_, escaped)) => current.push(escaped),
                None => current.push(LOG_FIELD_ESCAPE),
            },
            LOG_FIELD_SEPARATOR => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Format one raw tag line
pub fn format_tag_line(hash: &str, date: &str, name: &str) -> String {
    [hash, date, name].join(TAG_FIELD_SEPARATOR)
}
