//! Core types for bumpkit

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Semantic-versioning impact of a change.
///
/// Variants are declared in severity order so the derived `Ord` gives
/// `Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseImpact {
    /// Bug fixes and everything without a more specific meaning
    #[default]
    Patch,
    /// New features
    Minor,
    /// Breaking changes
    Major,
}

impl ReleaseImpact {
    /// Returns the string representation of the impact
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }

    /// Apply this impact to a version, producing the next release version.
    ///
    /// Pre-release and build metadata are dropped.
    pub fn apply(&self, current: &semver::Version) -> semver::Version {
        match self {
            Self::Major => semver::Version::new(current.major + 1, 0, 0),
            Self::Minor => semver::Version::new(current.major, current.minor + 1, 0),
            Self::Patch => semver::Version::new(current.major, current.minor, current.patch + 1),
        }
    }
}

impl std::fmt::Display for ReleaseImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseImpact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown release impact: {}", s)),
        }
    }
}

/// Author of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
    /// Author timestamp, with the author's offset
    pub date: DateTime<FixedOffset>,
}

/// A fully assembled commit: raw data, its conventional-commit reading and
/// the files it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full hash
    pub hash: String,
    /// Abbreviated hash
    pub short_hash: String,
    /// Raw message (subject, blank line, body)
    pub message: String,
    /// Parsed type, `"unknown"` when the header is not conventional
    pub commit_type: String,
    /// Parsed scope
    pub scope: Option<String>,
    /// Header description
    pub description: String,
    /// Extended body
    pub body: Option<String>,
    /// Text of the breaking-change note
    pub breaking_note: Option<String>,
    /// Whether a breaking-change note was found
    pub is_breaking: bool,
    /// Derived release impact
    pub impact: ReleaseImpact,
    /// Author
    pub author: CommitAuthor,
    /// Changed files, repository-relative
    pub files: Vec<String>,
}
