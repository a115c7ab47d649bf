//! Tag and version indexing
//!
//! Tag listings come in as `hash<TAB>date<TAB>name` lines. Lines that do not
//! parse are dropped and reported back as skip records.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};

use bumpkit_core::skip::Collected;

use crate::date::parse_git_date;

/// Prerelease marker reported for plain `x.y.z` versions
pub const NO_PRERELEASE: &str = "none";

/// Regex for version-like tag names
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)(?:-(?P<pre>.+))?$")
        .expect("Invalid regex")
});

/// Version encoded in a tag name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Text after the first `-`, if any
    pub prerelease: Option<String>,
}

impl TagVersion {
    /// Parse `v1.2.3` / `1.2.3-beta.1` style names
    pub fn parse(name: &str) -> Option<Self> {
        let caps = VERSION_REGEX.captures(name)?;

        Some(Self {
            major: caps.name("major")?.as_str().parse().ok()?,
            minor: caps.name("minor")?.as_str().parse().ok()?,
            patch: caps.name("patch")?.as_str().parse().ok()?,
            prerelease: caps.name("pre").map(|m| m.as_str().to_string()),
        })
    }

    /// The prerelease marker, or [`NO_PRERELEASE`]
    pub fn prerelease_label(&self) -> &str {
        self.prerelease.as_deref().unwrap_or(NO_PRERELEASE)
    }

    /// As a semver version, when the prerelease is valid semver
    pub fn to_semver(&self) -> Option<semver::Version> {
        let mut version = semver::Version::new(self.major, self.minor, self.patch);
        if let Some(pre) = &self.prerelease {
            version.pre = semver::Prerelease::new(pre).ok()?;
        }
        Some(version)
    }
}

impl std::fmt::Display for TagVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// A tag from the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemverTag {
    /// Tag name
    pub name: String,
    /// Hash the tag points at
    pub hash: String,
    /// Tag creation date
    pub date: DateTime<FixedOffset>,
    /// Parsed version, for version-like names
    pub version: Option<TagVersion>,
}

impl SemverTag {
    /// Whether the name looks like a version
    pub fn is_version_tag(&self) -> bool {
        self.version.is_some()
    }
}

/// Parse one `hash<TAB>date<TAB>name` line
pub fn parse_tag_line(line: &str) -> Result<SemverTag, String> {
    let mut fields = line.splitn(3, '\t').map(str::trim);
    let (hash, date, name) = match (fields.next(), fields.next(), fields.next()) {
        (Some(h), Some(d), Some(n)) if !h.is_empty() && !d.is_empty() && !n.is_empty() => {
            (h, d, n)
        }
        _ => return Err("expected hash, date and name separated by tabs".to_string()),
    };

    let date = parse_git_date(date).ok_or_else(|| format!("unparseable date '{}'", date))?;

    Ok(SemverTag {
        name: name.to_string(),
        hash: hash.to_string(),
        date,
        version: TagVersion::parse(name),
    })
}

/// Parse a tag listing, newest first.
///
/// Tags created at the same instant keep their listing order.
pub fn parse_tags<I, S>(lines: I) -> Collected<SemverTag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let non_empty = lines
        .into_iter()
        .filter(|l| !l.as_ref().trim().is_empty());

    let mut collected = Collected::fold(non_empty, parse_tag_line);
    collected.items.sort_by(|a, b| b.date.cmp(&a.date));
    collected
}

/// The newest version tag of a newest-first list
pub fn latest_version_tag(tags: &[SemverTag]) -> Option<&SemverTag> {
    tags.iter().find(|t| t.is_version_tag())
}
