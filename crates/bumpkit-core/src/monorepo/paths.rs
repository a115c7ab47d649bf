//! Repository-relative path helpers
//!
//! Member paths and changed-file paths are compared as `/`-separated strings
//! relative to the repository root. Matching is bounded by separators, so
//! `packages/ab/x` never belongs to `packages/a`.

use std::path::{Component, Path};

use super::member::WorkspaceMember;

/// Relative path denoting the repository root
pub const ROOT_PATH: &str = ".";

/// Normalize a relative path to `/`-separated form without `./` prefixes or
/// trailing separators. The empty path becomes `"."`.
pub fn normalize(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        ROOT_PATH.to_string()
    } else {
        parts.join("/")
    }
}

/// Normalize a path given as text, accepting either separator
pub fn normalize_str(path: &str) -> String {
    normalize(Path::new(&path.replace('\\', "/")))
}

/// Whether `path` equals `member_path` or lies underneath it
pub fn is_within(path: &str, member_path: &str) -> bool {
    if member_path == ROOT_PATH {
        return true;
    }
    path == member_path
        || (path.len() > member_path.len()
            && path.starts_with(member_path)
            && path.as_bytes()[member_path.len()] == b'/')
}

/// Whether a root member claims `path`: top-level files and anything under a
/// dot-directory such as `.github/`.
pub fn root_claims(path: &str) -> bool {
    !path.contains('/') || path.starts_with('.')
}

/// Find the member that owns `path`.
///
/// Non-root members match by separator-bounded prefix and the most specific
/// (longest) member path wins. A root member only owns what
/// [`root_claims`] accepts and nothing another member already owns, unless it
/// is the only package, in which case it owns every file.
pub fn owner_of<'a>(members: &'a [WorkspaceMember], path: &str) -> Option<&'a WorkspaceMember> {
    let path = normalize_str(path);

    if members.iter().all(WorkspaceMember::is_root) {
        return members.first();
    }

    let nested = members
        .iter()
        .filter(|m| !m.is_root() && is_within(&path, &m.relative_path))
        .max_by_key(|m| m.relative_path.len());

    nested.or_else(|| {
        members
            .iter()
            .find(|m| m.is_root() && root_claims(&path))
    })
}
