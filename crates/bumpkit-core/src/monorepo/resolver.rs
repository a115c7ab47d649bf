//! Workspace resolution
//!
//! A [`WorkspaceResolver`] is built once per invocation and handed to every
//! step that needs workspace information. The root manifest and the member
//! list are computed on first access and reused afterwards; computing them
//! twice yields the same result, so a racing first access is harmless.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info, instrument, warn};

use crate::error::{ManifestError, Result};
use crate::manifest::{FsManifestReader, Manifest, ManifestReader};
use crate::skip::{Collected, Skipped};

use super::expand::{GlobExpander, PathExpander};
use super::member::WorkspaceMember;
use super::paths::{self, ROOT_PATH};

/// Resolves the packages of a repository
pub struct WorkspaceResolver<R = FsManifestReader, E = GlobExpander> {
    root: PathBuf,
    reader: R,
    expander: E,
    root_manifest: OnceLock<Manifest>,
    discovery: OnceLock<Collected<WorkspaceMember>>,
}

impl WorkspaceResolver {
    /// Resolver reading `package.json` files and expanding globs on disk
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_collaborators(root, FsManifestReader::new(), GlobExpander)
    }
}

impl<R: ManifestReader, E: PathExpander> WorkspaceResolver<R, E> {
    /// Resolver with explicit manifest reader and path expander
    pub fn with_collaborators(root: impl Into<PathBuf>, reader: R, expander: E) -> Self {
        Self {
            root: root.into(),
            reader,
            expander,
            root_manifest: OnceLock::new(),
            discovery: OnceLock::new(),
        }
    }

    /// Repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The root manifest; failing to read it is fatal
    pub fn root_manifest(&self) -> Result<&Manifest> {
        if let Some(manifest) = self.root_manifest.get() {
            return Ok(manifest);
        }

        let manifest = self
            .reader
            .read(&self.root)?
            .ok_or_else(|| ManifestError::RootNotFound(self.reader.manifest_path(&self.root)))?;

        Ok(self.root_manifest.get_or_init(|| manifest))
    }

    /// Whether the root manifest declares workspace patterns
    pub fn is_monorepo(&self) -> Result<bool> {
        Ok(self.root_manifest()?.has_workspaces())
    }

    /// The root package described as a member at `"."`
    pub fn root_package(&self) -> Result<WorkspaceMember> {
        let manifest = self.root_manifest()?;
        Ok(WorkspaceMember::from_manifest(&self.root, ROOT_PATH, manifest))
    }

    /// Workspace members sorted by name; empty for single-package repositories
    pub fn list_members(&self) -> Result<&[WorkspaceMember]> {
        Ok(&self.discovery()?.items)
    }

    /// Members together with the patterns and directories that were skipped
    pub fn discovery(&self) -> Result<&Collected<WorkspaceMember>> {
        if let Some(discovery) = self.discovery.get() {
            return Ok(discovery);
        }

        let discovery = self.discover()?;
        Ok(self.discovery.get_or_init(|| discovery))
    }

    /// Find a member by package name
    pub fn find_by_name(&self, name: &str) -> Result<Option<&WorkspaceMember>> {
        Ok(self.list_members()?.iter().find(|m| m.name == name))
    }

    /// Find the member a repository-relative path belongs to.
    ///
    /// An exact relative-path match wins; otherwise the most specific member
    /// containing the path is returned.
    pub fn find_by_path(&self, relative_path: &str) -> Result<Option<&WorkspaceMember>> {
        let members = self.list_members()?;
        let wanted = paths::normalize_str(relative_path);

        if let Some(exact) = members.iter().find(|m| m.relative_path == wanted) {
            return Ok(Some(exact));
        }

        Ok(paths::owner_of(members, &wanted))
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn discover(&self) -> Result<Collected<WorkspaceMember>> {
        let manifest = self.root_manifest()?;
        let mut discovery = Collected::default();

        if !manifest.has_workspaces() {
            debug!("root manifest declares no workspaces");
            return Ok(discovery);
        }

        let mut seen = HashSet::new();

        for pattern in &manifest.workspaces {
            let dirs = match self.expander.expand(pattern, &self.root) {
                Ok(dirs) => dirs,
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "skipping workspace pattern");
                    discovery.skipped.push(Skipped::new(pattern.as_str(), e.reason));
                    continue;
                }
            };

            for dir in dirs {
                let relative = paths::normalize(&dir);
                if !seen.insert(relative.clone()) {
                    continue;
                }

                let absolute = if relative == ROOT_PATH {
                    self.root.clone()
                } else {
                    self.root.join(&relative)
                };

                match self.reader.read(&absolute) {
                    Ok(Some(member_manifest)) => {
                        discovery.items.push(WorkspaceMember::from_manifest(
                            &self.root,
                            &relative,
                            &member_manifest,
                        ));
                    }
                    Ok(None) => {
                        debug!(dir = %relative, "no manifest, not a package");
                    }
                    Err(e) => {
                        warn!(dir = %relative, error = %e, "skipping unreadable package manifest");
                        discovery.skipped.push(Skipped::new(relative, e.to_string()));
                    }
                }
            }
        }

        discovery.items.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            members = discovery.items.len(),
            skipped = discovery.skipped.len(),
            "resolved workspace members"
        );
        Ok(discovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BumpkitError, ExpandError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn npm_workspace() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "package.json",
            r#"{"name": "monorepo", "private": true, "workspaces": ["packages/*"]}"#,
        );
        write(
            temp.path(),
            "packages/b/package.json",
            r#"{"name": "b", "version": "2.0.0"}"#,
        );
        write(
            temp.path(),
            "packages/a/package.json",
            r#"{"name": "a", "version": "1.0.0", "publishConfig": {"access": "public"}}"#,
        );
        temp
    }

    #[test]
    fn test_detects_monorepo() {
        let temp = npm_workspace();
        let resolver = WorkspaceResolver::new(temp.path());
        assert!(resolver.is_monorepo().unwrap());
    }

    #[test]
    fn test_single_package_has_no_members() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", r#"{"name": "solo", "version": "0.4.0"}"#);

        let resolver = WorkspaceResolver::new(temp.path());
        assert!(!resolver.is_monorepo().unwrap());
        assert!(resolver.list_members().unwrap().is_empty());

        let root = resolver.root_package().unwrap();
        assert_eq!(root.name, "solo");
        assert_eq!(root.relative_path, ".");
    }

    #[test]
    fn test_missing_root_manifest_is_fatal() {
        let temp = TempDir::new().unwrap();
        let resolver = WorkspaceResolver::new(temp.path());
        let err = resolver.is_monorepo().unwrap_err();
        assert!(matches!(
            err,
            BumpkitError::Manifest(ManifestError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_members_sorted_by_name() {
        let temp = npm_workspace();
        let resolver = WorkspaceResolver::new(temp.path());
        let members = resolver.list_members().unwrap();

        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(members[0].relative_path, "packages/a");
        assert!(members[0].publishable);
        assert!(!members[1].publishable);
    }

    #[test]
    fn test_directories_without_manifest_are_ignored() {
        let temp = npm_workspace();
        std::fs::create_dir_all(temp.path().join("packages/empty")).unwrap();

        let resolver = WorkspaceResolver::new(temp.path());
        let discovery = resolver.discovery().unwrap();
        assert_eq!(discovery.items.len(), 2);
        assert!(discovery.is_clean());
    }

    #[test]
    fn test_broken_member_manifest_is_skipped() {
        let temp = npm_workspace();
        write(temp.path(), "packages/broken/package.json", "{ nope");

        let resolver = WorkspaceResolver::new(temp.path());
        let discovery = resolver.discovery().unwrap();

        assert_eq!(discovery.items.len(), 2);
        assert_eq!(discovery.skipped.len(), 1);
        assert_eq!(discovery.skipped[0].input, "packages/broken");
    }

    #[test]
    fn test_find_by_name_and_path() {
        let temp = npm_workspace();
        let resolver = WorkspaceResolver::new(temp.path());

        assert_eq!(resolver.find_by_name("b").unwrap().unwrap().version, "2.0.0");
        assert!(resolver.find_by_name("missing").unwrap().is_none());

        let member = resolver.find_by_path("packages/a").unwrap().unwrap();
        assert_eq!(member.name, "a");
        let member = resolver.find_by_path("packages/b/src/index.ts").unwrap().unwrap();
        assert_eq!(member.name, "b");
        assert!(resolver.find_by_path("scripts/build.sh").unwrap().is_none());
    }

    #[test]
    fn test_find_by_path_is_separator_bounded() {
        let temp = npm_workspace();
        write(temp.path(), "packages/ab/package.json", r#"{"name": "ab"}"#);

        let resolver = WorkspaceResolver::new(temp.path());
        let member = resolver.find_by_path("packages/a/src/x.ts").unwrap().unwrap();
        assert_eq!(member.relative_path, "packages/a");
    }

    /// Serves manifests from memory and counts reads
    struct MemoryReader {
        manifests: HashMap<PathBuf, &'static str>,
        reads: AtomicUsize,
    }

    impl ManifestReader for MemoryReader {
        fn read(&self, dir: &Path) -> std::result::Result<Option<Manifest>, ManifestError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match self.manifests.get(dir) {
                Some(json) => Manifest::from_json(json)
                    .map(Some)
                    .map_err(|e| ManifestError::ParseFailed {
                        path: dir.to_path_buf(),
                        reason: e.to_string(),
                    }),
                None => Ok(None),
            }
        }

        fn manifest_path(&self, dir: &Path) -> PathBuf {
            dir.join("package.json")
        }
    }

    /// Fails on patterns containing `[`, otherwise returns fixed directories
    struct FixedExpander;

    impl PathExpander for FixedExpander {
        fn expand(
            &self,
            pattern: &str,
            _base: &Path,
        ) -> std::result::Result<Vec<PathBuf>, ExpandError> {
            if pattern.contains('[') {
                return Err(ExpandError {
                    pattern: pattern.to_string(),
                    reason: "unclosed bracket".to_string(),
                });
            }
            Ok(vec![PathBuf::from("libs/core"), PathBuf::from("libs/nomanifest")])
        }
    }

    #[test]
    fn test_failing_pattern_contributes_nothing() {
        let mut manifests = HashMap::new();
        manifests.insert(
            PathBuf::from("/repo"),
            r#"{"workspaces": ["libs/[", "libs/*"]}"#,
        );
        manifests.insert(PathBuf::from("/repo/libs/core"), r#"{"name": "core"}"#);

        let resolver = WorkspaceResolver::with_collaborators(
            "/repo",
            MemoryReader {
                manifests,
                reads: AtomicUsize::new(0),
            },
            FixedExpander,
        );

        let discovery = resolver.discovery().unwrap();
        assert_eq!(discovery.items.len(), 1);
        assert_eq!(discovery.items[0].name, "core");
        assert_eq!(discovery.items[0].version, "0.0.0");
        assert_eq!(discovery.skipped.len(), 1);
        assert_eq!(discovery.skipped[0].input, "libs/[");
    }

    #[test]
    fn test_results_are_memoized() {
        let mut manifests = HashMap::new();
        manifests.insert(PathBuf::from("/repo"), r#"{"workspaces": ["libs/*"]}"#);
        manifests.insert(PathBuf::from("/repo/libs/core"), r#"{"name": "core"}"#);

        let resolver = WorkspaceResolver::with_collaborators(
            "/repo",
            MemoryReader {
                manifests,
                reads: AtomicUsize::new(0),
            },
            FixedExpander,
        );

        resolver.list_members().unwrap();
        let reads_after_first = resolver.reader.reads.load(Ordering::SeqCst);
        resolver.list_members().unwrap();
        resolver.is_monorepo().unwrap();

        assert_eq!(reads_after_first, 3);
        assert_eq!(resolver.reader.reads.load(Ordering::SeqCst), 3);
    }
}
