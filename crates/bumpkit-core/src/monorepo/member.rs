//! Workspace members

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;

use super::paths::ROOT_PATH;

/// Version assumed when a manifest declares none
pub const DEFAULT_VERSION: &str = "0.0.0";

/// One package of the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    /// Package name
    pub name: String,
    /// Absolute path to the package directory
    pub path: PathBuf,
    /// Path relative to the repository root, `/`-separated; unique per member
    pub relative_path: String,
    /// Declared version
    pub version: String,
    /// Whether the manifest carries a publish configuration
    pub publishable: bool,
    /// Whether the package is private
    pub private: bool,
}

impl WorkspaceMember {
    /// Build a member from a manifest found at `root/relative_path`
    pub fn from_manifest(root: &Path, relative_path: &str, manifest: &Manifest) -> Self {
        let path = if relative_path == ROOT_PATH {
            root.to_path_buf()
        } else {
            root.join(relative_path)
        };

        let name = manifest
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| basename(&path));

        Self {
            name,
            path,
            relative_path: relative_path.to_string(),
            version: manifest
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            publishable: manifest.is_publishable(),
            private: manifest.private,
        }
    }

    /// Whether this member sits at the repository root
    pub fn is_root(&self) -> bool {
        self.relative_path == ROOT_PATH
    }

    /// The declared version as semver, if it parses
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
