//! Configuration types

use serde::{Deserialize, Serialize};

use crate::manifest::DEFAULT_MANIFEST;

/// Main configuration for bumpkit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace discovery and attribution
    pub workspace: WorkspaceConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Commit history configuration
    pub commits: CommitsConfig,
}

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Manifest file name read in every package directory
    pub manifest: String,

    /// Glob patterns of files that never count towards a package
    pub ignore: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST.to_string(),
            ignore: Vec::new(),
        }
    }
}

/// Git configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Branch releases are cut from
    pub branch: String,

    /// Refuse to tag with uncommitted changes
    pub require_clean: bool,

    /// Tag format (e.g., "v{version}")
    pub tag_format: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            require_clean: true,
            tag_format: "v{version}".to_string(),
        }
    }
}

impl GitConfig {
    /// Render a tag name for `version`
    pub fn tag_name(&self, version: &str) -> String {
        self.tag_format.replace("{version}", version)
    }

    /// Render a tag name for a package release in a monorepo
    pub fn package_tag_name(&self, package: &str, version: &str) -> String {
        format!("{}@{}", package, self.tag_name(version))
    }
}

/// Commit history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitsConfig {
    /// Keep commits with more than one parent when assembling history
    pub include_merges: bool,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            include_merges: true,
        }
    }
}
