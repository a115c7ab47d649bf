//! Package manifest reading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ManifestError;

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "package.json";

/// The manifest fields bumpkit cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// Declared version
    #[serde(default)]
    pub version: Option<String>,
    /// Workspace member patterns
    #[serde(default, deserialize_with = "deserialize_workspaces")]
    pub workspaces: Vec<String>,
    /// Publish configuration, kept opaque
    #[serde(default, rename = "publishConfig")]
    pub publish_config: Option<serde_json::Value>,
    /// Whether the package is private
    #[serde(default)]
    pub private: bool,
}

impl Manifest {
    /// Parse a manifest from JSON text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Whether the manifest declares workspace members
    pub fn has_workspaces(&self) -> bool {
        !self.workspaces.is_empty()
    }

    /// Whether the manifest carries a publish configuration
    pub fn is_publishable(&self) -> bool {
        self.publish_config
            .as_ref()
            .is_some_and(|value| !value.is_null())
    }
}

/// `workspaces` is either a list of patterns or `{ "packages": [...] }`.
fn deserialize_workspaces<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WorkspacesField {
        Array(Vec<String>),
        Object {
            #[serde(default)]
            packages: Vec<String>,
        },
    }

    let field: Option<WorkspacesField> = Option::deserialize(deserializer)?;
    Ok(match field {
        Some(WorkspacesField::Array(patterns)) => patterns,
        Some(WorkspacesField::Object { packages }) => packages,
        None => Vec::new(),
    })
}

/// Reads the manifest of a package directory.
///
/// `Ok(None)` means the directory has no manifest; that is not an error.
pub trait ManifestReader: Send + Sync {
    /// Read the manifest located in `dir`
    fn read(&self, dir: &Path) -> Result<Option<Manifest>, ManifestError>;

    /// Path of the manifest file for `dir`
    fn manifest_path(&self, dir: &Path) -> PathBuf;
}

/// Reads JSON manifests from the filesystem
#[derive(Debug, Clone)]
pub struct FsManifestReader {
    file_name: String,
}

impl FsManifestReader {
    /// Reader for `package.json`
    pub fn new() -> Self {
        Self::with_file_name(DEFAULT_MANIFEST)
    }

    /// Reader for a custom manifest file name
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Default for FsManifestReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for FsManifestReader {
    fn read(&self, dir: &Path) -> Result<Option<Manifest>, ManifestError> {
        let path = self.manifest_path(dir);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ManifestError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let manifest = Manifest::from_json(&content).map_err(|e| ManifestError::ParseFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), name = ?manifest.name, "read manifest");
        Ok(Some(manifest))
    }

    fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}
