//! Workspace pattern expansion

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::{debug, warn};

use crate::error::ExpandError;

/// Expands a workspace pattern into candidate package directories
pub trait PathExpander: Send + Sync {
    /// Expand `pattern` relative to `base`, returning directories relative to `base`
    fn expand(&self, pattern: &str, base: &Path) -> Result<Vec<PathBuf>, ExpandError>;
}

/// Filesystem expansion using shell-style globs
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobExpander;

impl PathExpander for GlobExpander {
    fn expand(&self, pattern: &str, base: &Path) -> Result<Vec<PathBuf>, ExpandError> {
        let trimmed = pattern.trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            return Ok(vec![PathBuf::from(".")]);
        }

        let full_pattern = format!(
            "{}/{}",
            Pattern::escape(&base.to_string_lossy()),
            trimmed.trim_start_matches("./")
        );

        let entries = glob(&full_pattern).map_err(|e| ExpandError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(pattern, error = %e, "skipping unreadable glob entry");
                    continue;
                }
            };

            if !path.is_dir() {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(base) {
                dirs.push(relative.to_path_buf());
            }
        }

        dirs.sort();
        debug!(pattern, count = dirs.len(), "expanded workspace pattern");
        Ok(dirs)
    }
}
