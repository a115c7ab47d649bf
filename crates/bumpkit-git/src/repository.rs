//! Git repository handle

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{info, instrument};

use bumpkit_core::error::GitError;

use crate::backend::{GitBackend, RevRange};

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at the given path
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| open_error(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            repo,
        })
    }

    /// Discover and open a repository by searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        info!(start_path = %start_path.display(), "discovering git repository");
        let repo = Repository::discover(start_path).map_err(|e| open_error(start_path, e))?;

        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    /// The working directory, or the git directory of a bare repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the repository is bare
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Get the HEAD commit
    pub fn head_commit(&self) -> Result<git2::Commit<'_>> {
        if self.repo.is_empty()? {
            return Err(GitError::NoCommits);
        }
        let head = self.repo.head()?;
        head.peel_to_commit().map_err(GitError::Git2)
    }

    /// Resolve a revision (hash, tag, branch, `HEAD`) to the commit it names
    pub(crate) fn resolve_commit(&self, rev: &str) -> std::result::Result<git2::Commit<'_>, git2::Error> {
        self.repo.revparse_single(rev)?.peel_to_commit()
    }
}

fn open_error(path: &Path, e: git2::Error) -> GitError {
    if e.code() == git2::ErrorCode::NotFound {
        GitError::NotARepository(path.to_path_buf())
    } else {
        GitError::OpenFailed(e.to_string())
    }
}

impl GitBackend for GitRepo {
    fn list_tags_raw(&self) -> Result<Vec<String>> {
        self.tag_lines()
    }

    fn log_raw(&self, range: &RevRange) -> Result<Vec<String>> {
        self.log_records(range)
    }

    fn changed_files(&self, hash: &str) -> Result<Vec<String>> {
        GitRepo::changed_files(self, hash)
    }

    fn is_merge(&self, hash: &str) -> Result<bool> {
        Ok(self.parent_count(hash)? > 1)
    }

    fn root_commit_hash(&self, rev: &str) -> Result<String> {
        self.root_commit(rev)
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(!self.is_clean()?)
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()> {
        GitRepo::create_tag(self, name, message).map(|_| ())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        GitRepo::current_branch(self)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_repo() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(!repo.is_bare());
    }

    #[test]
    fn test_discover_repo() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let subdir = temp.path().join("sub").join("dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let repo = GitRepo::discover(&subdir).unwrap();
        // Canonicalize both paths to handle macOS /var -> /private/var symlink
        let repo_path = repo.path().canonicalize().unwrap();
        let temp_path = temp.path().canonicalize().unwrap();
        assert_eq!(repo_path, temp_path);
    }

    #[test]
    fn test_not_a_repo() {
        let temp = TempDir::new().unwrap();
        let result = GitRepo::open(temp.path());
        assert!(matches!(result, Err(GitError::NotARepository(_))));
    }

    #[test]
    fn test_empty_repo_has_no_head_commit() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(matches!(repo.head_commit(), Err(GitError::NoCommits)));
    }
}
