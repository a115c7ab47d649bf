//! Working tree status

use bumpkit_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Check if the working directory is clean (no uncommitted changes)
    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.modified_files()?.is_empty())
    }

    /// Paths with staged, unstaged or untracked changes
    pub fn modified_files(&self) -> Result<Vec<String>> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let files = statuses
            .iter()
            .filter(|entry| {
                let status = entry.status();
                status.is_index_new()
                    || status.is_index_modified()
                    || status.is_index_deleted()
                    || status.is_index_renamed()
                    || status.is_index_typechange()
                    || status.is_wt_new()
                    || status.is_wt_modified()
                    || status.is_wt_deleted()
                    || status.is_wt_renamed()
                    || status.is_wt_typechange()
            })
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect();

        Ok(files)
    }

    /// Get the current branch name; `None` for a detached or unborn HEAD
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::BranchLookupFailed(e.message().to_string())),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::fixtures::Fixture;

    #[test]
    fn test_is_clean() {
        let mut fx = Fixture::new();
        fx.commit("chore: init", &["file.txt"]);
        assert!(fx.open().is_clean().unwrap());
    }

    #[test]
    fn test_is_dirty() {
        let mut fx = Fixture::new();
        fx.commit("chore: init", &["file.txt"]);
        std::fs::write(fx.temp.path().join("new_file.txt"), "new").unwrap();

        let repo = fx.open();
        assert!(!repo.is_clean().unwrap());
        assert_eq!(repo.modified_files().unwrap(), vec!["new_file.txt"]);
    }

    #[test]
    fn test_current_branch() {
        let mut fx = Fixture::new();
        fx.commit("chore: init", &["file.txt"]);
        let repo = fx.open();

        // Git might default to 'master' or 'main' depending on config
        let branch = repo.current_branch().unwrap().unwrap();
        assert!(branch == "master" || branch == "main");

        let head = repo.head_commit().unwrap();
        repo.repo.set_head_detached(head.id()).unwrap();
        assert_eq!(repo.current_branch().unwrap(), None);
    }

    #[test]
    fn test_unborn_branch() {
        let fx = Fixture::new();
        assert_eq!(fx.open().current_branch().unwrap(), None);
    }
}
