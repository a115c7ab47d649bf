//! Tag listing and creation

use tracing::{debug, info, instrument};

use bumpkit_core::error::GitError;

use crate::backend::format_tag_line;
use crate::date::from_git_time;
use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Every tag that resolves to a commit, as a raw `hash<TAB>date<TAB>name` line.
    ///
    /// Annotated tags are dated by their tagger, lightweight tags by the
    /// commit they point at.
    #[instrument(skip(self))]
    pub fn tag_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            match self.tag_line(oid, &name) {
                Some(line) => lines.push(line),
                None => debug!(name, "tag does not resolve to a commit"),
            }

            true
        })?;

        debug!(count = lines.len(), "listed all tags");
        Ok(lines)
    }

    fn tag_line(&self, oid: git2::Oid, name: &str) -> Option<String> {
        let object = self.repo.find_object(oid, None).ok()?;
        let commit = object.peel_to_commit().ok()?;

        let when = object
            .as_tag()
            .and_then(|tag| tag.tagger().map(|tagger| tagger.when()))
            .unwrap_or_else(|| commit.time());
        let date = from_git_time(when)?;

        Some(format_tag_line(
            &commit.id().to_string(),
            &date.to_rfc3339(),
            name,
        ))
    }

    /// Whether a tag with this name exists
    pub fn has_tag(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Tag HEAD, annotated when a message is given. Returns the tagged hash.
    #[instrument(skip(self), fields(name, annotated = message.is_some()))]
    pub fn create_tag(&self, name: &str, message: Option<&str>) -> Result<String> {
        let failed = |e: git2::Error| GitError::TagCreationFailed {
            name: name.to_string(),
            reason: e.message().to_string(),
        };

        match self.has_tag(name) {
            Ok(true) => return Err(GitError::TagExists(name.to_string())),
            Ok(false) => {}
            Err(e) => {
                return Err(GitError::TagCreationFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            }
        }

        let head = self.head_commit().map_err(|e| GitError::TagCreationFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        match message {
            Some(msg) => {
                let sig = self.repo.signature().map_err(failed)?;
                self.repo
                    .tag(name, head.as_object(), &sig, msg, false)
                    .map_err(failed)?;
            }
            None => {
                self.repo
                    .tag_lightweight(name, head.as_object(), false)
                    .map_err(failed)?;
            }
        }

        info!(name, annotated = message.is_some(), "created tag");
        Ok(head.id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::Fixture;
    use crate::tags::parse_tags;

    #[test]
    fn test_tag_lines_parse() {
        let mut fx = Fixture::new();
        let first = fx.commit("chore: init", &["README.md"]);
        let second = fx.commit("feat: a", &["a.txt"]);
        fx.tag("v1.0.0", &first);
        fx.tag("v1.1.0", &second);
        let repo = fx.open();

        let collected = parse_tags(repo.tag_lines().unwrap());

        assert!(collected.is_clean());
        let names: Vec<_> = collected.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["v1.1.0", "v1.0.0"]);
        assert_eq!(collected.items[0].hash, second);
    }

    #[test]
    fn test_create_annotated_tag() {
        let mut fx = Fixture::new();
        let head = fx.commit("chore: init", &["README.md"]);
        fx.repo
            .config()
            .unwrap()
            .set_str("user.name", "Test")
            .unwrap();
        fx.repo
            .config()
            .unwrap()
            .set_str("user.email", "test@example.com")
            .unwrap();
        let repo = fx.open();

        let tagged = repo.create_tag("v2.0.0", Some("Release 2.0")).unwrap();
        assert_eq!(tagged, head);
        assert!(repo.has_tag("v2.0.0").unwrap());

        let collected = parse_tags(repo.tag_lines().unwrap());
        assert_eq!(collected.items[0].hash, head);
    }

    #[test]
    fn test_tag_already_exists() {
        let mut fx = Fixture::new();
        let head = fx.commit("chore: init", &["README.md"]);
        fx.tag("v1.0.0", &head);
        let repo = fx.open();

        let result = repo.create_tag("v1.0.0", None);
        assert!(matches!(result, Err(GitError::TagExists(_))));
    }

    #[test]
    fn test_tag_empty_repo() {
        let fx = Fixture::new();
        let repo = fx.open();
        match repo.create_tag("v1.0.0", None) {
            Err(GitError::TagCreationFailed { name, reason }) => {
                assert_eq!(name, "v1.0.0");
                assert!(reason.contains("No commits"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_tag_name_carries_name() {
        let mut fx = Fixture::new();
        fx.commit("chore: init", &["README.md"]);
        let repo = fx.open();

        match repo.create_tag("bad..name", None) {
            Err(GitError::TagCreationFailed { name, .. }) => assert_eq!(name, "bad..name"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
