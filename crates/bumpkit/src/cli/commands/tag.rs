//! Tag command

use anyhow::{bail, Context};
use clap::Args;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use bumpkit_core::types::ReleaseImpact;
use bumpkit_git::{GitBackend, HEAD};

use crate::cli::context::{ReleaseContext, ReleasePlan};
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Create the next release tag
#[derive(Debug, Args)]
pub struct TagCommand {
    /// Tag a single workspace package
    #[arg(short, long)]
    pub package: Option<String>,

    /// Create an annotated tag with this message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Show the tag without creating it
    #[arg(long)]
    pub dry_run: bool,
}

/// The tag a release would create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTag {
    pub name: String,
    pub version: String,
    pub impact: ReleaseImpact,
    pub package: Option<String>,
}

impl TagCommand {
    /// Execute the tag command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(package = ?self.package, dry_run = self.dry_run, "executing tag command");
        let context = ReleaseContext::from_cwd()?;

        let Some((tag, warnings)) = self.run(&context)? else {
            match cli.format {
                OutputFormat::Json => output::json(&json!({ "tag": null }))?,
                OutputFormat::Text => output::info("Nothing to release since the last version tag"),
            }
            return Ok(());
        };

        if cli.format == OutputFormat::Text && !cli.quiet {
            for warning in &warnings {
                output::warning(warning);
            }
        }

        match cli.format {
            OutputFormat::Json => output::json(&json!({
                "tag": tag,
                "created": !self.dry_run,
                "warnings": warnings,
            })),
            OutputFormat::Text => {
                let name = output::tag_style().apply_to(&tag.name);
                if self.dry_run {
                    output::info(&format!("Would create {} ({} release)", name, tag.impact));
                } else if cli.quiet {
                    println!("{}", tag.name);
                } else {
                    output::success(&format!("Created {} ({} release)", name, tag.impact));
                }
                Ok(())
            }
        }
    }

    /// Plan the release and, unless this is a dry run, check the repository
    /// and create the tag. Returns the tag with any repository warnings, or
    /// `None` when nothing changed.
    pub fn run(&self, context: &ReleaseContext) -> anyhow::Result<Option<(PlannedTag, Vec<String>)>> {
        let plan = context.plan(None, HEAD)?;
        let Some(tag) = self.prepare(context, &plan)? else {
            return Ok(None);
        };

        let warnings = self.check_repository(context)?;
        if !self.dry_run {
            context
                .history
                .backend()
                .create_tag(&tag.name, self.message.as_deref())
                .with_context(|| format!("Failed to create tag {}", tag.name))?;
        }

        Ok(Some((tag, warnings)))
    }

    /// Work out the tag for the planned release; `None` when nothing changed
    pub fn prepare(
        &self,
        context: &ReleaseContext,
        plan: &ReleasePlan,
    ) -> anyhow::Result<Option<PlannedTag>> {
        let git = &context.config.git;

        if let Some(name) = &self.package {
            let Some(planned) = plan.package(name) else {
                if !context.packages()?.iter().any(|p| &p.name == name) {
                    bail!("Unknown package: {}", name);
                }
                return Ok(None);
            };

            let Some(version) = planned.next_version.clone() else {
                bail!(
                    "Package {} has a version that is not valid semver: {}",
                    name,
                    planned.impact.version
                );
            };

            let tag_name = if context.resolver.is_monorepo()? {
                git.package_tag_name(name, &version)
            } else {
                git.tag_name(&version)
            };

            return Ok(Some(PlannedTag {
                name: tag_name,
                version,
                impact: planned.impact.impact,
                package: Some(name.clone()),
            }));
        }

        let Some(impact) = plan.overall else {
            return Ok(None);
        };

        let current = match context
            .history
            .latest_version_tag()?
            .and_then(|t| t.version)
            .and_then(|v| v.to_semver())
        {
            Some(version) => version,
            None => context
                .resolver
                .root_package()
                .ok()
                .and_then(|root| root.semver())
                .unwrap_or_else(|| semver::Version::new(0, 0, 0)),
        };

        let version = impact.apply(&current).to_string();
        Ok(Some(PlannedTag {
            name: git.tag_name(&version),
            version,
            impact,
            package: None,
        }))
    }

    /// Refuse dirty trees when configured, except on a dry run, and collect
    /// warnings for tagging off the release branch
    fn check_repository(&self, context: &ReleaseContext) -> anyhow::Result<Vec<String>> {
        let backend = context.history.backend();
        let git = &context.config.git;
        let mut warnings = Vec::new();

        if git.require_clean && backend.has_uncommitted_changes()? {
            if !self.dry_run {
                bail!("Working directory has uncommitted changes (git.require_clean is set)");
            }
            warnings.push("Working directory has uncommitted changes".to_string());
        }

        match backend.current_branch()? {
            Some(branch) if branch != git.branch => {
                warn!(branch = %branch, release_branch = %git.branch, "tagging outside the release branch");
                warnings.push(format!(
                    "On branch {}, releases are usually cut from {}",
                    branch, git.branch
                ));
            }
            None => {
                warn!("tagging a detached HEAD");
                warnings.push("HEAD is detached".to_string());
            }
            _ => {}
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::tests::workspace_repo;
    use git2::Repository;

    fn command(package: Option<&str>) -> TagCommand {
        TagCommand {
            package: package.map(str::to_string),
            message: None,
            dry_run: true,
        }
    }

    fn creating(package: Option<&str>) -> TagCommand {
        TagCommand {
            dry_run: false,
            ..command(package)
        }
    }

    fn current_branch(temp: &tempfile::TempDir) -> String {
        let repo = Repository::open(temp.path()).unwrap();
        let head = repo.head().unwrap();
        head.shorthand().unwrap().to_string()
    }

    #[test]
    fn test_package_tag() {
        let temp = workspace_repo();
        let context = ReleaseContext::load(temp.path()).unwrap();
        let plan = context.plan(None, HEAD).unwrap();

        let tag = command(Some("b")).prepare(&context, &plan).unwrap().unwrap();

        assert_eq!(tag.name, "b@v3.0.0");
        assert_eq!(tag.impact, ReleaseImpact::Major);
    }

    #[test]
    fn test_repository_tag_builds_on_latest_version_tag() {
        let temp = workspace_repo();
        let context = ReleaseContext::load(temp.path()).unwrap();
        let plan = context.plan(None, HEAD).unwrap();

        let tag = command(None).prepare(&context, &plan).unwrap().unwrap();

        assert_eq!(tag.name, "v2.0.0");
        assert_eq!(tag.package, None);
    }

    #[test]
    fn test_unknown_package() {
        let temp = workspace_repo();
        let context = ReleaseContext::load(temp.path()).unwrap();
        let plan = context.plan(None, HEAD).unwrap();

        assert!(command(Some("nope")).prepare(&context, &plan).is_err());
    }

    #[test]
    fn test_nothing_to_release() {
        let temp = workspace_repo();
        let context = ReleaseContext::load(temp.path()).unwrap();
        let plan = context.plan(Some(HEAD), HEAD).unwrap();

        // the single HEAD commit only touches package b
        assert!(command(Some("a")).prepare(&context, &plan).unwrap().is_none());
    }

    #[test]
    fn test_dirty_tree_refuses_to_tag() {
        let temp = workspace_repo();
        std::fs::write(temp.path().join("scratch.txt"), "wip").unwrap();
        let context = ReleaseContext::load(temp.path()).unwrap();

        let err = creating(Some("b")).run(&context).unwrap_err();
        assert!(err.to_string().contains("uncommitted changes"));

        let repo = Repository::open(temp.path()).unwrap();
        assert!(repo.find_reference("refs/tags/b@v3.0.0").is_err());
    }

    #[test]
    fn test_dry_run_on_dirty_tree_only_warns() {
        let temp = workspace_repo();
        std::fs::write(temp.path().join("scratch.txt"), "wip").unwrap();
        let context = ReleaseContext::load(temp.path()).unwrap();

        let (tag, warnings) = command(Some("b")).run(&context).unwrap().unwrap();

        assert_eq!(tag.name, "b@v3.0.0");
        assert!(warnings.iter().any(|w| w.contains("uncommitted changes")));
    }

    #[test]
    fn test_dirty_tree_allowed_without_require_clean() {
        let temp = workspace_repo();
        std::fs::write(temp.path().join("scratch.txt"), "wip").unwrap();
        let mut context = ReleaseContext::load(temp.path()).unwrap();
        context.config.git.require_clean = false;
        context.config.git.branch = current_branch(&temp);

        let (tag, warnings) = creating(Some("a")).run(&context).unwrap().unwrap();

        assert_eq!(tag.name, "a@v1.1.0");
        assert!(warnings.is_empty());
        let repo = Repository::open(temp.path()).unwrap();
        assert!(repo.find_reference("refs/tags/a@v1.1.0").is_ok());
    }

    #[test]
    fn test_creates_tag_and_warns_off_release_branch() {
        let temp = workspace_repo();
        let mut context = ReleaseContext::load(temp.path()).unwrap();
        context.config.git.branch = "release".to_string();

        let (tag, warnings) = creating(None).run(&context).unwrap().unwrap();

        assert_eq!(tag.name, "v2.0.0");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("release"));
        let repo = Repository::open(temp.path()).unwrap();
        assert!(repo.find_reference("refs/tags/v2.0.0").is_ok());
    }

    #[test]
    fn test_detached_head_warns() {
        let temp = workspace_repo();
        {
            let repo = Repository::open(temp.path()).unwrap();
            let head = repo.head().unwrap().peel_to_commit().unwrap();
            repo.set_head_detached(head.id()).unwrap();
        }
        let context = ReleaseContext::load(temp.path()).unwrap();

        let (_, warnings) = command(None).run(&context).unwrap().unwrap();
        assert_eq!(warnings, vec!["HEAD is detached".to_string()]);
    }
}
