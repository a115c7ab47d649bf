//! Shared command context
//!
//! Every command works on the same pieces: the configuration, the workspace
//! resolver and the history fetcher for the enclosing repository.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use bumpkit_core::config::{load_config_or_default, Config};
use bumpkit_core::manifest::FsManifestReader;
use bumpkit_core::monorepo::{
    aggregate_with, AttributionFilter, GlobExpander, PackageImpact, WorkspaceMember,
    WorkspaceResolver,
};
use bumpkit_core::skip::Skipped;
use bumpkit_core::types::{CommitRecord, ReleaseImpact};
use bumpkit_git::{GitRepo, HistoryFetcher, RevRange};

/// Configuration, workspace and history of one repository
pub struct ReleaseContext {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub resolver: WorkspaceResolver<FsManifestReader, GlobExpander>,
    pub history: HistoryFetcher<GitRepo>,
}

impl ReleaseContext {
    /// Load the context for the repository containing `dir`
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let (config, config_path) =
            load_config_or_default(dir).context("Failed to load configuration")?;

        let repo = GitRepo::discover(dir).context("Failed to open git repository")?;
        let root = repo.path().to_path_buf();
        debug!(root = %root.display(), config = ?config_path, "loaded release context");

        let resolver = WorkspaceResolver::with_collaborators(
            root,
            FsManifestReader::with_file_name(config.workspace.manifest.clone()),
            GlobExpander,
        );
        let history = HistoryFetcher::new(repo).with_merges(config.commits.include_merges);

        Ok(Self {
            config,
            config_path,
            resolver,
            history,
        })
    }

    /// Load the context for the current directory
    pub fn from_cwd() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }

    /// The packages releases are planned for: the workspace members of a
    /// monorepo, or the root package otherwise
    pub fn packages(&self) -> anyhow::Result<Vec<WorkspaceMember>> {
        let monorepo = self
            .resolver
            .is_monorepo()
            .context("Failed to read the root manifest")?;

        if monorepo {
            Ok(self.resolver.list_members()?.to_vec())
        } else {
            Ok(vec![self.resolver.root_package()?])
        }
    }

    /// Files excluded from attribution by configuration
    pub fn attribution_filter(&self) -> AttributionFilter {
        AttributionFilter::new(&self.config.workspace.ignore)
    }

    /// Assemble the range and work out the impact per package
    pub fn plan(&self, from: Option<&str>, to: &str) -> anyhow::Result<ReleasePlan> {
        let assembled = self
            .history
            .assemble_range(from, to)
            .with_context(|| format!("Failed to read history up to {}", to))?;
        let packages = self.packages()?;

        let impacts = aggregate_with(&assembled.commits, &packages, &self.attribution_filter());
        let overall = assembled.commits.iter().map(|c| c.impact).max();

        info!(
            range = %assembled.range,
            commits = assembled.commits.len(),
            packages = impacts.len(),
            "release plan ready"
        );

        Ok(ReleasePlan {
            range: assembled.range,
            packages: impacts.into_iter().map(PlannedPackage::from).collect(),
            overall,
            commits: assembled.commits,
            skipped: assembled.skipped,
        })
    }
}

/// Release recommendation for a range of history
#[derive(Debug, Serialize)]
pub struct ReleasePlan {
    pub range: RevRange,
    /// Highest impact of any commit in the range
    pub overall: Option<ReleaseImpact>,
    pub packages: Vec<PlannedPackage>,
    #[serde(skip)]
    pub commits: Vec<CommitRecord>,
    pub skipped: Vec<Skipped>,
}

impl ReleasePlan {
    /// The plan entry for a package
    pub fn package(&self, name: &str) -> Option<&PlannedPackage> {
        self.packages.iter().find(|p| p.impact.name == name)
    }
}

/// One affected package with its next version
#[derive(Debug, Serialize)]
pub struct PlannedPackage {
    #[serde(flatten)]
    pub impact: PackageImpact,
    /// `None` when the current version is not valid semver
    pub next_version: Option<String>,
}

impl From<PackageImpact> for PlannedPackage {
    fn from(impact: PackageImpact) -> Self {
        let next_version = impact.next_version().map(|v| v.to_string());
        Self {
            impact,
            next_version,
        }
    }
}
