//! Status command

use clap::Args;
use console::style;
use serde_json::json;
use tracing::{info, warn};

use bumpkit_git::{GitBackend, HEAD};

use crate::cli::context::ReleaseContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Show repository and release readiness status
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing status command");
        let context = ReleaseContext::from_cwd()?;
        let backend = context.history.backend();
        let git = &context.config.git;

        let dirty = backend.has_uncommitted_changes()?;
        let current_branch = backend.current_branch()?;
        let latest_tag = context.history.latest_version_tag()?;
        let monorepo = context.resolver.is_monorepo().unwrap_or(false);
        let packages = context.packages().unwrap_or_default();

        let commits_since = match context.history.assemble_range(None, HEAD) {
            Ok(assembled) => assembled.commits.len(),
            Err(e) => {
                warn!(error = %e, "could not count commits since the last version tag");
                0
            }
        };

        let mut issues = Vec::new();
        if dirty {
            issues.push("Working directory has uncommitted changes".to_string());
        }
        match &current_branch {
            Some(branch) if branch != &git.branch => {
                issues.push(format!("Not on release branch ({})", git.branch));
            }
            None => issues.push("HEAD is detached or has no commits".to_string()),
            _ => {}
        }

        match cli.format {
            OutputFormat::Json => output::json(&json!({
                "config_found": context.config_path.is_some(),
                "config_path": context.config_path.as_ref().map(|p| p.to_string_lossy().to_string()),
                "git": {
                    "clean": !dirty,
                    "branch": current_branch,
                    "release_branch": git.branch,
                    "latest_tag": latest_tag.as_ref().map(|t| &t.name),
                    "current_version": latest_tag.as_ref().and_then(|t| t.version.as_ref()).map(|v| v.to_string()),
                    "commits_since_tag": commits_since,
                },
                "monorepo": monorepo,
                "packages": packages.iter().map(|p| json!({
                    "name": p.name,
                    "version": p.version,
                    "path": p.relative_path,
                })).collect::<Vec<_>>(),
                "issues": issues,
            })),
            OutputFormat::Text => {
                println!("{}", output::header("bumpkit Status"));
                println!();

                // Configuration
                println!("{}", style("Configuration").underlined());
                match &context.config_path {
                    Some(path) => println!("  Config file: {}", output::path_style().apply_to(path.display())),
                    None => println!(
                        "  Config file: {} (using defaults)",
                        style("not found").yellow()
                    ),
                }
                println!("  Tag format:  {}", git.tag_format);
                println!();

                // Git status
                println!("{}", style("Git").underlined());
                if let Some(branch) = &current_branch {
                    let branch_status = if branch == &git.branch {
                        style(branch).green()
                    } else {
                        style(branch).yellow()
                    };
                    println!("  Branch:      {}", branch_status);
                }

                let clean_status = if dirty {
                    style("dirty").red()
                } else {
                    style("clean").green()
                };
                println!("  Status:      {}", clean_status);

                match &latest_tag {
                    Some(tag) => println!("  Latest tag:  {}", output::tag_style().apply_to(&tag.name)),
                    None => println!("  Latest tag:  {}", style("none").dim()),
                }
                println!("  Commits since: {}", commits_since);
                println!();

                // Packages
                if !packages.is_empty() {
                    let title = if monorepo { "Workspace" } else { "Package" };
                    println!("{}", style(title).underlined());
                    for pkg in &packages {
                        println!(
                            "  {} {}",
                            style(&pkg.name).cyan(),
                            output::version_style().apply_to(&pkg.version)
                        );
                    }
                    println!();
                }

                // Readiness
                println!("{}", style("Release Readiness").underlined());
                if issues.is_empty() {
                    println!("  {}", style("✓ Ready to release").green().bold());
                } else {
                    for issue in &issues {
                        println!("  {} {}", style("✗").red(), issue);
                    }
                }

                Ok(())
            }
        }
    }
}
