//! Tags command

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use crate::cli::context::ReleaseContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// List tags, newest first
#[derive(Debug, Args)]
pub struct TagsCommand {
    /// Only list version tags
    #[arg(long)]
    pub versions: bool,

    /// Show at most this many tags
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl TagsCommand {
    /// Execute the tags command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(versions = self.versions, limit = ?self.limit, "executing tags command");
        let context = ReleaseContext::from_cwd()?;

        let collected = context.history.tags()?;
        let tags: Vec<_> = collected
            .items
            .iter()
            .filter(|t| !self.versions || t.is_version_tag())
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        match cli.format {
            OutputFormat::Json => output::json(&json!({
                "tags": tags.iter().map(|t| json!({
                    "name": t.name,
                    "hash": t.hash,
                    "date": t.date.to_rfc3339(),
                    "version": t.version.as_ref().map(|v| v.to_string()),
                    "prerelease": t.version.as_ref().map(|v| v.prerelease_label()),
                })).collect::<Vec<_>>(),
                "skipped": collected.skipped,
            })),
            OutputFormat::Text => {
                if tags.is_empty() {
                    output::info("No tags found");
                    return Ok(());
                }

                for tag in &tags {
                    let short: String = tag.hash.chars().take(7).collect();
                    let kind = match &tag.version {
                        Some(v) if v.prerelease.is_some() => {
                            style(format!("prerelease {}", v.prerelease_label())).dim()
                        }
                        Some(_) => style("release".to_string()).dim(),
                        None => style("other".to_string()).dim(),
                    };

                    println!(
                        "  {} {} {} {}",
                        output::tag_style().apply_to(&tag.name),
                        style(short).dim(),
                        tag.date.format("%Y-%m-%d"),
                        kind
                    );
                }

                if !cli.quiet {
                    for skipped in &collected.skipped {
                        output::warning(&format!("Unreadable tag line: {}", skipped));
                    }
                }

                Ok(())
            }
        }
    }
}
