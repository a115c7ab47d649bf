//! Commits command

use clap::Args;
use console::style;
use tracing::info;

use crate::cli::context::ReleaseContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

use super::RangeArgs;

/// List classified commits of a range
#[derive(Debug, Args)]
pub struct CommitsCommand {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Show changed files under each commit
    #[arg(long)]
    pub files: bool,
}

impl CommitsCommand {
    /// Execute the commits command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(from = ?self.range.from, to = %self.range.to, "executing commits command");
        let context = ReleaseContext::from_cwd()?;

        let assembled = context
            .history
            .assemble_range(self.range.from.as_deref(), &self.range.to)?;

        match cli.format {
            OutputFormat::Json => output::json(&assembled),
            OutputFormat::Text => {
                if !cli.quiet {
                    println!(
                        "{} {}",
                        output::header("Commits"),
                        style(assembled.range.to_string()).dim()
                    );
                    println!();
                }

                if assembled.commits.is_empty() {
                    output::info("No commits in range");
                }

                for commit in &assembled.commits {
                    let kind = match &commit.scope {
                        Some(scope) => format!("{}({})", commit.commit_type, scope),
                        None => commit.commit_type.clone(),
                    };

                    println!(
                        "  {} {} {} {}",
                        style(&commit.short_hash).dim(),
                        output::impact_style(commit.impact).apply_to(commit.impact),
                        style(kind).cyan(),
                        commit.description
                    );

                    if let Some(note) = &commit.breaking_note {
                        println!("      {} {}", style("BREAKING:").red().bold(), note);
                    }

                    if self.files {
                        for file in &commit.files {
                            println!("      {}", output::path_style().apply_to(file));
                        }
                    }
                }

                for skipped in &assembled.skipped {
                    output::warning(&format!("Skipped record: {}", skipped.reason));
                }

                Ok(())
            }
        }
    }
}
