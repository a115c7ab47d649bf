//! Plan command

use clap::Args;
use console::style;
use tracing::info;

use crate::cli::context::ReleaseContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

use super::RangeArgs;

/// Show the release impact per package
#[derive(Debug, Args)]
pub struct PlanCommand {
    #[command(flatten)]
    pub range: RangeArgs,

    /// List the commits attributed to each package
    #[arg(long)]
    pub commits: bool,
}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(from = ?self.range.from, to = %self.range.to, "executing plan command");
        let context = ReleaseContext::from_cwd()?;
        let plan = context.plan(self.range.from.as_deref(), &self.range.to)?;

        match cli.format {
            OutputFormat::Json => output::json(&plan),
            OutputFormat::Text => {
                if !cli.quiet {
                    println!(
                        "{} {}",
                        output::header("Release Plan"),
                        style(plan.range.to_string()).dim()
                    );
                    println!(
                        "{}",
                        output::key_value("Commits analyzed", &plan.commits.len().to_string())
                    );
                    println!();
                }

                if plan.packages.is_empty() {
                    output::info("No package is affected by this range");
                    return Ok(());
                }

                for package in &plan.packages {
                    let impact = &package.impact;
                    let next = package.next_version.as_deref().unwrap_or("?");

                    println!(
                        "  {} {} {} {} ({})",
                        style(&impact.name).bold(),
                        style(&impact.version).dim(),
                        style("→").dim(),
                        output::version_style().apply_to(next),
                        output::impact_style(impact.impact).apply_to(impact.impact)
                    );

                    if self.commits {
                        for commit in &impact.commits {
                            println!(
                                "      {} {}",
                                style(&commit.short_hash).dim(),
                                commit.description
                            );
                        }
                    }
                }

                if !plan.skipped.is_empty() {
                    println!();
                    output::warning(&format!(
                        "{} history record(s) could not be read",
                        plan.skipped.len()
                    ));
                }

                Ok(())
            }
        }
    }
}
