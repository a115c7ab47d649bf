//! Members command

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use crate::cli::context::ReleaseContext;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// List workspace members
#[derive(Debug, Args)]
pub struct MembersCommand {
    /// Only list publishable members
    #[arg(long)]
    pub publishable: bool,
}

impl MembersCommand {
    /// Execute the members command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(publishable = self.publishable, "executing members command");
        let context = ReleaseContext::from_cwd()?;

        let monorepo = context.resolver.is_monorepo()?;
        let discovery = context.resolver.discovery()?;
        let members: Vec<_> = discovery
            .items
            .iter()
            .filter(|m| !self.publishable || m.publishable)
            .collect();

        match cli.format {
            OutputFormat::Json => output::json(&json!({
                "monorepo": monorepo,
                "members": members,
                "skipped": discovery.skipped,
            })),
            OutputFormat::Text => {
                if !monorepo {
                    output::info("Not a workspace: the root manifest declares no workspaces");
                    return Ok(());
                }

                if !cli.quiet {
                    println!("{}", output::header("Workspace Members"));
                    println!();
                }

                for member in &members {
                    let mut flags = Vec::new();
                    if member.private {
                        flags.push("private");
                    }
                    if member.publishable {
                        flags.push("publishable");
                    }

                    println!(
                        "  {} {} {}{}",
                        style(&member.name).bold(),
                        output::version_style().apply_to(&member.version),
                        output::path_style().apply_to(&member.relative_path),
                        if flags.is_empty() {
                            String::new()
                        } else {
                            format!(" ({})", flags.join(", "))
                        }
                    );
                }

                for skipped in &discovery.skipped {
                    output::warning(&format!("Skipped {}", skipped));
                }

                Ok(())
            }
        }
    }
}
