//! CLI definition and command handling

pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{
    CommitsCommand, InitCommand, MembersCommand, PlanCommand, StatusCommand, TagCommand,
    TagsCommand,
};

/// bumpkit - release impact analysis for packages and workspaces
#[derive(Debug, Parser)]
#[command(name = "bumpkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init(InitCommand),

    /// Show repository and release readiness status
    Status(StatusCommand),

    /// List workspace members
    Members(MembersCommand),

    /// List tags, newest first
    Tags(TagsCommand),

    /// List classified commits of a range
    Commits(CommitsCommand),

    /// Show the release impact per package
    Plan(PlanCommand),

    /// Create the next release tag
    Tag(TagCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Status(ref cmd) => cmd.execute(&self),
            Commands::Members(ref cmd) => cmd.execute(&self),
            Commands::Tags(ref cmd) => cmd.execute(&self),
            Commands::Commits(ref cmd) => cmd.execute(&self),
            Commands::Plan(ref cmd) => cmd.execute(&self),
            Commands::Tag(ref cmd) => cmd.execute(&self),
        }
    }
}
