//! CLI commands

mod commits;
mod init;
mod members;
mod plan;
mod status;
mod tag;
mod tags;

pub use commits::CommitsCommand;
pub use init::InitCommand;
pub use members::MembersCommand;
pub use plan::PlanCommand;
pub use status::StatusCommand;
pub use tag::TagCommand;
pub use tags::TagsCommand;

use clap::Args;

/// History range shared by commands that read commits
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Start of the range, exclusive (default: latest version tag)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the range, inclusive
    #[arg(long, default_value = bumpkit_git::HEAD)]
    pub to: String,
}
