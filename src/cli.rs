use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pom-tooling",
    about = "Maven POM automation - dependency bumps, version setting and merge request handling",
    version,
    author
)]
pub struct Cli {
    /// Path to a TOML configuration file (defaults to $POM_TOOLING_CONFIG)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bump organizational dependencies and open a merge request
    UpdateDependencies {
        #[arg(long)]
        repository_name: Option<String>,

        #[arg(long)]
        jira_number: Option<String>,

        /// Branch to update and target with the merge request (default: develop)
        #[arg(long)]
        branch_name: Option<String>,

        #[command(flatten)]
        event: RawEvent,
    },

    /// Set the project version of every pom.xml and push it
    SetVersion {
        #[arg(long)]
        repository_name: Option<String>,

        #[arg(long)]
        new_pom_version: Option<String>,

        #[arg(long)]
        jira_number: Option<String>,

        #[arg(long)]
        branch_name: Option<String>,

        #[command(flatten)]
        event: RawEvent,
    },

    /// Print the status of the latest pipeline of a merge request
    CheckBuildStatus {
        #[arg(long)]
        merge_request_url: Option<String>,

        #[command(flatten)]
        event: RawEvent,
    },

    /// Approve and merge a merge request
    ApproveMerge {
        #[arg(long)]
        merge_request_url: Option<String>,

        #[command(flatten)]
        event: RawEvent,
    },
}

#[derive(Args, Debug, Default)]
pub struct RawEvent {
    /// Raw JSON event (camelCase fields); replaces the individual flags
    #[arg(long = "event", value_name = "JSON")]
    pub json: Option<String>,
}
