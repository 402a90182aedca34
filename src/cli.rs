//! Command-line surface: global arguments plus one options struct per
//! subcommand, dispatched in `commands`.

use clap::{Args, Parser, Subcommand};

use crate::commands;

#[derive(Parser, Debug)]
#[command(name = "jira", author, version, about = "Command-line client for Jira-like issue trackers", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand. Environment fallbacks are part of
/// the configuration layering: defaults < config file < environment <
/// flags.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Base URL of the Jira instance
    #[arg(short = 'e', long, env = "JIRA_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// User name for basic auth
    #[arg(short = 'u', long, env = "JIRA_USER", global = true)]
    pub user: Option<String>,

    /// API token; used as the basic-auth password, or as a bearer token
    /// when no user is set
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Editor command for the edit loop
    #[arg(long, env = "JIRA_EDITOR", global = true)]
    pub editor: Option<String>,

    /// Open the issue in the browser after the command completes
    #[arg(short = 'b', long, global = true)]
    pub browse: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit issue fields in your editor, singly or for every search result
    Edit(commands::edit::EditArgs),

    /// Replace the label set on an issue
    Labels(commands::labels::LabelsArgs),

    /// List issues matching search criteria
    List(commands::list::ListArgs),

    /// Vote an issue up or down
    Vote(commands::vote::VoteArgs),

    /// Open an issue in the browser
    Browse(commands::browse::BrowseArgs),
}
