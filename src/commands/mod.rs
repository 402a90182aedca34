//! One module per subcommand: an options struct (clap `Args` derive) and
//! a `run` function taking the resolved configuration and the API seam.
//! Dispatch lives here so `main` stays a thin shell.

pub mod browse;
pub mod edit;
pub mod labels;
pub mod list;
pub mod vote;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::editor::ExternalEditor;
use crate::error::Result;
use crate::jira::JiraClient;

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.globals)?;
    let browse = cli.globals.browse;

    match cli.command {
        Commands::Edit(args) => {
            let client = client(&config)?;
            let editor = ExternalEditor::new(config.editor.clone());
            edit::run(&config, &client, &editor, browse, &args)
        }
        Commands::Labels(args) => {
            let client = client(&config)?;
            labels::run(&config, &client, browse, &args)
        }
        Commands::List(args) => {
            let client = client(&config)?;
            list::run(&config, &client, &args)
        }
        Commands::Vote(args) => {
            let client = client(&config)?;
            vote::run(&config, &client, browse, &args)
        }
        Commands::Browse(args) => browse::run(&config, &args),
    }
}

fn client(config: &Config) -> Result<JiraClient> {
    JiraClient::new(config.endpoint()?, config.user.clone(), config.token.clone())
}

/// Print the per-issue confirmation line.
pub(crate) fn confirm(key: &str, endpoint: &str) {
    println!("OK {} {}/browse/{}", key, endpoint.trim_end_matches('/'), key);
}
