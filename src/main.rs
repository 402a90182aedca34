use std::process;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jira_cli::cli::Cli;
use jira_cli::commands;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = commands::dispatch(cli) {
        eprintln!("{} {}", "error:".red(), err);
        process::exit(1);
    }
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Subscriber was already set; ignore.
    }
}
