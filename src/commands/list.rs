//! `jira list` - one search round trip, rendered line by line through a
//! named template. No client-side filtering or paging; unset search
//! values fall back to the defaults in `api`.

use clap::Args;

use crate::api::{Api, SearchOptions};
use crate::config::Config;
use crate::error::Result;
use crate::template;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// User assigned the issue
    #[arg(short = 'a', long)]
    pub assignee: Option<String>,

    /// Component to search for
    #[arg(short = 'c', long)]
    pub component: Option<String>,

    /// Issue type to search for
    #[arg(short = 'i', long)]
    pub issuetype: Option<String>,

    /// Maximum number of results to return
    #[arg(short = 'l', long)]
    pub limit: Option<u32>,

    /// Project to search for
    #[arg(short = 'p', long)]
    pub project: Option<String>,

    /// JQL expression for the search
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// Fields to request, comma-separated
    #[arg(short = 'f', long)]
    pub queryfields: Option<String>,

    /// Reporter to search for
    #[arg(short = 'r', long)]
    pub reporter: Option<String>,

    /// Sort order to return
    #[arg(short = 's', long)]
    pub sort: Option<String>,

    /// Watcher to search for
    #[arg(short = 'w', long)]
    pub watcher: Option<String>,

    /// Output template name ("list", "table", or a user template)
    #[arg(short = 't', long, default_value = "list")]
    pub template: String,
}

impl Default for ListArgs {
    fn default() -> Self {
        ListArgs {
            assignee: None,
            component: None,
            issuetype: None,
            limit: None,
            project: None,
            query: None,
            queryfields: None,
            reporter: None,
            sort: None,
            watcher: None,
            template: "list".to_string(),
        }
    }
}

/// Assemble the search options once. The config file's default project
/// applies only when no filter or query narrows the search already.
fn search_options(config: &Config, args: &ListArgs) -> SearchOptions {
    let project = args.project.clone().or_else(|| {
        if args.query.is_none() && args.assignee.is_none() && args.watcher.is_none() {
            config.project.clone()
        } else {
            None
        }
    });

    SearchOptions {
        assignee: args.assignee.clone(),
        component: args.component.clone(),
        issue_type: args.issuetype.clone(),
        max_results: args.limit,
        project,
        query: args.query.clone(),
        query_fields: args.queryfields.clone(),
        reporter: args.reporter.clone(),
        sort: args.sort.clone(),
        watcher: args.watcher.clone(),
    }
}

pub fn run(config: &Config, api: &dyn Api, args: &ListArgs) -> Result<()> {
    config.endpoint()?;

    let opts = search_options(config, args);
    let results = api.search(&opts)?;

    let body = template::lookup(&config.config_dir, &args.template)?;
    for issue in &results.issues {
        println!("{}", template::render_issue(&body, issue));
    }
    Ok(())
}
