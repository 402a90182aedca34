//! `jira browse` - open an issue's browse URL in the default browser.

use clap::Args;

use crate::config::Config;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Issue key to open
    pub issue: String,
}

pub fn run(config: &Config, args: &BrowseArgs) -> Result<()> {
    crate::browse::open(&config.browse_url(&args.issue)?)
}
