//! `jira vote` - add or withdraw the caller's vote on an issue. The two
//! actions are selected by a single flag, so they cannot both happen in
//! one invocation.

use clap::Args;

use crate::api::Api;
use crate::config::Config;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Issue key to vote on
    pub issue: String,

    /// Withdraw the vote instead of casting it
    #[arg(short = 'd', long)]
    pub down: bool,
}

pub fn run(config: &Config, api: &dyn Api, browse: bool, args: &VoteArgs) -> Result<()> {
    let endpoint = config.endpoint()?;

    if args.down {
        api.remove_vote(&args.issue)?;
    } else {
        api.add_vote(&args.issue)?;
    }

    super::confirm(&args.issue, endpoint);
    if browse {
        crate::browse::open(&config.browse_url(&args.issue)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mock::{config_with_endpoint, MockApi};

    #[test]
    fn default_action_is_an_up_vote() {
        let api = MockApi::default();
        let args = VoteArgs {
            issue: "PROJ-3".to_string(),
            down: false,
        };

        run(&config_with_endpoint(), &api, false, &args).unwrap();
        assert_eq!(*api.votes.borrow(), vec![("PROJ-3".to_string(), "up")]);
    }

    #[test]
    fn down_flag_selects_the_remove_call() {
        let api = MockApi::default();
        let args = VoteArgs {
            issue: "PROJ-3".to_string(),
            down: true,
        };

        run(&config_with_endpoint(), &api, false, &args).unwrap();
        assert_eq!(*api.votes.borrow(), vec![("PROJ-3".to_string(), "down")]);
    }
}
