//! `jira labels` - replace the full label set on an issue with one `set`
//! operation. No edit loop, no retry: a rejection is fatal.

use clap::Args;

use crate::api::Api;
use crate::config::Config;
use crate::data::{FieldOperation, IssueUpdate};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct LabelsArgs {
    /// Issue key to modify
    pub issue: String,

    /// Labels to set; the issue ends up with exactly these
    #[arg(required = true)]
    pub labels: Vec<String>,
}

/// Exactly one operation: field `labels`, verb `set`, value = the label
/// list. Submitting the same labels twice produces the same payload.
fn update_for(labels: &[String]) -> IssueUpdate {
    let mut update = IssueUpdate::new();
    update.push("labels", FieldOperation::set(serde_json::json!(labels)));
    update
}

pub fn run(config: &Config, api: &dyn Api, browse: bool, args: &LabelsArgs) -> Result<()> {
    let endpoint = config.endpoint()?;

    api.edit_issue(&args.issue, &update_for(&args.labels))?;

    super::confirm(&args.issue, endpoint);
    if browse {
        crate::browse::open(&config.browse_url(&args.issue)?)?;
    }
    Ok(())
}
