//! `jira edit` - modify issue fields through the external editor, for a
//! single issue or for every result of a search.

use std::collections::BTreeMap;

use clap::Args;
use colored::Colorize;

use crate::api::{Api, SearchOptions};
use crate::config::Config;
use crate::data::Issue;
use crate::editloop::EditLoop;
use crate::editor::EditorLauncher;
use crate::error::{Error, Result};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Issue key to edit
    pub issue: Option<String>,

    /// JQL expression; every matching issue is edited in turn
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// Comment to add to the issue
    #[arg(short = 'm', long)]
    pub comment: Option<String>,

    /// Set an issue field directly, KEY=VALUE (repeatable)
    #[arg(short = 'o', long = "override", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Apply overrides without opening the editor
    #[arg(long)]
    pub noedit: bool,

    /// Template for the edit buffer ("edit" or a user template)
    #[arg(short = 't', long, default_value = "edit")]
    pub template: String,
}

impl Default for EditArgs {
    fn default() -> Self {
        EditArgs {
            issue: None,
            query: None,
            comment: None,
            overrides: Vec::new(),
            noedit: false,
            template: "edit".to_string(),
        }
    }
}

fn parse_override(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

pub fn run(
    config: &Config,
    api: &dyn Api,
    editor: &dyn EditorLauncher,
    browse: bool,
    args: &EditArgs,
) -> Result<()> {
    let endpoint = config.endpoint()?.to_string();
    let overrides = collect_overrides(args);
    let template = crate::template::lookup(&config.config_dir, &args.template)?;

    if let Some(key) = &args.issue {
        let issue = api.get_issue(key)?;
        return edit_issue(
            api, editor, &endpoint, &issue, &overrides, &template, args.noedit, browse,
        );
    }

    let query = args.query.as_deref().filter(|q| !q.is_empty()).ok_or_else(|| {
        Error::Usage("edit needs an ISSUE key or a --query to select issues".to_string())
    })?;

    let results = api.search(&SearchOptions::with_query(query))?;
    let total = results.issues.len();
    let mut failed = 0;

    // Strictly sequential, one edit-and-submit cycle per issue. Each
    // issue is an independent unit of work: a permanent failure on one is
    // reported and counted, and iteration continues with the next.
    for issue in &results.issues {
        if let Err(err) = edit_issue(
            api, editor, &endpoint, issue, &overrides, &template, args.noedit, browse,
        ) {
            eprintln!("{} {}: {}", "x".red(), issue.key, err);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(Error::Batch { failed, total });
    }
    Ok(())
}

fn collect_overrides(args: &EditArgs) -> BTreeMap<String, String> {
    let mut overrides: BTreeMap<String, String> = args.overrides.iter().cloned().collect();
    if let Some(comment) = &args.comment {
        overrides.insert("comment".to_string(), comment.clone());
    }
    overrides
}

/// One full edit-loop cycle for one issue, plus confirmation output and
/// the optional browser launch. The browser opens per issue; it never
/// short-circuits the rest of a batch.
#[allow(clippy::too_many_arguments)]
fn edit_issue(
    api: &dyn Api,
    editor: &dyn EditorLauncher,
    endpoint: &str,
    issue: &Issue,
    overrides: &BTreeMap<String, String>,
    template: &str,
    noedit: bool,
    browse: bool,
) -> Result<()> {
    let meta = api.get_edit_meta(&issue.key)?;

    EditLoop::new(issue, &meta, overrides, template, noedit, editor)
        .run(&mut |update| api.edit_issue(&issue.key, update))?;

    super::confirm(&issue.key, endpoint);
    if browse {
        crate::browse::open(&format!("{}/browse/{}", endpoint, issue.key))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mock::{config_with_endpoint, MockApi};
    use crate::data::{FieldOperation, SearchResults};
    use serde_json::json;

    /// Editor stand-in that saves the buffer unmodified.
    struct SaveUnchanged;

    impl EditorLauncher for SaveUnchanged {
        fn edit(&self, buffer: &str) -> Result<String> {
            Ok(buffer.to_string())
        }
    }

    fn issue(key: &str) -> Issue {
        Issue {
            key: key.to_string(),
            fields: [("summary".to_string(), json!("existing summary"))]
                .into_iter()
                .collect(),
            self_link: None,
        }
    }

    #[test]
    fn noedit_single_issue_submits_overrides_only() {
        let api = MockApi::default().with_issue(issue("PROJ-1"));
        let args = EditArgs {
            issue: Some("PROJ-1".to_string()),
            comment: Some("ship it".to_string()),
            noedit: true,
            ..Default::default()
        };

        run(&config_with_endpoint(), &api, &SaveUnchanged, false, &args).unwrap();

        let edits = api.edits.borrow();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, "PROJ-1");
        assert_eq!(
            edits[0].1.update["comment"],
            vec![FieldOperation::add(json!({"body": "ship it"}))]
        );
        assert_eq!(edits[0].1.update.len(), 1);
    }

    #[test]
    fn unchanged_buffer_submits_nothing() {
        let api = MockApi::default().with_issue(issue("PROJ-1"));
        let args = EditArgs {
            issue: Some("PROJ-1".to_string()),
            ..Default::default()
        };

        run(&config_with_endpoint(), &api, &SaveUnchanged, false, &args).unwrap();
        assert!(api.edits.borrow().is_empty());
    }

    #[test]
    fn missing_issue_and_query_is_a_usage_error() {
        let api = MockApi::default();
        let err = run(
            &config_with_endpoint(),
            &api,
            &SaveUnchanged,
            false,
            &EditArgs::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert!(api.searches.borrow().is_empty());
    }

    #[test]
    fn batch_continues_past_failures_and_reports_them() {
        let api = MockApi {
            search_results: SearchResults {
                total: 2,
                issues: vec![issue("PROJ-1"), issue("PROJ-2")],
            },
            reject_edits: vec!["PROJ-1".to_string()],
            ..Default::default()
        };
        let args = EditArgs {
            query: Some("project = PROJ".to_string()),
            comment: Some("bulk note".to_string()),
            noedit: true,
            ..Default::default()
        };

        let err = run(&config_with_endpoint(), &api, &SaveUnchanged, false, &args).unwrap_err();
        assert!(matches!(err, Error::Batch { failed: 1, total: 2 }));

        // PROJ-2 was still processed after PROJ-1's permanent failure.
        let edits = api.edits.borrow();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[1].0, "PROJ-2");
    }

    #[test]
    fn batch_search_uses_the_given_query() {
        let api = MockApi {
            search_results: SearchResults::default(),
            ..Default::default()
        };
        let args = EditArgs {
            query: Some("assignee = alice".to_string()),
            ..Default::default()
        };

        run(&config_with_endpoint(), &api, &SaveUnchanged, false, &args).unwrap();
        let searches = api.searches.borrow();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].query.as_deref(), Some("assignee = alice"));
    }

    #[test]
    fn unknown_template_fails_before_any_api_call() {
        let api = MockApi::default().with_issue(issue("PROJ-1"));
        let args = EditArgs {
            issue: Some("PROJ-1".to_string()),
            template: "bogus".to_string(),
            ..Default::default()
        };

        let err = run(&config_with_endpoint(), &api, &SaveUnchanged, false, &args).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(api.edits.borrow().is_empty());
    }

    #[test]
    fn user_edit_template_reaches_the_editor() {
        struct Recording(std::cell::RefCell<Vec<String>>);
        impl EditorLauncher for Recording {
            fn edit(&self, buffer: &str) -> Result<String> {
                self.0.borrow_mut().push(buffer.to_string());
                Ok(buffer.to_string())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("edit"), "# custom header {{key}}\n{{fields}}").unwrap();

        let mut config = config_with_endpoint();
        config.config_dir = dir.path().to_string_lossy().to_string();

        let api = MockApi::default().with_issue(issue("PROJ-1"));
        let editor = Recording(std::cell::RefCell::new(Vec::new()));
        let args = EditArgs {
            issue: Some("PROJ-1".to_string()),
            ..Default::default()
        };

        run(&config, &api, &editor, false, &args).unwrap();

        let shown = editor.0.borrow();
        assert!(shown[0].starts_with("# custom header PROJ-1"));
    }

    #[test]
    fn override_parser_rejects_missing_equals() {
        assert!(parse_override("priority").is_err());
        assert_eq!(
            parse_override("priority=High").unwrap(),
            ("priority".to_string(), "High".to_string())
        );
    }
}
