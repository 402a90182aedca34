//! The logical REST operations the commands need, behind a trait so that
//! command flow (batch edits, the edit-loop retry boundary) can be tested
//! against a mock instead of a live server.

use crate::data::{EditMeta, Issue, IssueUpdate, SearchResults};
use crate::error::Result;

/// Default maximum number of search results.
pub const DEFAULT_MAX_RESULTS: u32 = 500;

/// Default field projection for searches.
pub const DEFAULT_QUERY_FIELDS: &str = "assignee,created,priority,reporter,status,summary,updated";

/// Default sort order for searches.
pub const DEFAULT_SORT: &str = "priority asc, key";

pub trait Api {
    /// Fetch an issue's current state.
    fn get_issue(&self, key: &str) -> Result<Issue>;

    /// Fetch the server-declared schema of the fields currently editable
    /// on an issue.
    fn get_edit_meta(&self, key: &str) -> Result<EditMeta>;

    /// Submit an update payload for an issue.
    fn edit_issue(&self, key: &str, update: &IssueUpdate) -> Result<()>;

    /// Run one search round trip. No paging; the caller gets at most
    /// `max_results` issues in server order.
    fn search(&self, opts: &SearchOptions) -> Result<SearchResults>;

    fn add_vote(&self, key: &str) -> Result<()>;

    fn remove_vote(&self, key: &str) -> Result<()>;
}

/// Search filters, assembled from flags once per invocation. Unset values
/// resolve to the module constants at query-build time; nothing here is
/// mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub assignee: Option<String>,
    pub component: Option<String>,
    pub issue_type: Option<String>,
    pub max_results: Option<u32>,
    pub project: Option<String>,
    pub query: Option<String>,
    pub query_fields: Option<String>,
    pub reporter: Option<String>,
    pub sort: Option<String>,
    pub watcher: Option<String>,
}

impl SearchOptions {
    pub fn with_query(query: impl Into<String>) -> Self {
        SearchOptions {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn query_fields(&self) -> &str {
        self.query_fields.as_deref().unwrap_or(DEFAULT_QUERY_FIELDS)
    }

    pub fn sort(&self) -> &str {
        self.sort.as_deref().unwrap_or(DEFAULT_SORT)
    }

    /// Assemble the JQL expression for this search.
    ///
    /// An explicit `--query` is taken verbatim; otherwise the filter flags
    /// are AND-joined. The sort order is appended unless the query already
    /// carries its own `ORDER BY`.
    pub fn jql(&self) -> String {
        let mut jql = match &self.query {
            Some(query) if !query.is_empty() => query.clone(),
            _ => {
                let mut clauses = Vec::new();
                if let Some(project) = &self.project {
                    clauses.push(format!("project = {}", quoted(project)));
                }
                if let Some(component) = &self.component {
                    clauses.push(format!("component = {}", quoted(component)));
                }
                if let Some(assignee) = &self.assignee {
                    clauses.push(format!("assignee = {}", quoted(assignee)));
                }
                if let Some(issue_type) = &self.issue_type {
                    clauses.push(format!("issuetype = {}", quoted(issue_type)));
                }
                if let Some(reporter) = &self.reporter {
                    clauses.push(format!("reporter = {}", quoted(reporter)));
                }
                if let Some(watcher) = &self.watcher {
                    clauses.push(format!("watcher = {}", quoted(watcher)));
                }
                clauses.join(" AND ")
            }
        };

        let sort = self.sort();
        if !sort.is_empty() && !jql.to_uppercase().contains("ORDER BY") {
            if !jql.is_empty() {
                jql.push(' ');
            }
            jql.push_str("ORDER BY ");
            jql.push_str(sort);
        }
        jql
    }
}

/// Single-quote a filter value for JQL, backslash-escaping any quotes or
/// backslashes the value itself carries.
fn quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('\'');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_constants() {
        let opts = SearchOptions::default();
        assert_eq!(opts.max_results(), 500);
        assert_eq!(opts.query_fields().split(',').count(), 7);
        assert_eq!(opts.sort(), "priority asc, key");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let opts = SearchOptions {
            max_results: Some(10),
            query_fields: Some("key,summary".to_string()),
            sort: Some("created desc".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.max_results(), 10);
        assert_eq!(opts.query_fields(), "key,summary");
        assert_eq!(opts.sort(), "created desc");
    }

    #[test]
    fn jql_joins_filters_with_and() {
        let opts = SearchOptions {
            project: Some("PROJ".to_string()),
            assignee: Some("alice".to_string()),
            sort: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(opts.jql(), "project = 'PROJ' AND assignee = 'alice'");
    }

    #[test]
    fn jql_escapes_quotes_in_filter_values() {
        let opts = SearchOptions {
            assignee: Some("O'Brien".to_string()),
            sort: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(opts.jql(), r"assignee = 'O\'Brien'");
    }

    #[test]
    fn jql_appends_default_sort() {
        let opts = SearchOptions {
            project: Some("PROJ".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.jql(), "project = 'PROJ' ORDER BY priority asc, key");
    }

    #[test]
    fn explicit_query_wins_over_filters() {
        let opts = SearchOptions {
            query: Some("assignee = bob".to_string()),
            project: Some("IGNORED".to_string()),
            sort: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(opts.jql(), "assignee = bob");
    }

    #[test]
    fn sort_not_duplicated_when_query_orders() {
        let opts = SearchOptions {
            query: Some("project = X order by created".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.jql(), "project = X order by created");
    }
}
