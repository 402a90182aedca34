//! Blocking HTTP client for the Jira REST v2 API.
//!
//! One method per logical operation, each a single request/response round
//! trip. Transport failures surface as [`Error::Transport`]; responses the
//! server refused are decoded into [`Error::Rejected`] so the edit loop
//! can distinguish "fix your payload" from "the connection is gone".

use std::collections::BTreeMap;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::api::{Api, SearchOptions};
use crate::data::{EditMeta, Issue, IssueUpdate, SearchResults};
use crate::error::{Error, RejectedError, Result};

/// Error body shape the server uses for rejected requests.
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default, alias = "errorMessages")]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

pub struct JiraClient {
    client: Client,
    endpoint: String,
    user: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(endpoint: &str, user: Option<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jira-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(JiraClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            user,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.endpoint, path)
    }

    fn apply_auth(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match (&self.user, &self.token) {
            (Some(user), token) => req.basic_auth(user, token.as_deref()),
            (None, Some(token)) => req.bearer_auth(token),
            (None, None) => req,
        }
    }

    /// Decode a response, turning non-success statuses into
    /// [`Error::Rejected`] with whatever error body the server provided.
    fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: ErrorBody = response.json().unwrap_or_default();
        Err(Error::Rejected(RejectedError {
            status: status.as_u16(),
            messages: body.error_messages,
            errors: body.errors,
        }))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!(path, "GET");
        let response = self
            .apply_auth(self.client.get(self.url(path)).query(params))
            .send()?;
        let response = self.check(response)?;
        response
            .json()
            .map_err(|err| Error::BadResponse(err.to_string()))
    }
}

impl Api for JiraClient {
    fn get_issue(&self, key: &str) -> Result<Issue> {
        self.get_json(&format!("issue/{}", key), &[])
    }

    fn get_edit_meta(&self, key: &str) -> Result<EditMeta> {
        self.get_json(&format!("issue/{}/editmeta", key), &[])
    }

    fn edit_issue(&self, key: &str, update: &IssueUpdate) -> Result<()> {
        debug!(key, "PUT issue update");
        let response = self
            .apply_auth(self.client.put(self.url(&format!("issue/{}", key))))
            .json(update)
            .send()?;
        let response = self.check(response)?;
        // 204 on success; drain the body either way.
        if response.status() != StatusCode::NO_CONTENT {
            let _ = response.bytes();
        }
        Ok(())
    }

    fn search(&self, opts: &SearchOptions) -> Result<SearchResults> {
        let jql = opts.jql();
        let max_results = opts.max_results().to_string();
        debug!(%jql, max_results, "search");
        self.get_json(
            "search",
            &[
                ("jql", jql.as_str()),
                ("maxResults", max_results.as_str()),
                ("fields", opts.query_fields()),
            ],
        )
    }

    fn add_vote(&self, key: &str) -> Result<()> {
        debug!(key, "POST vote");
        let response = self
            .apply_auth(self.client.post(self.url(&format!("issue/{}/votes", key))))
            .send()?;
        self.check(response)?;
        Ok(())
    }

    fn remove_vote(&self, key: &str) -> Result<()> {
        debug!(key, "DELETE vote");
        let response = self
            .apply_auth(self.client.delete(self.url(&format!("issue/{}/votes", key))))
            .send()?;
        self.check(response)?;
        Ok(())
    }
}
