use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(RejectedError),

    #[error("Unexpected response from server: {0}")]
    BadResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Edit cancelled")]
    Cancelled,

    #[error("Template error: {0}")]
    Template(String),

    #[error("Failed to open browser: {0}")]
    Browse(String),

    #[error("{failed} of {total} issues failed to update")]
    Batch { failed: usize, total: usize },
}

/// A request the server understood and refused, decoded from the Jira
/// error body. Distinct from [`Error::Transport`]: the payload (not the
/// connection) is at fault, so the user can correct it and resubmit.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedError {
    pub status: u16,
    pub messages: Vec<String>,
    pub errors: BTreeMap<String, String>,
}

impl std::fmt::Display for RejectedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request rejected (HTTP {})", self.status)?;
        for msg in &self.messages {
            write!(f, ": {}", msg)?;
        }
        for (field, msg) in &self.errors {
            write!(f, ": {}: {}", field, msg)?;
        }
        Ok(())
    }
}

impl Error {
    /// Whether the edit loop may re-present the buffer for correction.
    ///
    /// Only server-side rejections of the payload qualify; transport
    /// failures, IO errors and cancelled edits always propagate.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
