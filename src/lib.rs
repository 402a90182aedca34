//! # jira-cli
//!
//! A command-line client for Jira-like issue trackers: edit issues in
//! your editor, set labels, list search results, vote.

pub mod api;
pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod editloop;
pub mod editor;
pub mod error;
pub mod jira;
pub mod template;

// Re-export commonly used types
pub use config::Config;
pub use data::{EditMeta, Issue, IssueUpdate};
pub use error::{Error, Result};
