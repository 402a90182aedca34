//! Layered configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML config file at
//! `~/.config/jira-cli/config.yml`, environment variables, command-line
//! flags. Environment fallback for flags is declared on the clap surface
//! (`#[arg(env = ...)]`), so by the time [`Config::resolve`] runs the
//! flag values already reflect env vars; this module only has to merge in
//! the file layer and the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::{Error, Result};

/// The name of the package, used for the config directory.
const PKG_NAME: &str = "jira-cli";

/// Values read from the config file. All optional; anything absent falls
/// through to the next layer down.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub user: Option<String>,
    pub editor: Option<String>,
    /// Default project for searches when no filter is given.
    pub project: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(FileConfig::default());
        }
        let raw = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&raw)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))
    }
}

/// Fully resolved configuration, assembled once before a command runs and
/// never mutated afterwards.
#[derive(Debug, Default)]
pub struct Config {
    endpoint: Option<String>,
    pub user: Option<String>,
    pub token: Option<String>,
    pub editor: Option<String>,
    pub project: Option<String>,
    pub config_dir: String,
}

impl Config {
    /// Merge the file layer under the already-env-expanded flag values.
    pub fn resolve(file: FileConfig, args: &GlobalArgs) -> Config {
        Config {
            endpoint: args.endpoint.clone().or(file.endpoint),
            user: args.user.clone().or(file.user),
            token: args.token.clone(),
            editor: args.editor.clone().or(file.editor),
            project: file.project,
            config_dir: config_dir(),
        }
    }

    /// Load the config file from the default location and resolve.
    pub fn load(args: &GlobalArgs) -> Result<Config> {
        let dir = config_dir();
        let file = FileConfig::load(&Path::new(&dir).join("config.yml"))?;
        Ok(Config::resolve(file, args))
    }

    /// The endpoint is required for every command that talks to the
    /// server; reporting its absence is a configuration error raised
    /// before any network call.
    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint.as_deref().ok_or_else(|| {
            Error::Config(
                "no endpoint configured; pass --endpoint, set JIRA_ENDPOINT, or add 'endpoint' to config.yml"
                    .to_string(),
            )
        })
    }

    pub fn browse_url(&self, key: &str) -> Result<String> {
        Ok(format!("{}/browse/{}", self.endpoint()?.trim_end_matches('/'), key))
    }
}

/// Path to `~/.config/jira-cli/`, created on demand.
pub fn config_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(home).join(".config").join(PKG_NAME);
    if !path.exists() {
        // Best effort; a read-only HOME just means no user templates.
        let _ = std::fs::create_dir_all(&path);
    }
    path.to_string_lossy().to_string()
}
