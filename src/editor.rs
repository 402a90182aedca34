//! External editor invocation for the edit loop.
//!
//! The loop only needs "here is a buffer, give me back what the user
//! saved", so that is the whole trait. The real implementation writes a
//! temp file, blocks on the user's editor, and reads the file back; the
//! temp file is removed on every exit path because `tempfile` owns it.

use std::io::Write;
use std::process::Command;

use tempfile::Builder;
use tracing::debug;

use crate::error::{Error, Result};

pub trait EditorLauncher {
    /// Present `buffer` for editing and return the saved content.
    fn edit(&self, buffer: &str) -> Result<String>;
}

/// Spawns `$JIRA_EDITOR`, `$VISUAL` or `$EDITOR` (first one set, falling
/// back to `vim`) on a temporary `.yml` file.
pub struct ExternalEditor {
    editor: String,
}

impl ExternalEditor {
    pub fn new(configured: Option<String>) -> Self {
        let editor = configured
            .or_else(|| std::env::var("JIRA_EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| "vim".to_string());
        ExternalEditor { editor }
    }
}

impl EditorLauncher for ExternalEditor {
    fn edit(&self, buffer: &str) -> Result<String> {
        let mut file = Builder::new()
            .prefix("jira-edit-")
            .suffix(".yml")
            .tempfile()?;
        file.write_all(buffer.as_bytes())?;
        file.flush()?;

        debug!(editor = %self.editor, path = %file.path().display(), "spawning editor");

        // The editor value may carry arguments (e.g. "code --wait").
        let mut parts = self.editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Editor("editor command is empty".to_string()))?;
        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .status()
            .map_err(|err| Error::Editor(format!("failed to spawn '{}': {}", self.editor, err)))?;

        if !status.success() {
            return Err(Error::Cancelled);
        }

        // Read back via the path, not the open handle: some editors
        // replace the file instead of writing in place.
        let edited = std::fs::read_to_string(file.path())?;
        Ok(edited)
    }
}
