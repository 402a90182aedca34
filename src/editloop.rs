//! The human-in-the-loop edit cycle: render the issue into a YAML buffer,
//! let the user edit it, parse the buffer into an update payload, submit,
//! and on a recoverable rejection re-open the same buffer (annotated with
//! the server error) for correction.
//!
//! The cycle is an explicit state machine rather than ad-hoc control flow
//! so the retry boundary is testable with a scripted editor and a canned
//! submit callback, no real editor or network involved.

use std::collections::BTreeMap;

use tracing::debug;

use crate::data::{EditMeta, Issue, IssueUpdate};
use crate::editor::EditorLauncher;
use crate::error::{Error, Result};
use crate::template;

/// States of one edit cycle. Failure states carry the error that put the
/// loop there.
#[derive(Debug)]
enum EditState {
    Rendering,
    AwaitingUserEdit,
    Submitting,
    Succeeded,
    FailedRecoverable(Error),
    FailedFatal(Error),
}

/// What the loop did, for the caller's confirmation output.
#[derive(Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Submitted,
    /// Buffer came back unchanged and no overrides were given; nothing
    /// was sent.
    Unchanged,
}

pub struct EditLoop<'a> {
    issue: &'a Issue,
    meta: &'a EditMeta,
    overrides: &'a BTreeMap<String, String>,
    /// Body of the edit template the buffer is rendered through, already
    /// looked up by name (`template::lookup`).
    template: &'a str,
    /// When set, the editor is never opened: overrides are applied
    /// directly and submitted. Any failure is then fatal, there being no
    /// human to correct the payload.
    skip_editing: bool,
    editor: &'a dyn EditorLauncher,
}

impl<'a> EditLoop<'a> {
    pub fn new(
        issue: &'a Issue,
        meta: &'a EditMeta,
        overrides: &'a BTreeMap<String, String>,
        template: &'a str,
        skip_editing: bool,
        editor: &'a dyn EditorLauncher,
    ) -> Self {
        EditLoop {
            issue,
            meta,
            overrides,
            template,
            skip_editing,
            editor,
        }
    }

    /// Drive the state machine to completion, invoking `submit` for each
    /// attempt. Returns once a submission succeeds, nothing needed to be
    /// sent, or a non-recoverable error occurs.
    pub fn run(&self, submit: &mut dyn FnMut(&IssueUpdate) -> Result<()>) -> Result<EditOutcome> {
        let mut state = EditState::Rendering;
        let mut buffer = String::new();

        loop {
            state = match state {
                EditState::Rendering => {
                    buffer = template::render_edit_buffer(
                        self.template,
                        self.issue,
                        self.meta,
                        self.overrides,
                    )?;
                    if self.skip_editing {
                        EditState::Submitting
                    } else {
                        EditState::AwaitingUserEdit
                    }
                }
                EditState::AwaitingUserEdit => {
                    buffer = self.editor.edit(&buffer)?;
                    EditState::Submitting
                }
                EditState::Submitting => match self.build_update(&buffer) {
                    // A malformed buffer is user-correctable the same way
                    // a server rejection is.
                    Err(err @ Error::Yaml(_)) if !self.skip_editing => {
                        EditState::FailedRecoverable(err)
                    }
                    Err(err) => EditState::FailedFatal(err),
                    Ok(update) if update.is_empty() => {
                        debug!("no changes; skipping submit");
                        return Ok(EditOutcome::Unchanged);
                    }
                    Ok(update) => match submit(&update) {
                        Ok(()) => EditState::Succeeded,
                        Err(err) if err.is_recoverable() && !self.skip_editing => {
                            EditState::FailedRecoverable(err)
                        }
                        Err(err) => EditState::FailedFatal(err),
                    },
                },
                EditState::FailedRecoverable(err) => {
                    debug!(%err, "submit rejected; re-opening editor");
                    buffer = annotate(&buffer, &err);
                    EditState::AwaitingUserEdit
                }
                EditState::FailedFatal(err) => return Err(err),
                EditState::Succeeded => return Ok(EditOutcome::Submitted),
            };
        }
    }

    /// Parse the buffer, diff against the original issue, and layer the
    /// command-line overrides on top.
    fn build_update(&self, buffer: &str) -> Result<IssueUpdate> {
        let edited = template::parse_edit_buffer(buffer)?;
        let mut update = IssueUpdate::from_diff(&self.issue.fields, &edited);
        for (key, value) in self.overrides {
            update.apply_override(key, value);
        }
        Ok(update)
    }
}

/// Prepend the error as comment lines, replacing any annotation from the
/// previous attempt so errors do not pile up across retries.
fn annotate(buffer: &str, err: &Error) -> String {
    let body: String = buffer
        .lines()
        .filter(|line| !line.trim_start().starts_with("# ERROR"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("# ERROR: {}\n{}\n", err, body.trim_start_matches('\n'))
}
