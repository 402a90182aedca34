//! Launch the platform's default browser on an issue URL.

use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "start";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

pub fn open(url: &str) -> Result<()> {
    debug!(url, opener = OPENER, "opening browser");
    Command::new(OPENER)
        .arg(url)
        .spawn()
        .map_err(|err| Error::Browse(format!("{}: {}", OPENER, err)))?;
    Ok(())
}
