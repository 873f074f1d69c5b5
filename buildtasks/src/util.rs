// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locating external programs.

use crate::error::{Result, TaskError};

/// Returns whether `command` resolves on `PATH`.
#[must_use]
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

/// Fails with [`TaskError::MissingCommand`] unless `command` is installed.
pub fn require_command(command: &str) -> Result<()> {
    if command_exists(command) {
        Ok(())
    } else {
        Err(TaskError::MissingCommand {
            command: command.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TaskError;

    use super::require_command;

    #[test]
    fn unknown_command_is_missing() {
        let error = require_command("definitely-not-a-real-command-7f3a").unwrap_err();
        assert!(matches!(error, TaskError::MissingCommand { command } if command.ends_with("7f3a")));
    }
}
