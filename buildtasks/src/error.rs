// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by every task.

use thiserror::Error;

/// Result alias for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

/// Everything that can stop a task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a pad failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A line the Makefile patch anchors on is absent.
    #[error("cannot find `{what}` line in makefile")]
    MissingLine {
        /// The line that was looked for.
        what: &'static str,
    },

    /// `subdir.mk` holds no compiler command to copy.
    #[error("cannot find g++ command in subdir.mk")]
    MissingCompilerCommand,

    /// An external command exited unsuccessfully.
    #[error("external command failed: {command} (exit={exit_code})")]
    CommandFailed {
        /// The command line that ran.
        command: String,
        /// Its exit status, or 1 if it was killed by a signal.
        exit_code: i32,
    },

    /// An external command is not installed.
    #[error("missing dependency command: {command}")]
    MissingCommand {
        /// The program that was looked up.
        command: String,
    },
}

impl TaskError {
    /// Returns the process exit code for this error.
    ///
    /// A failed external command passes its own status through.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { exit_code, .. } => *exit_code,
            Self::MissingCommand { .. } => 127,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskError;

    #[test]
    fn command_failed_exit_code_is_propagated() {
        let error = TaskError::CommandFailed {
            command: "make all".to_string(),
            exit_code: 2,
        };
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.to_string(), "external command failed: make all (exit=2)");
    }

    #[test]
    fn structural_errors_name_the_missing_piece() {
        let error = TaskError::MissingLine { what: "clean:" };
        assert_eq!(error.to_string(), "cannot find `clean:` line in makefile");
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            TaskError::MissingCommand {
                command: "latex".to_string()
            }
            .exit_code(),
            127
        );
    }
}
