//! Shell command execution.
//!
//! Commands are split with shell word rules and spawned directly, without
//! an intermediate shell, so `|`, `>` and globs are passed through as
//! literal arguments. Output is decoded as UTF-8 unless another encoding
//! label is configured.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from [`ShellCommandExecutor`].
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Failed to parse command '{command}': {reason}")]
    Parse { command: String, reason: String },

    #[error("Failed to execute '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown character encoding '{label}'")]
    UnknownEncoding { label: String },
}

impl ShellError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyCommand => vec!["Provide a program to run, e.g. `echo hello`".into()],
            Self::Parse { .. } => {
                vec!["Check for unmatched quotes or invalid escape sequences".into()]
            }
            Self::Spawn { program, .. } => vec![
                format!("Ensure '{}' is installed and in PATH", program),
                "Check that the file is executable".into(),
            ],
            Self::UnknownEncoding { .. } => vec![
                "Use a WHATWG encoding label, e.g. utf-8, windows-1252 or shift_jis".into(),
            ],
        }
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, `-1` when terminated by a signal.
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

/// Runs external commands and collects their output line by line.
#[derive(Debug, Clone)]
pub struct ShellCommandExecutor {
    working_dir: Option<PathBuf>,
    encoding: &'static Encoding,
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self {
            working_dir: None,
            encoding: UTF_8,
        }
    }
}

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands from `dir` instead of the current directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: Some(dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Decode output with the encoding named by `label` (`cp1252`,
    /// `windows-1252`, `latin1`, ...).
    pub fn with_encoding(mut self, label: &str) -> Result<Self, ShellError> {
        self.encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            ShellError::UnknownEncoding {
                label: label.to_string(),
            }
        })?;
        Ok(self)
    }

    /// Canonical name of the output encoding.
    pub fn encoding(&self) -> &'static str {
        self.encoding.name()
    }

    /// Split `command` with shell word rules and run it.
    pub fn execute(&self, command: &str) -> Result<CommandOutput, ShellError> {
        let args = shell_words::split(command).map_err(|e| ShellError::Parse {
            command: command.to_string(),
            reason: e.to_string(),
        })?;
        self.execute_args(&args)
    }

    /// Run `args[0]` with the remaining elements as its arguments.
    #[instrument(skip(self), fields(dir = ?self.working_dir, encoding = self.encoding.name()))]
    pub fn execute_args(&self, args: &[String]) -> Result<CommandOutput, ShellError> {
        let (program, rest) = args.split_first().ok_or(ShellError::EmptyCommand)?;
        if program.trim().is_empty() {
            return Err(ShellError::EmptyCommand);
        }

        let mut command = Command::new(program);
        command.args(rest);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ShellError::Spawn {
            program: program.clone(),
            source,
        })?;
        debug!(status = %output.status, "command finished");

        Ok(CommandOutput {
            status: output.status,
            stdout: split_lines(self.encoding, &output.stdout),
            stderr: split_lines(self.encoding, &output.stderr),
        })
    }
}

fn split_lines(encoding: &'static Encoding, bytes: &[u8]) -> Vec<String> {
    let (text, _, _) = encoding.decode(bytes);
    text.lines()
        .map(str::to_owned)
        .collect()
}
