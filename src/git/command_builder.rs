//! Builder for git invocations.
//!
//! Every git call goes through [`GitCommand`] so that working directory
//! handling, timeouts, logging and error mapping stay uniform.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::GIT_LOCAL_TIMEOUT;
use crate::core::GojoError;
use crate::utils::get_git_command;

/// Fluent builder for a single git process.
///
/// ```rust,ignore
/// use gojo::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let head = GitCommand::rev_parse_head()
///     .current_dir("/path/to/images/nginx")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// New commands capture output and time out after
/// [`GIT_LOCAL_TIMEOUT`].
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Option<Duration>,
    context: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            timeout_duration: Some(GIT_LOCAL_TIMEOUT),
            context: None,
        }
    }
}

impl GitCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git in `dir` (passed as `-C dir`).
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Overrides the timeout; `None` waits indefinitely.
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label prefixed to log lines for this invocation.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// First git argument, used to name the operation in errors.
    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Runs the command and captures its output.
    ///
    /// # Errors
    ///
    /// [`GojoError::GitError`] when git exits unsuccessfully or times out;
    /// an I/O error when git cannot be spawned.
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let git_command = get_git_command();
        let operation = self.operation();

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match self.context {
            Some(ref ctx) => {
                tracing::debug!(target: "git", "({}) Executing command: {} {}", ctx, git_command, full_args.join(" "));
            }
            None => tracing::debug!(target: "git", "Executing command: {} {}", git_command, full_args.join(" ")),
        }

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => result.with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?,
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "Command timed out after {} seconds: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(GojoError::GitError {
                        operation,
                        reason: format!("timed out after {} seconds", duration.as_secs()),
                    }
                    .into());
                }
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(target: "git", "Command failed with exit code: {:?}", output.status.code());
            let reason = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(GojoError::GitError {
                operation,
                reason,
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "git", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{}", stderr.trim());
        }

        Ok(GitCommandOutput {
            stdout,
        })
    }

    /// Runs the command and returns trimmed stdout.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Runs the command, discarding its output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Captured stdout of a successful git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommandOutput {
    pub stdout: String,
}

// Builders for the operations gojo needs

impl GitCommand {
    pub fn rev_parse_head() -> Self {
        Self::new().args(["rev-parse", "HEAD"])
    }

    /// Porcelain status limited to one path.
    pub fn status_porcelain(pathspec: &str) -> Self {
        Self::new().args(["status", "--porcelain", "--", pathspec])
    }

    pub fn add(pathspec: &str) -> Self {
        Self::new().args(["add", "--", pathspec])
    }

    /// `git commit` of the staged changes, optionally with an explicit author.
    pub fn commit(message: &str, author: Option<&str>) -> Self {
        let cmd = Self::new().args(["commit", "-m", message]);
        match author {
            Some(author) => cmd.arg(format!("--author={author}")),
            None => cmd,
        }
    }

    pub fn push() -> Self {
        Self::new().arg("push")
    }
}
