//! External process execution for builder tools.

use anyhow::Result;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use crate::core::GojoError;

/// One invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTask {
    pub program: String,
    pub args: Vec<String>,
}

impl ExecTask {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
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

    /// Appends `flag value` when `value` is set and non-empty.
    pub fn opt_flag(self, flag: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.arg(flag).arg(value),
            None => self,
        }
    }

    /// Runs the program with inherited stdio and waits for it.
    ///
    /// With `dry_run` the command line is only logged.
    ///
    /// # Errors
    ///
    /// [`GojoError::CommandError`] when the program cannot be started or
    /// exits unsuccessfully.
    pub async fn execute(&self, dry_run: bool) -> Result<()> {
        if dry_run {
            info!("[dry-run] {}", self);
            return Ok(());
        }

        info!("Running {}", self);
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| GojoError::CommandError {
                command: self.to_string(),
                reason: format!("failed to start: {e}"),
            })?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            };
            return Err(GojoError::CommandError {
                command: self.to_string(),
                reason,
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ExecTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
