//! Git operations on the repository holding the images.
//!
//! gojo shells out to the system `git` binary through
//! [`command_builder::GitCommand`]. Two features depend on it:
//!
//! - tag computation reads the HEAD commit for the `gitCommit` fact
//! - the `commit` command stages, commits and pushes an updated build file
//!
//! Paths handed to [`GitRepo`] may be any directory inside a work tree; git
//! discovers the repository root itself.

pub mod command_builder;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::{GIT_PUSH_TIMEOUT, GIT_SHORT_HASH_LEN};
use crate::core::GojoError;
use command_builder::GitCommand;

/// A directory inside a git work tree.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full hash of the HEAD commit.
    pub async fn head_commit(&self) -> Result<String> {
        GitCommand::rev_parse_head()
            .current_dir(&self.path)
            .with_context("head")
            .execute_stdout()
            .await
    }

    /// First [`GIT_SHORT_HASH_LEN`] characters of the HEAD commit hash.
    pub async fn short_commit(&self) -> Result<String> {
        let head = self.head_commit().await?;
        let short = head.get(..GIT_SHORT_HASH_LEN).ok_or_else(|| GojoError::GitError {
            operation: "rev-parse".to_string(),
            reason: format!("unexpected HEAD hash: '{head}'"),
        })?;
        Ok(short.to_string())
    }

    /// Whether `file` differs from HEAD in the index or work tree,
    /// untracked files included.
    pub async fn file_changed(&self, file: &Path) -> Result<bool> {
        let status = GitCommand::status_porcelain(&file.display().to_string())
            .current_dir(&self.path)
            .execute_stdout()
            .await?;
        Ok(!status.is_empty())
    }

    pub async fn add(&self, file: &Path) -> Result<()> {
        GitCommand::add(&file.display().to_string()).current_dir(&self.path).execute_success().await
    }

    /// Commits staged changes with `author` formatted as `Name <email>`.
    pub async fn commit(&self, message: &str, author: Option<&str>) -> Result<()> {
        GitCommand::commit(message, author).current_dir(&self.path).execute_success().await
    }

    /// Pushes the current branch to its upstream.
    pub async fn push(&self) -> Result<()> {
        GitCommand::push()
            .current_dir(&self.path)
            .with_timeout(Some(GIT_PUSH_TIMEOUT))
            .with_context("push")
            .execute_success()
            .await
    }
}
