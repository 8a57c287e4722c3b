//! Git test helper utilities
//!
//! A thin wrapper around the git CLI for creating throwaway repositories.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn init(&self) -> Result<()> {
        self.run_git_command(&["init"], "Failed to initialize git repository")?;
        Ok(())
    }

    pub fn init_bare(&self) -> Result<()> {
        self.run_git_command(&["init", "--bare"], "Failed to initialize bare git repository")?;
        Ok(())
    }

    pub fn config_user(&self) -> Result<()> {
        self.run_git_command(
            &["config", "user.email", "test@gojo.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(&["config", "user.name", "Test User"], "Failed to configure git user name")?;
        Ok(())
    }

    pub fn add_all(&self) -> Result<()> {
        self.run_git_command(&["add", "."], "Failed to add files to git")?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run_git_command(&["commit", "--allow-empty", "-m", message], "Failed to create git commit")?;
        Ok(())
    }

    /// `git init`, user config, and an initial commit of whatever is present.
    pub fn init_with_commit(&self) -> Result<()> {
        self.init()?;
        self.config_user()?;
        self.add_all()?;
        self.commit("Initial commit")
    }

    pub fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        self.run_git_command(&["remote", "add", name, url], &format!("Failed to add remote: {name}"))?;
        Ok(())
    }

    pub fn push_upstream(&self, remote: &str) -> Result<()> {
        self.run_git_command(&["push", "-u", remote, "HEAD"], "Failed to push to remote")?;
        Ok(())
    }

    pub fn rev_parse_head(&self) -> Result<String> {
        let output = self.run_git_command(&["rev-parse", "HEAD"], "Failed to get current commit SHA")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn commit_count(&self) -> Result<usize> {
        let output = self.run_git_command(&["rev-list", "--count", "HEAD"], "Failed to count commits")?;
        String::from_utf8_lossy(&output.stdout).trim().parse().context("Failed to parse commit count")
    }

    pub fn last_commit_message(&self) -> Result<String> {
        let output = self.run_git_command(&["log", "-1", "--format=%s"], "Failed to read last commit")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn status_porcelain(&self) -> Result<String> {
        let output = self.run_git_command(&["status", "--porcelain"], "Failed to get git status")?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
