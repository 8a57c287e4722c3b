//! Common helpers for gojo integration tests
//!
//! Each test gets a throwaway images directory that is also a git work tree,
//! so `gitCommit` can be resolved during tag computation.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use gojo::test_utils::{BuildFixture, TestGit};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// An images directory inside a fresh git repository.
pub struct TestProject {
    _temp_dir: TempDir,
    images_dir: PathBuf,
    git: TestGit,
}

impl TestProject {
    /// Creates the directory and an initial commit.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let images_dir = temp_dir.path().join("images");
        fs::create_dir_all(&images_dir)?;

        let git = TestGit::new(&images_dir);
        git.init_with_commit()?;

        Ok(Self {
            _temp_dir: temp_dir,
            images_dir,
            git,
        })
    }

    pub fn images_path(&self) -> &Path {
        &self.images_dir
    }

    pub fn image_path(&self, image: &str) -> PathBuf {
        self.images_dir.join(image)
    }

    pub fn build_file(&self, image: &str) -> PathBuf {
        self.image_path(image).join(".build.yaml")
    }

    pub fn git(&self) -> &TestGit {
        &self.git
    }

    /// Writes `fixture` as the build file of `image`.
    pub fn write_build(&self, image: &str, fixture: &BuildFixture) -> Result<PathBuf> {
        fixture.write_to(&self.image_path(image))
    }

    /// Commits everything in the images directory.
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.git.add_all()?;
        self.git.commit(message)
    }

    pub fn read_build(&self, image: &str) -> Result<String> {
        let path = self.build_file(image);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Runs the gojo binary against this images directory.
    pub fn run_gojo(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run_gojo_with_env(args, &[])
    }

    pub fn run_gojo_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
        let gojo_binary = env!("CARGO_BIN_EXE_gojo");
        let mut command = Command::new(gojo_binary);
        command
            .args(args)
            .current_dir(&self.images_dir)
            .env("GOJO_IMAGES_DIR", &self.images_dir)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("GITHUB_TOKEN")
            .env_remove("GOJO_GITHUB_API_URL");
        for (key, value) in env {
            command.env(key, value);
        }

        let output = command.output().context("Failed to run gojo command")?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Captured output of one gojo invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
