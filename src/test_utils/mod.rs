//! Test utilities for gojo
//!
//! Helpers shared by unit tests and the integration suite (through the
//! `test-utils` feature):
//! - one-time tracing setup for tests
//! - build file and APKINDEX fixtures
//! - a small git wrapper to create throwaway repositories
//!
//! # Example
//!
//! ```rust,no_run
//! use gojo::test_utils::{BuildFixture, TestGit, init_test_logging};
//!
//! init_test_logging(None);
//! let temp = tempfile::tempdir().unwrap();
//! let git = TestGit::new(temp.path());
//! git.init_with_commit().unwrap();
//! BuildFixture::alpine("http://127.0.0.1:8080").write_to(temp.path()).unwrap();
//! ```

pub mod fixtures;
pub mod git_helper;

pub use fixtures::{ApkIndexFixture, BuildFixture, apk_index_archive};
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither, logging stays off.
///
/// ```bash
/// RUST_LOG=gojo=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
