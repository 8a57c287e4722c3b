//! Tag computation and scaffold templates.
//!
//! An image tag is rendered from the manifest's `tagFormat` over a map of
//! values:
//!
//! - every declared fact, keyed by its name
//! - `date`: the current local time as `YYYYMMDDHHMMSS`
//! - `gitCommit`: the first 8 hex characters of the HEAD commit of the
//!   repository holding the build file
//!
//! Templates may use Go-style references (`{{ .VERSION }}`) or plain Tera
//! variables (`{{ VERSION }}`). Rendering is strict: an unknown key fails
//! instead of producing an empty segment.
//!
//! ```rust,ignore
//! use gojo::templating::{ImplicitFacts, render_tag};
//!
//! let implicit = ImplicitFacts::new("20210301120000", "0123abcd");
//! let tag = render_tag(&build.spec.facts, "{{ .VERSION }}-{{ .gitCommit }}", &implicit)?;
//! assert_eq!(tag, "1.18.0-r1-0123abcd");
//! ```

pub mod containerfile;
pub mod renderer;

use anyhow::Result;
use chrono::Local;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::constants::{DATE_FACT_FORMAT, DATE_FACT_NAME, GIT_COMMIT_FACT_NAME};
use crate::core::GojoError;
use crate::git::GitRepo;
use crate::manifest::{Build, Fact};

pub use containerfile::render_containerfile;
pub use renderer::{normalize_template, render_strict};

/// Values every tag template can reference without declaring them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitFacts {
    pub date: String,
    pub git_commit: String,
}

impl ImplicitFacts {
    pub fn new(date: impl Into<String>, git_commit: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            git_commit: git_commit.into(),
        }
    }

    /// Reads the clock and the HEAD commit of the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// [`GojoError::GitError`] when `dir` is not inside a git work tree with
    /// at least one commit.
    pub async fn collect(dir: &Path) -> Result<Self> {
        let date = Local::now().format(DATE_FACT_FORMAT).to_string();
        let git_commit = GitRepo::new(dir).short_commit().await?;
        debug!("Implicit facts: date={}, gitCommit={}", date, git_commit);

        Ok(Self {
            date,
            git_commit,
        })
    }
}

/// Renders `format` over `facts` and `implicit`.
///
/// # Errors
///
/// [`GojoError::ValidationError`] for an empty format, and
/// [`GojoError::TemplateError`] for syntax errors or unknown keys.
pub fn render_tag(facts: &[Fact], format: &str, implicit: &ImplicitFacts) -> Result<String, GojoError> {
    if format.trim().is_empty() {
        return Err(GojoError::validation("tagFormat is empty"));
    }

    let mut values: BTreeMap<String, String> =
        facts.iter().map(|fact| (fact.name.clone(), fact.value.clone())).collect();
    values.insert(DATE_FACT_NAME.to_string(), implicit.date.clone());
    values.insert(GIT_COMMIT_FACT_NAME.to_string(), implicit.git_commit.clone());

    render_strict(format, &values)
}

/// Computes the tag of `build`, reading implicit facts from its context
/// directory.
///
/// The build is not modified; callers assign the result to the image tag.
pub async fn compute_tag(build: &Build) -> Result<String> {
    if build.spec.tag_format.trim().is_empty() {
        return Err(GojoError::validation("tagFormat is empty").into());
    }

    let dir = build.context_dir.as_deref().unwrap_or_else(|| Path::new("."));
    let implicit = ImplicitFacts::collect(dir).await?;
    let tag = render_tag(&build.spec.facts, &build.spec.tag_format, &implicit)?;
    debug!("Computed tag '{}' from '{}'", tag, build.spec.tag_format);

    Ok(tag)
}
