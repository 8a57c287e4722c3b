//! Version providers.
//!
//! A provider answers one question for a [`Source`]: what is the latest
//! version available upstream? Two backends exist:
//!
//! - [`AlpineProvider`] - reads the `APKINDEX.tar.gz` of an Alpine repository
//! - [`GitHubProvider`] - lists the releases or tags of a GitHub repository
//!
//! Providers are created per source at resolution time by
//! [`Provider::from_source`], which dispatches on the single provider key
//! configured on the source and applies Alpine defaults. They are stateless
//! beyond their configuration; nothing is cached between runs.
//!
//! # Configuration
//!
//! Process-level settings (GitHub token and API endpoint) are collected by the
//! CLI into [`ProviderOptions`] and passed in explicitly.

pub mod alpine;
pub mod github;

use anyhow::{Context, Result};
use std::future::Future;

use crate::constants::GITHUB_DEFAULT_API_URL;
use crate::manifest::{SemverRange, Source, SourceProvider};

pub use alpine::{AlpineProvider, ApkPackage, extract_index, parse_apk_index};
pub use github::{GitHubProvider, Versions};

/// Settings shared by every provider created during a run.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Optional token; raises GitHub API rate limits when set.
    pub github_token: Option<String>,
    /// GitHub REST API base URL.
    pub github_api_url: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: GITHUB_DEFAULT_API_URL.to_string(),
        }
    }
}

impl ProviderOptions {
    #[must_use]
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }
}

/// Capability shared by every backend: find the latest version upstream.
pub trait VersionProvider {
    /// Short backend name used in logs.
    fn kind(&self) -> &'static str;

    /// Returns the latest version, optionally constrained by `range`.
    ///
    /// The raw upstream string is returned; stripping a `v` prefix is left
    /// to the caller.
    fn get_latest(&self, range: Option<&SemverRange>) -> impl Future<Output = Result<String>> + Send;
}

/// A provider instantiated for one source.
#[derive(Debug, Clone)]
pub enum Provider {
    Alpine(AlpineProvider),
    GitHub(GitHubProvider),
}

impl Provider {
    /// Builds the provider configured on `source`.
    ///
    /// # Errors
    ///
    /// [`crate::core::GojoError::ProviderTypeError`] when the source has no
    /// provider key, or an error when the HTTP client cannot be built.
    pub fn from_source(source: &Source, options: &ProviderOptions) -> Result<Self> {
        let client = http_client()?;

        match source.provider()? {
            SourceProvider::Alpine(config) => Ok(Self::Alpine(AlpineProvider::new(client, config))),
            SourceProvider::GitHub(config) => Ok(Self::GitHub(GitHubProvider::new(
                client,
                config,
                &options.github_api_url,
                options.github_token.clone(),
            ))),
        }
    }
}

impl VersionProvider for Provider {
    fn kind(&self) -> &'static str {
        match self {
            Self::Alpine(p) => p.kind(),
            Self::GitHub(p) => p.kind(),
        }
    }

    async fn get_latest(&self, range: Option<&SemverRange>) -> Result<String> {
        match self {
            Self::Alpine(p) => p.get_latest(range).await,
            Self::GitHub(p) => p.get_latest(range).await,
        }
    }
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("gojo/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
