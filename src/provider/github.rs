//! GitHub releases and tags provider.
//!
//! Lists the first page (30 entries, API order) of either the releases or
//! the tags of a repository and partitions them into stable and unstable
//! versions:
//!
//! - releases: `prerelease` (or `draft`) entries are unstable
//! - tags: names that do not parse as semver after stripping a leading `v`,
//!   or that carry a pre-release part, are unstable
//!
//! The latest version is the first stable entry, or, when a semver range is
//! given, the first stable entry whose version satisfies it. The raw tag name
//! is returned; the `v` prefix is stripped later for `version` facts.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::VersionProvider;
use crate::constants::GITHUB_PAGE_SIZE;
use crate::core::GojoError;
use crate::manifest::{GitHubObject, GitHubSource, SemverRange};
use crate::utils::sanitize_version;

/// Lists versions of one GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    owner: String,
    repository: String,
    object: GitHubObject,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Upstream versions split by stability, each list in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Versions {
    pub stable: Vec<String>,
    pub unstable: Vec<String>,
}

impl Versions {
    fn partition_releases(releases: Vec<Release>) -> Self {
        let mut versions = Self::default();
        for release in releases {
            if release.prerelease || release.draft {
                versions.unstable.push(release.tag_name);
            } else {
                versions.stable.push(release.tag_name);
            }
        }
        versions
    }

    /// Splits tag names on semver stability.
    pub fn partition_tags<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut versions = Self::default();
        for name in names {
            let name = name.into();
            match semver::Version::parse(sanitize_version(&name)) {
                Ok(version) if version.pre.is_empty() => versions.stable.push(name),
                Ok(_) => versions.unstable.push(name),
                Err(e) => {
                    warn!(target: "provider::github", "Parsing tag name '{}' failed: {}", name, e);
                    versions.unstable.push(name);
                }
            }
        }
        versions
    }

    /// First stable version, or the first one satisfying `range`.
    ///
    /// With a range, stable entries that are not valid semver are skipped.
    ///
    /// # Errors
    ///
    /// [`GojoError::NotFound`] when no stable entry qualifies.
    pub fn select_latest(&self, range: Option<&SemverRange>) -> Result<String, GojoError> {
        let selected = match range {
            None => self.stable.first(),
            Some(range) => self.stable.iter().find(|name| {
                semver::Version::parse(sanitize_version(name))
                    .map(|version| range.matches(&version))
                    .unwrap_or(false)
            }),
        };

        selected.cloned().ok_or_else(|| GojoError::NotFound {
            what: match range {
                None => "no stable version found".to_string(),
                Some(range) => format!("no stable version found matching '{range}'"),
            },
        })
    }
}

impl GitHubProvider {
    pub fn new(client: reqwest::Client, source: &GitHubSource, api_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            owner: source.owner.clone(),
            repository: source.repository.clone(),
            object: source.object,
        }
    }

    /// Endpoint listing the configured object kind.
    #[must_use]
    pub fn list_url(&self) -> String {
        let collection = match self.object {
            GitHubObject::Release => "releases",
            GitHubObject::Tag => "tags",
        };
        format!("{}/repos/{}/{}/{}", self.api_url, self.owner, self.repository, collection)
    }

    async fn fetch<T>(&self) -> Result<Vec<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.list_url();
        debug!(target: "provider::github", "Listing {}", url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", GITHUB_PAGE_SIZE)])
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let fetch_error = |reason: String| GojoError::FetchError {
            url: url.clone(),
            reason,
        };

        let response = request.send().await.map_err(|e| fetch_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fetch_error(format!("HTTP {status}: {}", body.trim())).into());
        }

        let items = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| fetch_error(format!("invalid response body: {e}")))?;
        Ok(items)
    }

    /// Fetches and partitions the first page of releases or tags.
    pub async fn versions(&self) -> Result<Versions> {
        let versions = match self.object {
            GitHubObject::Release => Versions::partition_releases(self.fetch::<Release>().await?),
            GitHubObject::Tag => {
                let tags = self.fetch::<Tag>().await?;
                Versions::partition_tags(tags.into_iter().map(|tag| tag.name))
            }
        };

        info!(
            target: "provider::github",
            "{}/{}: {} stable version(s) [{}]",
            self.owner, self.repository, versions.stable.len(), versions.stable.join(",")
        );
        info!(
            target: "provider::github",
            "{}/{}: {} unstable version(s) [{}]",
            self.owner, self.repository, versions.unstable.len(), versions.unstable.join(",")
        );

        Ok(versions)
    }
}

impl VersionProvider for GitHubProvider {
    fn kind(&self) -> &'static str {
        "github"
    }

    async fn get_latest(&self, range: Option<&SemverRange>) -> Result<String> {
        info!(
            target: "provider::github",
            "Getting latest {} of {}/{}", self.object, self.owner, self.repository
        );
        let versions = self.versions().await?;
        Ok(versions.select_latest(range)?)
    }
}
