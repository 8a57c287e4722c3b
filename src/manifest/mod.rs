//! Build manifest model.
//!
//! Every image directory holds a YAML build file (`.build.yaml` by default)
//! describing the image to produce, its base images, and the facts that feed
//! its build arguments and tag:
//!
//! ```yaml
//! image:
//!   registry: registry.example.com/project
//!   name: nginx
//!   tag: 1.18.0-r1
//! spec:
//!   fromImages:
//!     - registry: docker.io/library
//!       name: alpine
//!       tag: "3.13"
//!   buildArgs:
//!     - VERSION
//!   tagFormat: "{{ .VERSION }}"
//!   facts:
//!     - name: VERSION
//!       value: 1.18.0-r1
//!       source: alpine
//!       kind: version
//!   sources:
//!     - name: alpine
//!       alpine:
//!         package: nginx
//!         repository: main
//!         versionId: "3.13"
//! ```
//!
//! The model is decoded at the start of a command, mutated in place while
//! facts are resolved and the tag is computed, then written back whole.
//!
//! # Modules
//!
//! - `manifest_io` - decoding, encoding, loading and writing
//! - `manifest_validation` - [`Build::validate_pre_process`] and [`Build::validate`]
//! - [`semver_range`] - the range grammar accepted in `Fact.semver`

mod manifest_io;
mod manifest_validation;
pub mod semver_range;


use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{ALPINE_DEFAULT_ARCH, ALPINE_DEFAULT_MIRROR, FROM_IMAGE_ARG};
use crate::core::GojoError;
use crate::utils::parse_fqin;

pub use semver_range::SemverRange;

/// Top-level manifest: the image being built and its build specification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Build {
    /// Identity of the image this manifest produces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,

    /// Base images, build arguments, facts and sources.
    #[serde(default)]
    pub spec: ImageSpec,

    /// Directory holding the build file; the build context. Not persisted.
    #[serde(skip)]
    pub context_dir: Option<PathBuf>,

    /// Path the manifest was loaded from. Not persisted.
    #[serde(skip)]
    pub build_file_path: Option<PathBuf>,
}

/// Identity of a container image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image {
    /// Registry host and path, may be empty.
    #[serde(default)]
    pub registry: String,
    /// Image name, the last path component.
    pub name: String,
    /// Image tag, recomputed on every `facts get`.
    #[serde(default)]
    pub tag: String,
}

/// The `spec` section of a build manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    #[serde(default)]
    pub from_images: Vec<FromImage>,

    /// Fact names exported as build arguments, in order.
    #[serde(default)]
    pub build_args: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag_format: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

/// A base image, optionally bound to a multi-stage build target.
///
/// In YAML the image fields sit inline next to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FromImageFields", into = "FromImageFields")]
pub struct FromImage {
    pub image: Image,
    pub target: Option<String>,
}

/// Wire form of [`FromImage`]. Declared field by field rather than flattened
/// so plain scalars such as `tag: 3.13` decode as strings.
#[derive(Serialize, Deserialize)]
struct FromImageFields {
    #[serde(default)]
    registry: String,
    name: String,
    #[serde(default)]
    tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

impl From<FromImageFields> for FromImage {
    fn from(fields: FromImageFields) -> Self {
        Self::new(Image::new(fields.registry, fields.name, fields.tag), fields.target)
    }
}

impl From<FromImage> for FromImageFields {
    fn from(from: FromImage) -> Self {
        Self {
            registry: from.image.registry,
            name: from.image.name,
            tag: from.image.tag,
            target: from.target,
        }
    }
}

/// Discriminates how a fact value is post-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FactKind {
    /// A version; a leading `v` is stripped after resolution.
    #[serde(rename = "version")]
    Version,
    /// An opaque string.
    #[default]
    #[serde(rename = "string")]
    Text,
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version => write!(f, "version"),
            Self::Text => write!(f, "string"),
        }
    }
}

/// A named value substituted into build arguments and the tag template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,

    /// Empty until resolved, unless the fact is static.
    #[serde(default)]
    pub value: String,

    /// Name of the [`Source`] resolving this fact. `None` means static.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default)]
    pub kind: FactKind,

    /// Range constraint, only meaningful for [`FactKind::Version`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver: Option<String>,
}

/// A named binding to exactly one provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpine: Option<AlpineSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubSource>,
}

/// Borrowed view of the single provider configured on a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceProvider<'a> {
    Alpine(&'a AlpineSource),
    GitHub(&'a GitHubSource),
}

/// Alpine repository package lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlpineSource {
    pub package: String,
    pub repository: String,
    /// Alpine release branch without the `v`, e.g. `3.13`.
    pub version_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
}

/// GitHub repository release or tag lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GitHubSource {
    pub owner: String,
    pub repository: String,
    #[serde(default)]
    pub object: GitHubObject,
}

/// Which GitHub object list a [`GitHubSource`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitHubObject {
    #[default]
    Release,
    Tag,
}

impl fmt::Display for GitHubObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release => write!(f, "release"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

impl Image {
    pub fn new(registry: impl Into<String>, name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Parses a fully-qualified image name such as `registry.fqdn/project/name:tag`.
    pub fn from_fqin(fqin: &str) -> Result<Self> {
        let (registry, name, tag) = parse_fqin(fqin)?;
        Ok(Self::new(registry, name, tag))
    }

    /// Full reference `registry/name:tag`.
    #[must_use]
    pub fn reference(&self) -> String {
        self.reference_with_tag(&self.tag)
    }

    /// Full reference with `tag` in place of the current tag.
    #[must_use]
    pub fn reference_with_tag(&self, tag: &str) -> String {
        if self.registry.is_empty() {
            format!("{}:{}", self.name, tag)
        } else {
            format!("{}/{}:{}", self.registry, self.name, tag)
        }
    }

    #[must_use]
    pub fn reference_latest(&self) -> String {
        self.reference_with_tag("latest")
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

impl FromImage {
    #[must_use]
    pub const fn new(image: Image, target: Option<String>) -> Self {
        Self {
            image,
            target,
        }
    }

    /// Build argument name carrying this base image:
    /// `FROM_IMAGE`, or `FROM_IMAGE_<TARGET>` for targeted images.
    #[must_use]
    pub fn build_arg_name(&self) -> String {
        match self.target.as_deref().filter(|t| !t.is_empty()) {
            Some(target) => format!("{FROM_IMAGE_ARG}_{}", target.to_uppercase()),
            None => FROM_IMAGE_ARG.to_string(),
        }
    }
}

impl Fact {
    pub fn new(name: impl Into<String>, source: Option<String>, kind: FactKind) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            source,
            kind,
            semver: None,
        }
    }

    /// Source name, treating an empty string as unset.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }

    /// Semver range text, treating an empty string as unset.
    #[must_use]
    pub fn semver_range(&self) -> Option<&str> {
        self.semver.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl Source {
    pub fn alpine(
        name: impl Into<String>,
        package: impl Into<String>,
        repository: impl Into<String>,
        version_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alpine: Some(AlpineSource {
                package: package.into(),
                repository: repository.into(),
                version_id: version_id.into(),
                arch: None,
                mirror: None,
            }),
            github: None,
        }
    }

    pub fn github(name: impl Into<String>, owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alpine: None,
            github: Some(GitHubSource {
                owner: owner.into(),
                repository: repository.into(),
                object: GitHubObject::Release,
            }),
        }
    }

    /// Number of provider keys set on this source.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        usize::from(self.alpine.is_some()) + usize::from(self.github.is_some())
    }

    /// The single provider configured on this source.
    ///
    /// # Errors
    ///
    /// [`GojoError::ProviderTypeError`] when no provider is set, and
    /// [`GojoError::ValidationError`] when more than one is.
    pub fn provider(&self) -> Result<SourceProvider<'_>, GojoError> {
        match (&self.alpine, &self.github) {
            (Some(alpine), None) => Ok(SourceProvider::Alpine(alpine)),
            (None, Some(github)) => Ok(SourceProvider::GitHub(github)),
            (None, None) => Err(GojoError::ProviderTypeError {
                source_name: self.name.clone(),
            }),
            (Some(_), Some(_)) => Err(GojoError::validation(format!(
                "source '{}' defines more than one provider",
                self.name
            ))),
        }
    }
}

impl AlpineSource {
    /// Mirror base URL, defaulting to the public Alpine CDN.
    #[must_use]
    pub fn mirror_or_default(&self) -> &str {
        self.mirror.as_deref().filter(|m| !m.is_empty()).unwrap_or(ALPINE_DEFAULT_MIRROR)
    }

    /// Architecture, defaulting to `x86_64`.
    #[must_use]
    pub fn arch_or_default(&self) -> &str {
        self.arch.as_deref().filter(|a| !a.is_empty()).unwrap_or(ALPINE_DEFAULT_ARCH)
    }
}

impl Build {
    /// Creates a manifest for `image_fqin` built on top of `from_image_fqin`.
    pub fn new(image_fqin: &str, from_image_fqin: &str) -> Result<Self> {
        let image = Image::from_fqin(image_fqin)?;
        let from_image = Image::from_fqin(from_image_fqin)?;

        Ok(Self {
            image: Some(image),
            spec: ImageSpec {
                from_images: vec![FromImage::new(from_image, None)],
                ..ImageSpec::default()
            },
            ..Self::default()
        })
    }

    /// The image identity, failing when the manifest has none.
    pub fn image(&self) -> Result<&Image, GojoError> {
        self.image.as_ref().ok_or_else(|| GojoError::validation("image definition missing"))
    }

    pub fn image_mut(&mut self) -> Result<&mut Image, GojoError> {
        self.image.as_mut().ok_or_else(|| GojoError::validation("image definition missing"))
    }

    /// Looks up a source by name.
    #[must_use]
    pub fn find_source(&self, name: &str) -> Option<&Source> {
        self.spec.sources.iter().find(|s| s.name == name)
    }

    /// Looks up a fact by name.
    #[must_use]
    pub fn find_fact(&self, name: &str) -> Option<&Fact> {
        self.spec.facts.iter().find(|f| f.name == name)
    }

    /// Build arguments handed to a builder, sorted by name.
    ///
    /// Every `buildArgs` entry naming a fact maps to that fact's value, and
    /// every base image contributes `FROM_IMAGE` or `FROM_IMAGE_<TARGET>`
    /// with its full reference.
    #[must_use]
    pub fn build_args(&self) -> BTreeMap<String, String> {
        let mut args = BTreeMap::new();

        for arg in &self.spec.build_args {
            if let Some(fact) = self.find_fact(arg) {
                args.insert(fact.name.clone(), fact.value.clone());
            }
        }

        for from_image in &self.spec.from_images {
            args.insert(from_image.build_arg_name(), from_image.image.reference());
        }

        args
    }
}
