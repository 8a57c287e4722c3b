//! gojo - container image build orchestrator
//!
//! gojo keeps one directory per container image. Each directory holds a
//! `.build.yaml` build file describing the image, its base images and the
//! facts its tag is made of, next to the `Containerfile` that builds it.
//!
//! # Workflow
//!
//! 1. **Resolve facts**: values such as `VERSION` come from a source, either
//!    an Alpine package index or the releases and tags of a GitHub repository
//! 2. **Compute the tag**: the `tagFormat` template is rendered over the
//!    facts plus the implicit `date` and `gitCommit` values
//! 3. **Build**: podman, buildah, BuildKit or kaniko build the image with one
//!    build argument per exported fact and base image
//! 4. **Commit**: the updated build file is committed and pushed
//!
//! # Build file
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
//! # Modules
//!
//! - [`cli`] - command-line interface
//! - [`core`] - error types and user-facing error formatting
//! - [`manifest`] - build file model, loading and validation
//! - [`provider`] - Alpine and GitHub version providers
//! - [`facts`] - fact resolution against providers
//! - [`templating`] - tag templates and Containerfile scaffolding
//! - [`manager`] - builder tool integrations
//! - [`git`] - git operations through the system `git` binary
//! - [`utils`] - path, file and image-name helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod facts;
pub mod git;
pub mod manager;
pub mod manifest;
pub mod provider;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
