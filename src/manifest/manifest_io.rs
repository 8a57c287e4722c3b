//! Reading and writing build manifests.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::Build;
use crate::core::GojoError;
use crate::utils::fs::{read_text_file, write_text_file};

impl Build {
    /// Decodes a manifest from YAML text.
    pub fn decode(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Encodes the manifest as YAML. Non-persisted paths are left out.
    pub fn encode(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize build file")
    }

    /// Loads a manifest, runs [`Build::validate_pre_process`] and records
    /// where it came from.
    ///
    /// # Errors
    ///
    /// - [`GojoError::ManifestNotFound`] when `path` does not exist
    /// - [`GojoError::ManifestParseError`] when the YAML does not match the schema
    /// - [`GojoError::ValidationError`] when a pre-resolution invariant fails
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GojoError::ManifestNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = read_text_file(path)?;
        let mut build = Self::decode(&content).map_err(|e| GojoError::ManifestParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        build
            .validate_pre_process()
            .with_context(|| format!("Invalid build file: {}", path.display()))?;

        build.context_dir = Some(
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
        );
        build.build_file_path = Some(path.to_path_buf());

        debug!(
            "Loaded build file {} ({} facts, {} sources)",
            path.display(),
            build.spec.facts.len(),
            build.spec.sources.len()
        );

        Ok(build)
    }

    /// Writes the manifest to `path`, replacing the file atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.encode()?;
        write_text_file(path, &content)
            .with_context(|| format!("Failed to write build file: {}", path.display()))
    }
}
