//! Fact resolution.
//!
//! Facts bound to a source get their value from that source's provider;
//! facts without a source are static and kept as written. Resolution runs
//! sequentially in declaration order, one provider request per sourced fact.
//!
//! Once the pass completes every fact must hold a value. An empty value is
//! reported as [`GojoError::UnresolvedFact`] and the caller is expected to
//! abort without writing the manifest back.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::GojoError;
use crate::manifest::{Build, FactKind, SemverRange};
use crate::provider::{Provider, ProviderOptions, VersionProvider};
use crate::utils::sanitize_version;

/// Populates fact values from their configured sources.
#[derive(Debug, Clone, Default)]
pub struct FactResolver {
    options: ProviderOptions,
}

impl FactResolver {
    pub fn new(options: ProviderOptions) -> Self {
        Self {
            options,
        }
    }

    /// Resolves every sourced fact of `build` in place.
    ///
    /// The manifest is expected to have passed
    /// [`Build::validate_pre_process`]; a fact naming an unknown source is
    /// still reported as a validation error.
    ///
    /// # Errors
    ///
    /// Provider failures are returned as-is with the fact name as context.
    /// A fact left without a value yields [`GojoError::UnresolvedFact`].
    pub async fn resolve(&self, build: &mut Build) -> Result<()> {
        for index in 0..build.spec.facts.len() {
            let fact = &build.spec.facts[index];
            let Some(source_name) = fact.source_name() else {
                debug!("Fact '{}' is static", fact.name);
                continue;
            };

            let fact_name = fact.name.clone();
            let kind = fact.kind;
            let range = fact.semver_range().map(SemverRange::parse).transpose()?;

            let source = build.find_source(source_name).ok_or_else(|| {
                GojoError::validation(format!("source not found: {source_name} (referenced by fact {fact_name})"))
            })?;
            let provider = Provider::from_source(source, &self.options)?;

            info!("Resolving fact '{}' from {} source '{}'", fact_name, provider.kind(), source.name);
            let latest = provider
                .get_latest(range.as_ref())
                .await
                .with_context(|| format!("Failed to resolve fact '{fact_name}'"))?;

            let value = match kind {
                FactKind::Version => sanitize_version(&latest).to_string(),
                FactKind::Text => latest,
            };
            debug!("Fact '{}' resolved to '{}'", fact_name, value);
            build.spec.facts[index].value = value;
        }

        ensure_resolved(build)
    }
}

/// Fails on the first fact without a value.
pub fn ensure_resolved(build: &Build) -> Result<()> {
    if let Some(fact) = build.spec.facts.iter().find(|f| f.value.is_empty()) {
        return Err(GojoError::UnresolvedFact {
            name: fact.name.clone(),
        }
        .into());
    }
    Ok(())
}
