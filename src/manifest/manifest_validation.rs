//! Validation of build manifests.
//!
//! Validation runs in two phases:
//! - [`Build::validate_pre_process`] checks structure and references, and is
//!   safe before facts have values. It runs on every load and before
//!   resolution.
//! - [`Build::validate`] additionally requires every fact value, and runs
//!   before a build is handed to a builder.
//!
//! Checks fail fast in a fixed order; the first violation is returned as a
//! [`GojoError::ValidationError`].

use anyhow::Result;
use std::collections::HashSet;

use super::{Build, FactKind, SemverRange};
use crate::constants::RESERVED_FACT_NAMES;
use crate::core::GojoError;

impl Build {
    /// Structural and reference checks, in order:
    ///
    /// 1. `buildArgs` has no duplicate names
    /// 2. the `image` section is present
    /// 3. at least one `fromImage` is declared
    /// 4. every source has a unique name and exactly one provider
    /// 5. every fact has a unique, non-reserved name; a set `source` names a
    ///    declared source; a `semver` range is only set on version facts and parses
    /// 6. every `buildArgs` entry names a declared fact
    pub fn validate_pre_process(&self) -> Result<()> {
        let spec = &self.spec;

        let mut seen = HashSet::new();
        let duplicates: Vec<&str> =
            spec.build_args.iter().filter(|arg| !seen.insert(arg.as_str())).map(String::as_str).collect();
        if !duplicates.is_empty() {
            return Err(GojoError::validation(format!(
                "duplicate values in buildArgs: {}",
                duplicates.join(", ")
            ))
            .into());
        }

        self.image()?;

        if spec.from_images.is_empty() {
            return Err(GojoError::validation("at least one fromImage must be defined").into());
        }

        let mut source_names = HashSet::new();
        for source in &spec.sources {
            if !source_names.insert(source.name.as_str()) {
                return Err(GojoError::validation(format!("duplicate source name: {}", source.name)).into());
            }
            match source.provider_count() {
                1 => {}
                0 => {
                    return Err(
                        GojoError::validation(format!("source '{}' defines no provider", source.name)).into()
                    );
                }
                _ => {
                    return Err(GojoError::validation(format!(
                        "source '{}' defines more than one provider",
                        source.name
                    ))
                    .into());
                }
            }
        }

        let mut fact_names = HashSet::new();
        for fact in &spec.facts {
            if fact.name.is_empty() {
                return Err(GojoError::validation("empty fact name").into());
            }
            if RESERVED_FACT_NAMES.contains(&fact.name.as_str()) {
                return Err(GojoError::validation(format!("internal fact name used: {}", fact.name)).into());
            }
            if !fact_names.insert(fact.name.as_str()) {
                return Err(GojoError::validation(format!("duplicate fact name: {}", fact.name)).into());
            }
            if let Some(source) = fact.source_name()
                && !source_names.contains(source)
            {
                return Err(GojoError::validation(format!(
                    "source not found: {source} (referenced by fact {})",
                    fact.name
                ))
                .into());
            }
            if let Some(range) = fact.semver_range() {
                if fact.kind != FactKind::Version {
                    return Err(GojoError::validation(format!(
                        "semver specified for non version fact kind: {}",
                        fact.name
                    ))
                    .into());
                }
                SemverRange::parse(range)?;
            }
        }

        for arg in &spec.build_args {
            if !fact_names.contains(arg.as_str()) {
                return Err(GojoError::validation(format!("build argument does not name a fact: {arg}")).into());
            }
        }

        Ok(())
    }

    /// Full validation: [`Build::validate_pre_process`] plus a non-empty value
    /// for every fact.
    pub fn validate(&self) -> Result<()> {
        self.validate_pre_process()?;

        if let Some(fact) = self.spec.facts.iter().find(|f| f.value.is_empty()) {
            return Err(GojoError::validation(format!("empty fact value: {}", fact.name)).into());
        }

        Ok(())
    }
}
