//! Parsing of fully-qualified image names (FQIN).
//!
//! An FQIN has the shape `registry[:port][/path...]/name:tag`. The tag is
//! everything after the last `:`, and the name is everything after the last `/`
//! of what remains. So a registry port survives:
//! `registry.fqdn:5000/project/env/name:tag` yields
//! (`registry.fqdn:5000/project/env`, `name`, `tag`).

use anyhow::Result;

use crate::core::GojoError;

fn invalid(image: &str) -> anyhow::Error {
    GojoError::validation(format!("invalid image name: {image}")).into()
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/' | ':' | '@')
}

/// Splits an FQIN into `(registry, name, tag)`.
///
/// # Errors
///
/// Returns a [`GojoError::ValidationError`] when the input contains characters
/// that cannot appear in an image reference, lacks a `:tag` suffix, lacks a
/// `registry/` prefix, or has an empty name or tag.
pub fn parse_fqin(image: &str) -> Result<(String, String, String)> {
    if image.is_empty() || !image.chars().all(is_reference_char) {
        return Err(invalid(image));
    }

    let (repository, tag) = image.rsplit_once(':').ok_or_else(|| invalid(image))?;
    let (registry, name) = repository.rsplit_once('/').ok_or_else(|| invalid(image))?;

    if name.is_empty() || tag.is_empty() || tag.contains('/') {
        return Err(invalid(image));
    }

    Ok((registry.to_string(), name.to_string(), tag.to_string()))
}
