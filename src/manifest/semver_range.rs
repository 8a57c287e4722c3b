//! Semantic-version ranges for `Fact.semver`.
//!
//! Build files use a range grammar where whitespace-separated comparators are
//! ANDed and `||` separates alternatives:
//!
//! ```text
//! >=1.18.0 <1.20.0
//! <1.0.0 || >=2.0.0
//! 1.2.3              # exactly 1.2.3
//! ==1.2.3            # same as above
//! >=1.0.0 !=1.2.3    # 1.0.0 or later except 1.2.3
//! ```
//!
//! Each alternative becomes one [`semver::VersionReq`] plus the versions its
//! `!=` comparators exclude. A bare version is an exact match, unlike Cargo's
//! default caret semantics. A bare partial version such as `1.2` is accepted
//! and matches every `1.2.x`.

use semver::{Version, VersionReq};
use std::fmt;

use crate::core::GojoError;

/// A parsed range: a version matches when any alternative matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemverRange {
    raw: String,
    alternatives: Vec<Alternative>,
}

/// ANDed comparators: `req` must match and no excluded version may equal
/// the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Alternative {
    req: VersionReq,
    excluded: Vec<Version>,
}

impl Alternative {
    fn matches(&self, version: &Version) -> bool {
        self.req.matches(version) && !self.excluded.contains(version)
    }
}

impl SemverRange {
    /// Parses a range expression.
    ///
    /// # Errors
    ///
    /// Returns a [`GojoError::ValidationError`] for empty alternatives or
    /// comparators `semver` cannot parse.
    pub fn parse(input: &str) -> Result<Self, GojoError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(GojoError::validation("empty semver range"));
        }
        let invalid = |reason: String| GojoError::validation(format!("invalid semver range '{raw}': {reason}"));

        let mut alternatives = Vec::new();
        for alternative in raw.split("||") {
            let tokens: Vec<&str> = alternative.split_whitespace().collect();
            if tokens.is_empty() {
                return Err(invalid("empty alternative".to_string()));
            }

            let mut comparators = Vec::new();
            let mut excluded = Vec::new();
            for token in tokens {
                match token.strip_prefix("!=").or_else(|| token.strip_prefix('!')) {
                    Some(version) => {
                        let version = Version::parse(version).map_err(|e| invalid(format!("'{token}': {e}")))?;
                        excluded.push(version);
                    }
                    None => comparators.push(normalize_comparator(token)),
                }
            }

            let req = if comparators.is_empty() {
                VersionReq::STAR
            } else {
                VersionReq::parse(&comparators.join(", ")).map_err(|e| invalid(e.to_string()))?
            };
            alternatives.push(Alternative {
                req,
                excluded,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|alternative| alternative.matches(version))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SemverRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Rewrites one comparator into `semver` syntax: `==X` and bare `X` both
/// mean `=X`.
fn normalize_comparator(token: &str) -> String {
    if let Some(version) = token.strip_prefix("==") {
        return format!("={version}");
    }
    let bare_version = token.starts_with(|c: char| c.is_ascii_digit());
    let wildcard = token.contains(['*', 'x', 'X']);
    if bare_version && !wildcard {
        format!("={token}")
    } else {
        token.to_string()
    }
}
