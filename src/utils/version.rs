//! Version string helpers.

/// Strips a single leading `v` from a version string.
///
/// Upstream projects tag releases as `v1.2.3` or `1.2.3`; both become
/// `1.2.3`. Only one prefix character is removed, so the operation is
/// idempotent on already-sanitized input.
///
/// # Examples
///
/// ```rust
/// use gojo::utils::sanitize_version;
///
/// assert_eq!(sanitize_version("v1.2.3"), "1.2.3");
/// assert_eq!(sanitize_version("1.2.3"), "1.2.3");
/// ```
#[must_use]
pub fn sanitize_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}
