//! Platform helpers: executable lookup and shell-style path expansion.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns the git executable name for the current platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

/// Checks whether a program can be found on `PATH`.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Expands `~` and environment variables in a user-supplied path.
///
/// # Examples
///
/// ```rust,no_run
/// use gojo::utils::resolve_path;
///
/// let images = resolve_path("~/src/images")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand path: {path}\n\n\
            Common issues:\n\
            - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
            - Invalid variable syntax (use $VAR or ${{VAR}})"
        )
    })?;

    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_path() {
        assert_eq!(resolve_path("images/nginx").unwrap(), PathBuf::from("images/nginx"));
    }

    #[test]
    fn test_resolve_undefined_variable_fails() {
        assert!(resolve_path("$GOJO_SURELY_UNDEFINED_VARIABLE/images").is_err());
    }

    #[test]
    fn test_git_command_name() {
        assert!(get_git_command().starts_with("git"));
    }
}
