//! Error handling for gojo.
//!
//! This module defines the error taxonomy shared by every part of the tool and
//! the helpers that turn those errors into messages an operator can act on.
//!
//! # Error Types
//!
//! - [`GojoError`] - the enumerated error conditions raised by the library
//! - [`ErrorContext`] - an error plus an optional suggestion and details,
//!   printed in color by the binary
//!
//! # Error Categories
//!
//! - **Provider errors**: [`GojoError::FetchError`], [`GojoError::ArchiveError`],
//!   [`GojoError::NotFound`], [`GojoError::ProviderTypeError`]
//! - **Manifest errors**: [`GojoError::ValidationError`],
//!   [`GojoError::ManifestNotFound`], [`GojoError::ManifestParseError`]
//! - **Resolution errors**: [`GojoError::UnresolvedFact`],
//!   [`GojoError::TemplateError`]
//! - **Tooling errors**: [`GojoError::GitError`], [`GojoError::CommandError`]
//!
//! Library functions return `anyhow::Result`. Domain failures are raised as
//! `GojoError` values so the command layer can recover them with
//! `downcast_ref` and [`user_friendly_error`] can attach suggestions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gojo::core::{GojoError, ErrorContext};
//!
//! let error = GojoError::UnresolvedFact {
//!     name: "VERSION".to_string(),
//! };
//! ErrorContext::new(error)
//!     .with_suggestion("Check the source bound to the fact")
//!     .display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The error conditions gojo can report.
#[derive(Error, Debug)]
pub enum GojoError {
    /// A provider could not reach its backing service, or got a non-success status.
    #[error("Failed to fetch {url}: {reason}")]
    FetchError {
        /// The URL that was requested
        url: String,
        /// Transport error or unexpected status
        reason: String,
    },

    /// An expected entry is missing from a downloaded archive, or the archive is unreadable.
    #[error("Archive entry '{entry}' could not be read: {reason}")]
    ArchiveError {
        /// Entry that was looked up
        entry: String,
        /// What went wrong
        reason: String,
    },

    /// The requested package, version or stable release does not exist.
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing item
        what: String,
    },

    /// The manifest or a provider record breaks an invariant.
    #[error("Validation failed: {reason}")]
    ValidationError {
        /// Which invariant failed
        reason: String,
    },

    /// A source declares no provider this tool knows about.
    #[error("Provider type not recognized for source '{source_name}'")]
    ProviderTypeError {
        /// Name of the offending source
        source_name: String,
    },

    /// A git operation failed, typically because the directory is not a work tree.
    #[error("Git {operation} failed: {reason}")]
    GitError {
        /// The git operation (`rev-parse`, `add`, ...)
        operation: String,
        /// Stderr or a description of the failure
        reason: String,
    },

    /// A fact is still empty after resolution.
    #[error("No value found for fact with name: {name}")]
    UnresolvedFact {
        /// Name of the fact left empty
        name: String,
    },

    /// The tag template could not be rendered.
    #[error("Tag template error: {reason}")]
    TemplateError {
        /// Rendering failure, including undefined variables
        reason: String,
    },

    /// The build manifest does not exist.
    #[error("Build file not found: {path}")]
    ManifestNotFound {
        /// Path that was looked up
        path: String,
    },

    /// The build manifest is not valid YAML for the expected schema.
    #[error("Invalid build file syntax in {file}")]
    ManifestParseError {
        /// Manifest path
        file: String,
        /// Decoder message
        reason: String,
    },

    /// An external builder command failed.
    #[error("Command '{command}' failed: {reason}")]
    CommandError {
        /// The command line that was run
        command: String,
        /// Exit status or spawn error
        reason: String,
    },

    /// Wraps [`std::io::Error`].
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Catch-all for errors without a dedicated variant.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for GojoError {
    fn clone(&self) -> Self {
        match self {
            Self::FetchError {
                url,
                reason,
            } => Self::FetchError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::ArchiveError {
                entry,
                reason,
            } => Self::ArchiveError {
                entry: entry.clone(),
                reason: reason.clone(),
            },
            Self::NotFound {
                what,
            } => Self::NotFound {
                what: what.clone(),
            },
            Self::ValidationError {
                reason,
            } => Self::ValidationError {
                reason: reason.clone(),
            },
            Self::ProviderTypeError {
                source_name,
            } => Self::ProviderTypeError {
                source_name: source_name.clone(),
            },
            Self::GitError {
                operation,
                reason,
            } => Self::GitError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::UnresolvedFact {
                name,
            } => Self::UnresolvedFact {
                name: name.clone(),
            },
            Self::TemplateError {
                reason,
            } => Self::TemplateError {
                reason: reason.clone(),
            },
            Self::ManifestNotFound {
                path,
            } => Self::ManifestNotFound {
                path: path.clone(),
            },
            Self::ManifestParseError {
                file,
                reason,
            } => Self::ManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::CommandError {
                command,
                reason,
            } => Self::CommandError {
                command: command.clone(),
                reason: reason.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl GojoError {
    /// Shorthand for a [`GojoError::ValidationError`].
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::ValidationError {
            reason: reason.into(),
        }
    }
}

/// An error enriched with an optional suggestion and details for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GojoError,
    /// What the user can try next
    pub suggestion: Option<String>,
    /// Extra explanation of the failure
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps an error without suggestion or details.
    #[must_use]
    pub const fn new(error: GojoError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attaches a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attaches details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colored labels.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// Errors carrying a [`GojoError`] anywhere in their chain get a tailored
/// suggestion. Everything else is reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(gojo_error) = error.chain().find_map(|e| e.downcast_ref::<GojoError>()) {
        let ctx = create_error_context(gojo_error.clone());
        // Keep the outer context messages visible
        if error.downcast_ref::<GojoError>().is_none() && ctx.details.is_none() {
            return ctx.with_details(error.to_string());
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(GojoError::Other {
                message: io_error.to_string(),
            })
            .with_suggestion("Check the permissions of the images directory and build file");
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(GojoError::Other {
        message,
    })
}

fn create_error_context(error: GojoError) -> ErrorContext {
    let (suggestion, details): (Option<&str>, Option<String>) = match &error {
        GojoError::FetchError { .. } => (
            Some("Check your network connection and the source settings (mirror, versionId, owner, repository)"),
            Some("Provider requests are not retried; run the command again once the service is reachable".to_string()),
        ),
        GojoError::ArchiveError { .. } => (
            Some("Verify the mirror serves a standard APKINDEX.tar.gz for this repository and architecture"),
            None,
        ),
        GojoError::NotFound { .. } => {
            (Some("Check the package name, repository and semver range declared for the fact"), None)
        }
        GojoError::ValidationError { .. } => (Some("Fix the build file and run the command again"), None),
        GojoError::ProviderTypeError { .. } => {
            (Some("Each source needs exactly one provider key: 'alpine' or 'github'"), None)
        }
        GojoError::GitError { operation, .. } if operation == "rev-parse" => (
            Some("The image directory must be inside a git work tree with at least one commit"),
            Some("The gitCommit fact is derived from the HEAD commit of the repository holding the build file".to_string()),
        ),
        GojoError::GitError { .. } => {
            (Some("Run the git command manually in the image directory for more details"), None)
        }
        GojoError::UnresolvedFact { .. } => (
            Some("Bind the fact to a source or give it a static value"),
            Some("The build file was not modified".to_string()),
        ),
        GojoError::TemplateError { .. } => (
            Some("Reference only declared facts, 'date' or 'gitCommit' in tagFormat, e.g. '{{ .VERSION }}-{{ .gitCommit }}'"),
            None,
        ),
        GojoError::ManifestNotFound { .. } => (
            Some("Check --images-dir, --image and --build-file, or create the image with 'gojo scaffold'"),
            None,
        ),
        GojoError::ManifestParseError { reason, .. } => {
            (Some("Check the YAML syntax and key names of the build file"), Some(reason.clone()))
        }
        GojoError::CommandError { .. } => (
            Some("Make sure the builder binary is installed and on PATH; rerun with --dry-run to print the commands"),
            None,
        ),
        GojoError::IoError(_) | GojoError::Other { .. } => (None, None),
    };

    let suggestion = suggestion.map(str::to_string);
    ErrorContext {
        error,
        suggestion,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GojoError::UnresolvedFact {
            name: "VERSION".to_string(),
        };
        assert_eq!(error.to_string(), "No value found for fact with name: VERSION");

        let error = GojoError::ArchiveError {
            entry: "APKINDEX".to_string(),
            reason: "file not found in archive".to_string(),
        };
        assert!(error.to_string().contains("APKINDEX"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(GojoError::validation("duplicate values: VERSION"))
            .with_suggestion("Remove the duplicate")
            .with_details("buildArgs must be unique");

        let display = format!("{ctx}");
        assert!(display.contains("Validation failed: duplicate values: VERSION"));
        assert!(display.contains("Details: buildArgs must be unique"));
        assert!(display.contains("Suggestion: Remove the duplicate"));
    }

    #[test]
    fn test_user_friendly_error_downcasts_through_context() {
        let error = anyhow::Error::new(GojoError::UnresolvedFact {
            name: "VERSION".to_string(),
        })
        .context("Failed to resolve facts");

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, GojoError::UnresolvedFact { .. }));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_keeps_outer_context() {
        let error = anyhow::Error::new(GojoError::TemplateError {
            reason: "undefined key 'VERSIN'".to_string(),
        })
        .context("Failed to compute tag for nginx");

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, GojoError::TemplateError { .. }));
        assert_eq!(ctx.details.as_deref(), Some("Failed to compute tag for nginx"));
    }

    #[test]
    fn test_user_friendly_error_generic_chain() {
        let error = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(error);
        match ctx.error {
            GojoError::Other {
                message,
            } => {
                assert!(message.starts_with("outer"));
                assert!(message.contains("Caused by:"));
                assert!(message.contains("root cause"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_git_rev_parse_suggestion() {
        let ctx = create_error_context(GojoError::GitError {
            operation: "rev-parse".to_string(),
            reason: "not a git repository".to_string(),
        });
        assert!(ctx.suggestion.unwrap().contains("git work tree"));
    }

    #[test]
    fn test_clone_preserves_io_kind() {
        let error = GojoError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        match error.clone() {
            GojoError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
