//! Core types shared by every gojo module.
//!
//! At the moment this is the error layer:
//! - [`GojoError`] enumerates the failure modes of manifest handling, fact
//!   resolution, tag computation and the builder integrations
//! - [`ErrorContext`] pairs an error with a suggestion for the CLI
//! - [`user_friendly_error`] converts any `anyhow::Error` into an [`ErrorContext`]

pub mod error;

pub use error::{ErrorContext, GojoError, user_friendly_error};
