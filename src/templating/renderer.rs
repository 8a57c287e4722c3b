//! Strict tag rendering with Tera.

use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::LazyLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use crate::core::GojoError;

/// Maximum Levenshtein distance, as a percentage of the name length, for a
/// key to be offered as a suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

static GO_FIELD_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\{\{-?\s*)\.([A-Za-z_])").ok());

static UNDEFINED_VARIABLE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Variable `([^`]+)` not found").ok());

/// Rewrites Go-style field references (`{{ .NAME }}`) to Tera variables
/// (`{{ NAME }}`). Native Tera syntax passes through unchanged.
#[must_use]
pub fn normalize_template(template: &str) -> String {
    match GO_FIELD_RE.as_ref() {
        Some(re) => re.replace_all(template, "${1}${2}").into_owned(),
        None => template.to_string(),
    }
}

/// Renders `template` over `values`.
///
/// Referencing a key absent from `values` is an error, never an empty
/// substitution.
///
/// # Errors
///
/// [`GojoError::TemplateError`] for syntax errors and undefined keys. For an
/// undefined key the message names it and lists close matches.
pub fn render_strict(template: &str, values: &BTreeMap<String, String>) -> Result<String, GojoError> {
    let normalized = normalize_template(template);

    let mut context = TeraContext::new();
    for (key, value) in values {
        context.insert(key.as_str(), value);
    }

    let mut tera = Tera::default();
    tera.render_str(&normalized, &context).map_err(|e| parse_tera_error(&e, values))
}

fn parse_tera_error(error: &tera::Error, values: &BTreeMap<String, String>) -> GojoError {
    let messages = error_chain(error);

    if let Some(name) = messages.iter().find_map(|msg| extract_variable_name(msg)) {
        let available: Vec<&str> = values.keys().map(String::as_str).collect();
        let suggestions = find_similar_keys(&name, &available);

        let mut reason = format!("undefined key '{name}'");
        if !suggestions.is_empty() {
            reason.push_str(&format!(", did you mean: {}?", suggestions.join(", ")));
        }
        reason.push_str(&format!(" (available: {})", available.join(", ")));

        return GojoError::TemplateError {
            reason,
        };
    }

    GojoError::TemplateError {
        reason: format_tera_messages(&messages),
    }
}

/// Messages of the error and all its sources, outermost first.
fn error_chain(error: &tera::Error) -> Vec<String> {
    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages
}

fn extract_variable_name(message: &str) -> Option<String> {
    let re = UNDEFINED_VARIABLE_RE.as_ref()?;
    re.captures(message).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

fn find_similar_keys(target: &str, available: &[&str]) -> Vec<String> {
    let mut scored: Vec<_> = available.iter().map(|key| (*key, levenshtein(target, key))).collect();
    scored.sort_by_key(|(_, distance)| *distance);

    scored
        .into_iter()
        .filter(|(_, distance)| *distance <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Joins the useful parts of a Tera error chain, hiding Tera's internal
/// one-off template name.
fn format_tera_messages(messages: &[String]) -> String {
    let cleaned: Vec<String> = messages
        .iter()
        .map(|msg| {
            msg.replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "")
                .replace("Failed to parse '__tera_one_off'", "")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if cleaned.is_empty() {
        "invalid template syntax".to_string()
    } else {
        cleaned.join(": ")
    }
}
