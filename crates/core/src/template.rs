//! Placeholder extraction and command building.
//!
//! Command templates mark their arguments with a two-brace syntax:
//! `{{name}}` or `{{name|default}}`. This module extracts the placeholders
//! from a template and substitutes their values back into it.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Matches `{{name}}` and `{{name|default}}` placeholders.
///
/// Names may not contain `{`, `}` or `|`; defaults may not contain `{` or
/// `}`. Anything that does not match, including unterminated braces, is
/// treated as ordinary text.
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{([^{}|]+)(?:\|([^{}]+))?\}\}").expect("placeholder pattern is valid")
    })
}

/// One extracted argument occurrence in a command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Default from the first `{{name|default}}` occurrence, empty if none.
    pub default: String,
    /// Current value; starts as the default and is overridden by the
    /// variable store or user input.
    pub value: String,
    /// Byte offset of the first occurrence, kept to preserve encounter order.
    pub position: usize,
}

/// Extracts all unique placeholders from a command template.
///
/// Placeholders are returned in order of first appearance. Duplicate names
/// collapse to a single entry that keeps the first occurrence's default and
/// position; defaults on later occurrences of the same name are ignored.
pub fn extract_placeholders(template: &str) -> Vec<Placeholder> {
    let mut placeholders: IndexMap<String, Placeholder> = IndexMap::new();

    for captures in placeholder_pattern().captures_iter(template) {
        let name = &captures[1];

        // Later occurrences of the same name are resolved from the first
        if placeholders.contains_key(name) {
            continue;
        }

        let default = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let position = captures.get(0).map_or(0, |m| m.start());

        placeholders.insert(
            name.to_string(),
            Placeholder {
                name: name.to_string(),
                value: default.clone(),
                default,
                position,
            },
        );
    }

    placeholders.into_values().collect()
}

/// Replaces every placeholder occurrence with its current value.
///
/// All `{{name|default}}` occurrences are first normalized to `{{name}}`,
/// then every `{{name}}` is substituted literally, including placeholders
/// whose value is empty. Performs no validation; callers gate on
/// [`has_incomplete`] separately.
pub fn build_command(template: &str, placeholders: &[Placeholder]) -> String {
    let mut result = placeholder_pattern()
        .replace_all(template, "{{$1}}")
        .into_owned();

    for placeholder in placeholders {
        let token = format!("{{{{{}}}}}", placeholder.name);
        result = result.replace(&token, &placeholder.value);
    }

    result
}

/// Reports whether any placeholder still has an empty value.
pub fn has_incomplete(placeholders: &[Placeholder]) -> bool {
    placeholders.iter().any(|p| p.value.is_empty())
}

/// Names of the placeholders that still have an empty value.
pub fn incomplete_names(placeholders: &[Placeholder]) -> Vec<&str> {
    placeholders
        .iter()
        .filter(|p| p.value.is_empty())
        .map(|p| p.name.as_str())
        .collect()
}
