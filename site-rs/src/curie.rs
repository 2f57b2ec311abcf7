/**
 * curie.rs
 * Compact URI (CURIE) helpers: splitting, expansion and in-text replacement
 */

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurieError {
    #[error("'{0}' does not look like a CURIE")]
    BadCurie(String),

    #[error("prefix '{prefix}' in '{curie}' is not defined")]
    UndefinedPrefix { prefix: String, curie: String },
}

/// Split a CURIE into prefix and local name.
///
/// Empty parts come back as `None`, so `":foo"` yields `(None, Some("foo"))`.
pub fn split_curie(curie: &str) -> Result<(Option<&str>, Option<&str>), CurieError> {
    let (prefix, local) = curie
        .split_once(':')
        .ok_or_else(|| CurieError::BadCurie(curie.to_string()))?;

    Ok((non_empty(prefix), non_empty(local)))
}

fn non_empty(part: &str) -> Option<&str> {
    if part.is_empty() {
        None
    } else {
        Some(part)
    }
}

/// Returns true for strings like `http://example.com/x` that are already absolute IRIs.
pub fn is_absolute_iri(text: &str) -> bool {
    match text.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}

/// Expand a CURIE to a full IRI using the prefix table.
///
/// Absolute IRIs pass through unchanged.
///
/// # Example
/// ```
/// # use std::collections::BTreeMap;
/// # use rdfsite_core::curie::expand_curie;
/// let mut prefixes = BTreeMap::new();
/// prefixes.insert("void".to_string(), "http://rdfs.org/ns/void#".to_string());
/// assert_eq!(expand_curie("void:Dataset", &prefixes).unwrap(), "http://rdfs.org/ns/void#Dataset");
/// ```
pub fn expand_curie(curie: &str, prefixes: &BTreeMap<String, String>) -> Result<String, CurieError> {
    if is_absolute_iri(curie) {
        return Ok(curie.to_string());
    }

    let (prefix, local) = split_curie(curie)?;
    let prefix = prefix.unwrap_or("");
    let namespace = prefixes.get(prefix).ok_or_else(|| CurieError::UndefinedPrefix {
        prefix: prefix.to_string(),
        curie: curie.to_string(),
    })?;

    Ok(format!("{}{}", namespace, local.unwrap_or("")))
}

/// Replace every `prefix:` occurrence in `text` with its namespace IRI.
pub fn replace_curies(text: &str, prefixes: &BTreeMap<String, String>) -> String {
    prefixes
        .iter()
        .fold(text.to_string(), |acc, (prefix, namespace)| {
            acc.replace(&format!("{}:", prefix), namespace)
        })
}
