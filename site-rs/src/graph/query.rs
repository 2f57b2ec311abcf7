/**
 * query.rs
 * Query types and builders for SPARQL
 */

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use oxigraph::model::Term;
use regex::Regex;

use crate::graph::term::Resource;

/// Variable that the selection query binds and that `bind_resource` replaces.
pub const RESOURCE_VARIABLE: &str = "resourceUri";

/// Placeholder for the site's resource prefix inside a configured selection query.
pub const RESOURCE_PREFIX_PLACEHOLDER: &str = "{resource_prefix}";

static RESOURCE_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?resourceUri\b").expect("static regex"));

static PREFIX_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPREFIX\s+([A-Za-z][\w.-]*)?:").expect("static regex"));

/// A single result row: variable name → bound term, in projection order.
pub type QueryRow = Vec<(String, Term)>;

#[derive(Debug, Clone, PartialEq)]
pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Default selection: every subject IRI starting with the resource prefix.
    pub fn default_restriction(resource_prefix: &str) -> Self {
        Self::new(format!(
            r#"
  SELECT ?resourceUri
  WHERE {{
    ?resourceUri ?predicate ?object
    FILTER(STRSTARTS(STR(?resourceUri), '{}'))
  }}
"#,
            resource_prefix.replace('\'', "\\'")
        ))
    }

    /// Substitute `{resource_prefix}` in a configured selection query.
    pub fn with_resource_prefix(&self, resource_prefix: &str) -> Self {
        Self::new(self.query.replace(RESOURCE_PREFIX_PLACEHOLDER, resource_prefix))
    }

    /// Replace every `?resourceUri` with the resource term.
    ///
    /// # Example
    /// ```
    /// # use rdfsite_core::graph::{Resource, SparqlQuery};
    /// # use oxigraph::model::NamedNode;
    /// let query = SparqlQuery::new("SELECT ?o WHERE { ?resourceUri ?p ?o }");
    /// let resource = Resource::Iri(NamedNode::new_unchecked("https://example.com/a"));
    /// assert_eq!(
    ///     query.bind_resource(&resource).as_str(),
    ///     "SELECT ?o WHERE { <https://example.com/a> ?p ?o }"
    /// );
    /// ```
    pub fn bind_resource(&self, resource: &Resource) -> Self {
        let term = match resource {
            Resource::Iri(node) => format!("<{}>", node.as_str()),
            Resource::Blank(node) => format!("_:{}", node.as_str()),
        };
        Self::new(
            RESOURCE_VAR_RE
                .replace_all(&self.query, regex::NoExpand(&term))
                .into_owned(),
        )
    }

    /// Prepend `PREFIX` declarations for configured prefixes the query does not declare itself.
    pub fn with_prefixes(&self, prefixes: &BTreeMap<String, String>) -> Self {
        let declared: Vec<String> = PREFIX_DECL_RE
            .captures_iter(&self.query)
            .map(|cap| cap.get(1).map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        let header: String = prefixes
            .iter()
            .filter(|(prefix, _)| !declared.iter().any(|d| d == *prefix))
            .map(|(prefix, namespace)| format!("PREFIX {}: <{}>\n", prefix, namespace))
            .collect();

        Self::new(format!("{}{}", header, self.query))
    }
}
