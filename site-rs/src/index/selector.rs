//! Resource selection: run the restriction query and collect the distinct resources it binds.

use oxigraph::model::Term;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::graph::{QueryRow, RdfGraph, Resource, SparqlQuery, RESOURCE_VARIABLE};
use crate::index::{IndexError, ResourceSet};

/// Run `query` and return the set of resources it selects.
///
/// The query must either project `?resourceUri` or project exactly one
/// variable. Duplicate bindings collapse; literal bindings are skipped
/// with a warning. An empty result is not an error.
pub fn extract_resources(graph: &RdfGraph, query: &SparqlQuery) -> Result<ResourceSet> {
    let rows = graph.query(query)?;
    let resources = resources_from_rows(&rows)?;
    debug!("selection query yielded {} rows, {} resources", rows.len(), resources.len());
    Ok(resources)
}

fn resources_from_rows(rows: &[QueryRow]) -> Result<ResourceSet> {
    let mut resources = ResourceSet::new();

    for row in rows {
        let Some(term) = resource_binding(row)? else {
            continue;
        };
        match Resource::from_term(term) {
            Some(resource) => {
                resources.insert(resource);
            }
            None => warn!("selection query bound a non-resource term, skipping: {}", term),
        }
    }

    Ok(resources)
}

fn resource_binding(row: &QueryRow) -> Result<Option<&Term>> {
    if let Some((_, term)) = row.iter().find(|(var, _)| var == RESOURCE_VARIABLE) {
        return Ok(Some(term));
    }

    match row.as_slice() {
        [] => Ok(None),
        [(_, term)] => Ok(Some(term)),
        many => Err(IndexError::AmbiguousSelection(
            many.iter().map(|(var, _)| var.clone()).collect(),
        )
        .into()),
    }
}
