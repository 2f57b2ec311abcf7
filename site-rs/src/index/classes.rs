//! Class index: the `rdf:type` values asserted for every selected resource.

use oxigraph::model::{NamedNode, Term};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::graph::vocab::RDF_TYPE;
use crate::graph::RdfGraph;
use crate::index::{ClassIndex, ResourceSet};

/// Build the class index for `resources`.
///
/// Classes are kept in lexicographic IRI order so that tie-breaking between
/// asserted classes does not depend on store iteration order. Non-IRI class
/// values are ignored.
pub fn compute_resource_class_index(graph: &RdfGraph, resources: &ResourceSet) -> Result<ClassIndex> {
    let mut index = ClassIndex::new();

    for resource in resources {
        let mut classes: Vec<NamedNode> = graph
            .objects(resource.as_subject(), RDF_TYPE)?
            .into_iter()
            .filter_map(|term| match term {
                Term::NamedNode(class) => Some(class),
                other => {
                    warn!("ignoring non-IRI class {} asserted for {}", other, resource);
                    None
                }
            })
            .collect();
        classes.sort();
        classes.dedup();

        debug!("{} has {} asserted classes", resource, classes.len());
        index.insert(resource.clone(), classes);
    }

    Ok(index)
}
