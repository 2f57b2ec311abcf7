/**
 * graph module
 *
 * - store: read-only RDF graph facade over Oxigraph (triple patterns + SPARQL)
 * - query: SPARQL query builder (selection query, resource binding, prefixes)
 * - term: resource identity used as the key of every index
 * - vocab: RDF/RDFS/OWL terms the generator relies on
 */

pub mod query;
pub mod store;
pub mod term;
pub mod vocab;

pub use query::{QueryRow, SparqlQuery, RESOURCE_VARIABLE};
pub use store::{GraphError, RdfGraph};
pub use term::Resource;
