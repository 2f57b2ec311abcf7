//! # rdfsite - static sites from RDF graphs
//!
//! Renders one HTML page per selected resource of an RDF dataset. The
//! template for each page is chosen by the resource's classes: the most
//! specific class with a configured template wins, otherwise the default
//! template applies.
//!
//! ## Pipeline
//!
//! ```text
//!   config.yml ──► SiteConfig ──► themes installed, prefixes merged
//!                                      │
//!   dataset ──► RdfGraph ◄─────────────┘
//!                  │
//!                  ▼
//!   restriction query ──► ResourceSet
//!                  │
//!                  ▼
//!   rdf:type ──► ClassIndex ──► rdfs:subClassOf ──► SuperclassIndex
//!                                                        │
//!   class_template_mappings ──► TemplateMapping ─────────┤
//!                                                        ▼
//!                                            ResourceTemplateIndex
//!                                                        │
//!                                                        ▼
//!                              RdfEnvironment (minijinja + RDF filters)
//!                                                        │
//!                                                        ▼
//!                                          <output>/<path>/<name>.html
//! ```
//!
//! Every index is built once per run from an immutable graph snapshot.

pub mod config;
pub mod curie;
pub mod errors;
pub mod graph;
pub mod index;
pub mod render;
pub mod site;

pub use config::{ConfigError, SiteConfig, Theme};
pub use curie::CurieError;
pub use errors::SiteError;
pub use graph::{GraphError, RdfGraph, Resource, SparqlQuery};
pub use index::{
    ClassIndex, IndexError, ResourceSet, ResourceTemplateIndex, SuperclassIndex, TemplateMapping,
};
pub use render::{RdfEnvironment, SiteGlobals};
pub use site::{GenerationReport, SiteGenerator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
