/**
 * render module
 *
 * - environment: minijinja environment bound to the graph and site globals
 * - filters: RDF filters (property lookup, SPARQL, titles, relative URIs)
 * - node: RDF terms, namespaces and query rows as template values
 */

pub mod environment;
pub mod filters;
pub mod node;

pub use environment::{RdfEnvironment, RenderContext, SiteGlobals};
pub use node::{Namespace, Node, SolutionRow};
