/**
 * site module
 *
 * - generator: SiteGenerator, the end-to-end pipeline
 * - output: page paths, includes, cleanup
 * - serve: local preview server
 * - url: URL joining for resource prefixes and relative URIs
 */

pub mod generator;
pub mod output;
pub mod serve;
pub mod url;

pub use generator::{GenerationReport, RenderFailure, SiteGenerator};
pub use output::output_path_from_resource;
