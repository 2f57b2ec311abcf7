/**
 * environment.rs
 * Template environment bound to an RDF graph
 */

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use minijinja::value::Value;
use minijinja::{context, path_loader, AutoEscape, Environment};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::graph::{RdfGraph, Resource};
use crate::render::filters;
use crate::render::node::{Namespace, Node};

/// Site-wide values every template sees
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SiteGlobals {
    pub base_url: String,
    pub base_path: String,
    pub resource_prefix: String,
    pub site_url: String,
    pub prefixes: BTreeMap<String, String>,
}

impl SiteGlobals {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            base_path: config.base_path.clone(),
            resource_prefix: config.resource_prefix.clone(),
            site_url: config.site_url.clone(),
            prefixes: config.prefixes.clone(),
        }
    }
}

/// Shared state the graph-reading filters close over
pub struct RenderContext {
    pub graph: Arc<RdfGraph>,
    pub globals: SiteGlobals,
}

pub struct RdfEnvironment {
    env: Environment<'static>,
    context: Arc<RenderContext>,
}

impl RdfEnvironment {
    /// Build an environment with the RDF filters and site globals registered
    ///
    /// # Arguments
    /// * `graph` - Dataset the filters query
    /// * `globals` - Site values exposed to every template
    /// * `template_path` - Directory templates are loaded from by name; `None` for string templates only
    /// * `autoescape` - HTML-escape every rendered expression
    pub fn new(
        graph: Arc<RdfGraph>,
        globals: SiteGlobals,
        template_path: Option<&Path>,
        autoescape: bool,
    ) -> Self {
        let mut env = Environment::new();
        if let Some(template_path) = template_path {
            env.set_loader(path_loader(template_path));
        }
        env.set_auto_escape_callback(move |_name: &str| {
            if autoescape {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });

        env.add_global("base_url", globals.base_url.clone());
        env.add_global("base_path", globals.base_path.clone());
        env.add_global("resource_prefix", globals.resource_prefix.clone());
        env.add_global("site_url", globals.site_url.clone());
        env.add_global("prefixes", Value::from_serialize(&globals.prefixes));
        for (prefix, namespace) in &globals.prefixes {
            env.add_global(
                prefix.to_uppercase(),
                Value::from_object(Namespace::new(namespace.clone())),
            );
        }

        let context = Arc::new(RenderContext { graph, globals });
        filters::register(&mut env, context.clone());

        Self { env, context }
    }

    pub fn graph(&self) -> &RdfGraph {
        &self.context.graph
    }

    pub fn globals(&self) -> &SiteGlobals {
        &self.context.globals
    }

    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Render the named template with `node` bound to `resource`
    pub fn render(&self, template: &str, resource: &Resource) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(template)?;
        template.render(context! { node => Node::from_resource(resource) })
    }

    /// Render template source with `node` bound to `resource`
    pub fn render_str(&self, source: &str, resource: &Resource) -> Result<String, minijinja::Error> {
        self.env
            .render_str(source, context! { node => Node::from_resource(resource) })
    }
}
