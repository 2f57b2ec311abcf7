/**
 * generator.rs
 * Site generation pipeline
 *
 * config → themes → dataset → selection → class index → superclass index
 * → template index → one page per resource
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{SiteConfig, Theme};
use crate::errors::{Result, SiteError};
use crate::graph::{RdfGraph, Resource};
use crate::index::{
    self, ClassIndex, ResourceSet, ResourceTemplateIndex, SuperclassIndex, TemplateMapping,
};
use crate::render::{RdfEnvironment, SiteGlobals};
use crate::site::output::{clear_dir, copy_includes, output_path_from_resource};
use crate::site::serve::serve_dir;

/// A page that could not be rendered or written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFailure {
    pub resource: String,
    pub template: String,
    pub message: String,
}

/// Outcome of one `generate_site` run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Files written, in rendering order
    pub rendered: Vec<PathBuf>,
    /// Resources without a place in the output tree
    pub skipped: Vec<String>,
    pub failed: Vec<RenderFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct SiteGenerator {
    config: SiteConfig,
    mapping: TemplateMapping,
    environment: RdfEnvironment,
}

impl SiteGenerator {
    /// Read the config at `config_path` and prepare everything needed for generation
    ///
    /// # Arguments
    /// * `config_path` - YAML site configuration
    /// * `cli_site_url` - Overrides the configured `site_url`, e.g. for a local preview
    ///
    /// # Example
    /// ```no_run
    /// # use rdfsite_core::site::SiteGenerator;
    /// let generator = SiteGenerator::new("config.yml", None).unwrap();
    /// let resources = generator.extract_resources().unwrap();
    /// let report = generator.generate_site(&resources).unwrap();
    /// println!("{} pages", report.rendered.len());
    /// ```
    pub fn new<P: AsRef<Path>>(config_path: P, cli_site_url: Option<&str>) -> Result<Self> {
        let config = SiteConfig::load(config_path, cli_site_url)?;
        Self::from_config(config)
    }

    /// Install themes, expand the template mapping, load the dataset and build the environment
    pub fn from_config(mut config: SiteConfig) -> Result<Self> {
        let theme_prefixes = install_themes(&config)?;
        config.merge_theme_prefixes(theme_prefixes);

        let mapping = config.template_mapping()?;
        if mapping.is_empty() {
            debug!("no class template mappings, every page uses {}", config.default_template);
        }
        for (class, template) in mapping.iter() {
            debug!("mapping {} → {}", class, template);
        }

        let graph = RdfGraph::load(&config.dataset_path)?;
        info!(
            "loaded {} triples from {}",
            graph.len(),
            config.dataset_path.display()
        );

        let environment = RdfEnvironment::new(
            Arc::new(graph),
            SiteGlobals::from_config(&config),
            Some(&config.template_path),
            config.autoescape,
        );

        Ok(Self {
            config,
            mapping,
            environment,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn mapping(&self) -> &TemplateMapping {
        &self.mapping
    }

    pub fn graph(&self) -> &RdfGraph {
        self.environment.graph()
    }

    pub fn environment(&self) -> &RdfEnvironment {
        &self.environment
    }

    /// Resources selected by the configured restriction query
    pub fn extract_resources(&self) -> Result<ResourceSet> {
        info!("extracting resources");
        let resources = index::extract_resources(self.graph(), &self.config.restriction_query)?;
        info!("selected {} resources", resources.len());
        Ok(resources)
    }

    pub fn compute_resource_class_index(&self, resources: &ResourceSet) -> Result<ClassIndex> {
        debug!("determining resource_class_index ...");
        index::compute_resource_class_index(self.graph(), resources)
    }

    pub fn compute_class_superclass_index(&self, classes: &ClassIndex) -> Result<SuperclassIndex> {
        debug!("determining class_superclass_index ...");
        index::compute_class_superclass_index(self.graph(), classes)
    }

    pub fn compute_resource_template_index(
        &self,
        resources: &ResourceSet,
        classes: &ClassIndex,
        superclasses: &SuperclassIndex,
    ) -> Result<ResourceTemplateIndex> {
        debug!("determining resource_template_index ...");
        index::compute_resource_template_index(
            resources,
            classes,
            superclasses,
            &self.mapping,
            &self.config.default_template,
        )
    }

    /// All three index stages in order
    pub fn build_template_index(&self, resources: &ResourceSet) -> Result<ResourceTemplateIndex> {
        let classes = self.compute_resource_class_index(resources)?;
        let superclasses = self.compute_class_superclass_index(&classes)?;
        self.compute_resource_template_index(resources, &classes, &superclasses)
    }

    /// Render one page per resource into the output directory
    ///
    /// Index construction errors abort the run. Failures on individual
    /// pages are logged and collected in the report.
    pub fn generate_site(&self, resources: &ResourceSet) -> Result<GenerationReport> {
        let output_path = &self.config.output_path;
        fs::create_dir_all(output_path)?;
        copy_includes(&self.config.include, output_path)?;

        let templates = self.build_template_index(resources)?;
        let mut report = GenerationReport::default();

        for (resource, template) in templates.iter() {
            let Some(page) =
                output_path_from_resource(resource, &self.config.resource_prefix, output_path)
            else {
                warn!(
                    "{} is outside {}, no page generated",
                    resource, self.config.resource_prefix
                );
                report.skipped.push(resource.to_string());
                continue;
            };

            debug!("rendering {} with template {} ...", resource, template);
            match self.render_page(resource, template, &page) {
                Ok(()) => report.rendered.push(page),
                Err(e) => {
                    error!("{}", e);
                    report.failed.push(RenderFailure {
                        resource: resource.to_string(),
                        template: template.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "generated {} pages in {} ({} skipped, {} failed)",
            report.rendered.len(),
            output_path.display(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn render_page(&self, resource: &Resource, template: &str, page: &Path) -> Result<()> {
        let rendered = self
            .environment
            .render(template, resource)
            .map_err(|source| SiteError::Render {
                resource: resource.to_string(),
                template: template.to_string(),
                source,
            })?;

        if let Some(parent) = page.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("writing to {} ...", page.display());
        fs::write(page, rendered)?;
        Ok(())
    }

    /// Remove the output directory
    pub fn clear_site(&self) -> Result<()> {
        clear_dir(&self.config.output_path)
    }

    /// Serve the output directory on `port` until interrupted
    pub async fn serve_site(&self, port: u16) -> Result<()> {
        serve_dir(self.config.output_path.clone(), port).await
    }
}

/// Install every configured theme; later themes override earlier prefixes
fn install_themes(config: &SiteConfig) -> Result<BTreeMap<String, String>> {
    let mut prefixes = BTreeMap::new();
    for theme_path in &config.themes {
        let theme = Theme::open(theme_path)?;
        prefixes.extend(theme.install(&config.template_path, &config.theme_asset_path)?);
    }
    Ok(prefixes)
}
