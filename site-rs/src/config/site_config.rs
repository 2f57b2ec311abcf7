/**
 * site_config.rs
 * Site configuration (YAML format)
 *
 * Format:
 * ```yaml
 * base_url: 'https://berlin.github.io'
 * base_path: '/lod-budget'
 * dataset_path: 'data/all.nt'
 * template_path: 'templates'
 * output_path: '_site/'
 * prefixes:
 *   void: http://rdfs.org/ns/void#
 * include:
 *   - assets/
 * class_template_mappings:
 *   "void:Dataset": "dataset.html.jinja"
 * ```
 *
 * Only `base_url` is required. Every other key falls back to a default,
 * logged at warn level, when missing or of the wrong type.
 */

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::curie::CurieError;
use crate::graph::SparqlQuery;
use crate::index::TemplateMapping;
use crate::site::url;

pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_DATASET_PATH: &str = "data/data.ttl";
pub const DEFAULT_TEMPLATE_PATH: &str = "templates";
pub const DEFAULT_TEMPLATE: &str = "default.html.jinja";
pub const DEFAULT_OUTPUT_PATH: &str = "output";
pub const DEFAULT_THEME_ASSET_PATH: &str = "assets";

/// Prefixes available when the config defines none.
pub const DEFAULT_PREFIXES: [(&str, &str); 4] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("dct", "http://purl.org/dc/terms/"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// File the configuration was read from
    pub source: PathBuf,
    pub base_url: String,
    pub base_path: String,
    /// `base_url` joined with `base_path`, always ending in `/`
    pub resource_prefix: String,
    /// URL the site is served under; differs from `base_url` for local previews
    pub site_url: String,
    pub themes: Vec<PathBuf>,
    pub prefixes: BTreeMap<String, String>,
    pub restriction_query: SparqlQuery,
    pub dataset_path: PathBuf,
    pub template_path: PathBuf,
    pub default_template: String,
    /// Raw class → template table, keys are CURIEs or absolute IRIs
    pub class_template_mappings: BTreeMap<String, String>,
    pub output_path: PathBuf,
    pub include: Vec<PathBuf>,
    pub theme_asset_path: PathBuf,
    pub autoescape: bool,
}

impl SiteConfig {
    /// Load the site configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML config
    /// * `cli_site_url` - Overrides `site_url` from the file when given
    ///
    /// # Example
    /// ```no_run
    /// # use rdfsite_core::config::SiteConfig;
    /// let config = SiteConfig::load("config.yml", Some("http://localhost:8000")).unwrap();
    /// assert_eq!(config.site_url, "http://localhost:8000");
    /// ```
    pub fn load<P: AsRef<Path>>(path: P, cli_site_url: Option<&str>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ConfigError::MissingFile(path.display().to_string()));
        }

        info!("loading configuration from {} ...", path.display());
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_yaml_str(&content, path, cli_site_url)
    }

    /// Parse configuration from YAML text; `source` is used for messages only
    pub fn from_yaml_str(
        content: &str,
        source: &Path,
        cli_site_url: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let source_name = source.display().to_string();

        let document: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: source_name.clone(),
            message: e.to_string(),
        })?;

        let mapping = match document {
            Value::Null => return Err(ConfigError::Empty(source_name)),
            Value::Mapping(mapping) if mapping.is_empty() => {
                return Err(ConfigError::Empty(source_name))
            }
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(ConfigError::Parse {
                    path: source_name,
                    message: format!("expected a mapping at the top level, got {:?}", other),
                })
            }
        };

        let reader = ConfigReader::new(&mapping);

        let base_url = match mapping.get("base_url") {
            None => return Err(ConfigError::MissingBaseUrl(source_name)),
            Some(Value::String(base_url)) => base_url.clone(),
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "base_url".to_string(),
                    message: format!("expected a string, got {:?}", other),
                })
            }
        };
        info!("reading base_url: '{}' ...", base_url);

        let base_path: String = reader.read("base_path", || DEFAULT_BASE_PATH.to_string());
        let resource_prefix = url::resource_prefix(&base_url, &base_path).map_err(|e| {
            ConfigError::InvalidBaseUrl {
                url: base_url.clone(),
                message: e.to_string(),
            }
        })?;

        let mut site_url: String = reader.read("site_url", || base_url.clone());
        if let Some(cli_site_url) = cli_site_url {
            info!(
                "current site_url ({}) is overridden by the command line parameter: {}",
                site_url, cli_site_url
            );
            site_url = cli_site_url.to_string();
        }

        let themes: Vec<PathBuf> = reader.read("themes", Vec::new);
        let prefixes: BTreeMap<String, String> = reader.read("prefixes", default_prefixes);

        let restriction_query = match reader.read::<Option<String>>("restriction_query", || None) {
            Some(query) => SparqlQuery::new(query).with_resource_prefix(&resource_prefix),
            None => SparqlQuery::default_restriction(&resource_prefix),
        };

        Ok(Self {
            source: source.to_path_buf(),
            base_url,
            base_path,
            resource_prefix,
            site_url,
            themes,
            prefixes,
            restriction_query,
            dataset_path: reader.read("dataset_path", || DEFAULT_DATASET_PATH.into()),
            template_path: reader.read("template_path", || DEFAULT_TEMPLATE_PATH.into()),
            default_template: reader.read("default_template", || DEFAULT_TEMPLATE.to_string()),
            class_template_mappings: reader.read("class_template_mappings", BTreeMap::new),
            output_path: reader.read("output_path", || DEFAULT_OUTPUT_PATH.into()),
            include: reader.read("include", Vec::new),
            theme_asset_path: reader.read("theme_asset_path", || DEFAULT_THEME_ASSET_PATH.into()),
            autoescape: reader.read("autoescape", || false),
        })
    }

    /// Put `theme_prefixes` underneath the configured prefixes; configured ones win
    pub fn merge_theme_prefixes(&mut self, theme_prefixes: BTreeMap<String, String>) {
        let mut merged = theme_prefixes;
        merged.extend(std::mem::take(&mut self.prefixes));
        self.prefixes = merged;
    }

    /// Expand `class_template_mappings` against the current prefixes
    pub fn template_mapping(&self) -> Result<TemplateMapping, ConfigError> {
        TemplateMapping::from_curies(&self.class_template_mappings, &self.prefixes).map_err(|e| {
            let curie = match e {
                CurieError::BadCurie(curie) => curie,
                CurieError::UndefinedPrefix { curie, .. } => curie,
            };
            let template = self
                .class_template_mappings
                .get(&curie)
                .cloned()
                .unwrap_or_default();
            ConfigError::UndefinedPrefix { curie, template }
        })
    }
}

fn default_prefixes() -> BTreeMap<String, String> {
    DEFAULT_PREFIXES
        .iter()
        .map(|(prefix, namespace)| (prefix.to_string(), namespace.to_string()))
        .collect()
}

/// Typed, logged access to the top-level config mapping
struct ConfigReader<'a> {
    mapping: &'a Mapping,
}

impl<'a> ConfigReader<'a> {
    fn new(mapping: &'a Mapping) -> Self {
        Self { mapping }
    }

    fn read<T>(&self, key: &str, default: impl FnOnce() -> T) -> T
    where
        T: DeserializeOwned + Debug,
    {
        let Some(raw) = self.mapping.get(key) else {
            let value = default();
            warn!("{} not found in config, using default {:?} ...", key, value);
            return value;
        };

        match serde_yaml::from_value::<T>(raw.clone()) {
            Ok(value) => {
                info!("reading {}: {:?} ...", key, value);
                value
            }
            Err(e) => {
                let value = default();
                warn!("invalid value for {} ({}), using default {:?} ...", key, e, value);
                value
            }
        }
    }
}
