/**
 * config module
 * YAML site configuration and theme installation
 */

pub mod site_config;
pub mod theme;

use thiserror::Error;

pub use site_config::{SiteConfig, DEFAULT_PREFIXES};
pub use theme::Theme;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no config file found at {0}")]
    MissingFile(String),

    #[error("config at {0} is empty")]
    Empty(String),

    #[error("invalid config YAML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("no 'base_url' field found in {0}")]
    MissingBaseUrl(String),

    #[error("invalid base_url '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("prefix in mapping '{curie}' -> '{template}' not defined")]
    UndefinedPrefix { curie: String, template: String },

    #[error("theme not found: {0}")]
    ThemeNotFound(String),
}
