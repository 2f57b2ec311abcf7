//! Error types for the site generator

use thiserror::Error;

use crate::config::ConfigError;
use crate::curie::CurieError;
use crate::graph::GraphError;
use crate::index::IndexError;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("CURIE error: {0}")]
    Curie(#[from] CurieError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Failed to render {resource} with template '{template}': {source}")]
    Render {
        resource: String,
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {path}: {message}")]
    IoAt { path: String, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<walkdir::Error> for SiteError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        SiteError::IoAt {
            path,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
