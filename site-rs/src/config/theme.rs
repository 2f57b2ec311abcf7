//! Themes: reusable bundles of templates, assets and prefix configuration.
//!
//! A theme is a directory laid out as
//!
//! ```text
//! my-theme/
//! ├── templates/   copied to <template_path>/my-theme/
//! ├── assets/      copied to <theme_asset_path>/my-theme/
//! └── config/      *.yml / *.yaml, their `prefixes` are merged into the site's
//! ```
//!
//! Every subdirectory is optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::ConfigError;
use crate::errors::{Result, SiteError};
use crate::site::output::copy_tree;

const TEMPLATES_DIR: &str = "templates";
const ASSETS_DIR: &str = "assets";
const CONFIG_DIR: &str = "config";

/// The part of a theme config file the generator reads
#[derive(Debug, Default, Deserialize)]
struct ThemeConfig {
    #[serde(default)]
    prefixes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name: String,
    root: PathBuf,
}

impl Theme {
    /// Open the theme rooted at `path`; its name is the directory name
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref();
        if !root.is_dir() {
            return Err(ConfigError::ThemeNotFound(root.display().to_string()).into());
        }

        let name = root
            .canonicalize()?
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| SiteError::InvalidPath(root.display().to_string()))?;

        Ok(Self {
            name,
            root: root.to_path_buf(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy the theme's templates to `<template_root>/<name>/`
    pub fn copy_templates(&self, template_root: &Path) -> Result<Vec<PathBuf>> {
        self.copy_subdir(TEMPLATES_DIR, template_root)
    }

    /// Copy the theme's assets to `<asset_root>/<name>/`
    pub fn copy_assets(&self, asset_root: &Path) -> Result<Vec<PathBuf>> {
        self.copy_subdir(ASSETS_DIR, asset_root)
    }

    fn copy_subdir(&self, subdir: &str, target_root: &Path) -> Result<Vec<PathBuf>> {
        let source = self.root.join(subdir);
        if !source.is_dir() {
            debug!("theme {} has no {} directory", self.name, subdir);
            return Ok(Vec::new());
        }

        let target = target_root.join(&self.name);
        let copied = copy_tree(&source, &target)?;
        info!(
            "theme {}: copied {} {} files to {}",
            self.name,
            copied.len(),
            subdir,
            target.display()
        );
        Ok(copied)
    }

    /// YAML files in the theme's `config/` directory, sorted by path
    pub fn config_files(&self) -> Result<Vec<PathBuf>> {
        let config_dir = self.root.join(CONFIG_DIR);
        if !config_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&config_dir).sort_by_file_name() {
            let entry = entry?;
            let is_yaml = matches!(
                entry.path().extension().and_then(|e| e.to_str()),
                Some("yml") | Some("yaml")
            );
            if entry.file_type().is_file() && is_yaml {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Prefixes declared across the theme's config files; later files win
    pub fn prefixes(&self) -> Result<BTreeMap<String, String>> {
        let mut prefixes = BTreeMap::new();
        for path in self.config_files()? {
            debug!("reading theme config from {}", path.display());
            let content = fs::read_to_string(&path)?;
            let config: Option<ThemeConfig> = serde_yaml::from_str(&content)?;
            prefixes.extend(config.unwrap_or_default().prefixes);
        }
        Ok(prefixes)
    }

    /// Copy templates and assets, then return the theme's prefixes
    pub fn install(&self, template_root: &Path, asset_root: &Path) -> Result<BTreeMap<String, String>> {
        info!("installing theme: {}", self.name);
        self.copy_templates(template_root)?;
        self.copy_assets(asset_root)?;
        self.prefixes()
    }
}
