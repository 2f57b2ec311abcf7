/**
 * output.rs
 * Output tree layout: page paths, verbatim includes, cleanup
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::{Result, SiteError};
use crate::graph::Resource;

/// File a resource's page is written to, or `None` if the resource has no place in the site.
///
/// The resource prefix is stripped from the IRI; the remainder becomes
/// directories plus a local name with `.html` appended. An IRI ending in `/`
/// gets `index.html`. Blank nodes, IRIs outside the prefix and IRIs with
/// `.`/`..` segments yield `None`.
///
/// # Example
/// ```
/// # use std::path::{Path, PathBuf};
/// # use rdfsite_core::graph::Resource;
/// # use rdfsite_core::site::output::output_path_from_resource;
/// # use oxigraph::model::NamedNode;
/// let fido = Resource::Iri(NamedNode::new_unchecked("https://example.com/site/dogs/fido"));
/// let path = output_path_from_resource(&fido, "https://example.com/site/", Path::new("out"));
/// assert_eq!(path, Some(PathBuf::from("out/dogs/fido.html")));
/// ```
pub fn output_path_from_resource(
    resource: &Resource,
    resource_prefix: &str,
    output_path: &Path,
) -> Option<PathBuf> {
    let Resource::Iri(iri) = resource else {
        return None;
    };
    let rest = iri.as_str().strip_prefix(resource_prefix)?;

    let (dirs, local_name) = match rest.rsplit_once('/') {
        Some((dirs, local_name)) => (dirs, local_name),
        None => ("", rest),
    };
    let local_name = if local_name.is_empty() { "index" } else { local_name };

    let mut path = output_path.to_path_buf();
    for segment in dirs.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return None;
        }
        path.push(segment);
    }
    if local_name == "." || local_name == ".." {
        return None;
    }
    path.push(format!("{}.html", local_name));

    Some(path)
}

/// Recursively copy `source` into `target`, returning the files written
pub fn copy_tree(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| SiteError::InvalidPath(entry.path().display().to_string()))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
            copied.push(destination);
        }
    }

    Ok(copied)
}

/// Copy every include (file or directory) to the same relative location under `output_path`
pub fn copy_includes(includes: &[PathBuf], output_path: &Path) -> Result<()> {
    for include in includes {
        let relative: PathBuf = include
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        let destination = output_path.join(relative);
        info!("copying {} to {}", include.display(), destination.display());

        if include.is_dir() {
            copy_tree(include, &destination)?;
        } else if include.is_file() {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(include, &destination)?;
        } else {
            return Err(SiteError::IoAt {
                path: include.display().to_string(),
                message: "include not found".to_string(),
            });
        }
    }
    Ok(())
}

/// Remove the output directory if present
pub fn clear_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        debug!("removing {}", path.display());
        fs::remove_dir_all(path)?;
    }
    Ok(())
}
