/**
 * index module
 * Build-once, read-only indices computed for one generation run
 *
 * - selector: runs the selection query → resource set
 * - classes: resource → asserted classes (rdf:type)
 * - superclass: class → ancestor chain, universal root first, self last
 * - resolver: resource → template name, most specific mapped class wins
 */

pub mod classes;
pub mod resolver;
pub mod selector;
pub mod superclass;

use std::collections::{BTreeMap, BTreeSet};

use oxigraph::model::NamedNode;
use thiserror::Error;

use crate::curie::{expand_curie, CurieError};
use crate::graph::Resource;

pub use classes::compute_resource_class_index;
pub use resolver::compute_resource_template_index;
pub use selector::extract_resources;
pub use superclass::{compute_class_superclass_index, superclass_chain};

/// Broken construction order: these never happen when indices are built by the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("resource {0} is missing from the class index")]
    MissingResource(String),

    #[error("class {0} is missing from the superclass index")]
    MissingClass(String),

    #[error("selection query must bind ?resourceUri or exactly one variable, got {0:?}")]
    AmbiguousSelection(Vec<String>),
}

/// Unordered set of unique resources selected for page generation.
pub type ResourceSet = BTreeSet<Resource>;

/// Resource → asserted classes, in stable assertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassIndex {
    entries: BTreeMap<Resource, Vec<NamedNode>>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Resource, classes: Vec<NamedNode>) {
        self.entries.insert(resource, classes);
    }

    pub fn get(&self, resource: &Resource) -> Option<&[NamedNode]> {
        self.entries.get(resource).map(Vec::as_slice)
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        self.entries.contains_key(resource)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Resource, &[NamedNode])> {
        self.entries.iter().map(|(r, c)| (r, c.as_slice()))
    }

    /// Every distinct class asserted for any resource.
    pub fn classes(&self) -> BTreeSet<&NamedNode> {
        self.entries.values().flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Resource, Vec<NamedNode>)> for ClassIndex {
    fn from_iter<I: IntoIterator<Item = (Resource, Vec<NamedNode>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Class → ancestor chain, least specific (the universal root) first, the class itself last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuperclassIndex {
    chains: BTreeMap<NamedNode, Vec<NamedNode>>,
    truncated: BTreeSet<NamedNode>,
}

impl SuperclassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: NamedNode, chain: Vec<NamedNode>) {
        self.chains.insert(class, chain);
    }

    pub fn chain(&self, class: &NamedNode) -> Option<&[NamedNode]> {
        self.chains.get(class).map(Vec::as_slice)
    }

    pub fn contains(&self, class: &NamedNode) -> bool {
        self.chains.contains_key(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NamedNode, &[NamedNode])> {
        self.chains.iter().map(|(c, chain)| (c, chain.as_slice()))
    }

    /// Classes whose walk stopped at a cycle in the subclass relation.
    pub fn truncated(&self) -> &BTreeSet<NamedNode> {
        &self.truncated
    }

    pub(crate) fn mark_truncated(&mut self, class: NamedNode) {
        self.truncated.insert(class);
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl FromIterator<(NamedNode, Vec<NamedNode>)> for SuperclassIndex {
    fn from_iter<I: IntoIterator<Item = (NamedNode, Vec<NamedNode>)>>(iter: I) -> Self {
        Self {
            chains: iter.into_iter().collect(),
            truncated: BTreeSet::new(),
        }
    }
}

/// Configured class → template name table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateMapping {
    templates: BTreeMap<NamedNode, String>,
}

impl TemplateMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand configured keys (CURIEs or absolute IRIs) against the prefix table.
    ///
    /// An undefined prefix is an error.
    pub fn from_curies(
        mappings: &BTreeMap<String, String>,
        prefixes: &BTreeMap<String, String>,
    ) -> Result<Self, CurieError> {
        let mut mapping = Self::new();
        for (curie, template) in mappings {
            let iri = expand_curie(curie, prefixes)?;
            mapping.insert(NamedNode::new_unchecked(iri), template.clone());
        }
        Ok(mapping)
    }

    pub fn insert(&mut self, class: NamedNode, template: impl Into<String>) {
        self.templates.insert(class, template.into());
    }

    pub fn get(&self, class: &NamedNode) -> Option<&str> {
        self.templates.get(class).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NamedNode, &str)> {
        self.templates.iter().map(|(c, t)| (c, t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<T: Into<String>> FromIterator<(NamedNode, T)> for TemplateMapping {
    fn from_iter<I: IntoIterator<Item = (NamedNode, T)>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().map(|(c, t)| (c, t.into())).collect(),
        }
    }
}

/// Resource → resolved template name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceTemplateIndex {
    templates: BTreeMap<Resource, String>,
}

impl ResourceTemplateIndex {
    pub(crate) fn insert(&mut self, resource: Resource, template: String) {
        self.templates.insert(resource, template);
    }

    pub fn get(&self, resource: &Resource) -> Option<&str> {
        self.templates.get(resource).map(String::as_str)
    }

    /// Entries in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (&Resource, &str)> {
        self.templates.iter().map(|(r, t)| (r, t.as_str()))
    }

    /// Plain string view for printing.
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.templates
            .iter()
            .map(|(r, t)| (r.to_string(), t.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
