//! Template resolution: the most specific mapped class of a resource picks its template.

use tracing::debug;

use crate::errors::Result;
use crate::index::{
    ClassIndex, IndexError, ResourceSet, ResourceTemplateIndex, SuperclassIndex, TemplateMapping,
};

/// Resolve every resource in `resources` to a template name.
///
/// For each asserted class the chain is searched from the class itself
/// upwards; the first mapped class found gives a candidate ranked by its
/// distance from the asserted class. The closest candidate wins; equal
/// distances go to the class asserted first. With no candidate the
/// resource gets `default_template`.
///
/// A resource missing from `classes`, or a class missing from
/// `superclasses`, means the indices were built out of order and aborts
/// resolution.
pub fn compute_resource_template_index(
    resources: &ResourceSet,
    classes: &ClassIndex,
    superclasses: &SuperclassIndex,
    mapping: &TemplateMapping,
    default_template: &str,
) -> Result<ResourceTemplateIndex> {
    let mut index = ResourceTemplateIndex::default();

    for resource in resources {
        let asserted = classes
            .get(resource)
            .ok_or_else(|| IndexError::MissingResource(resource.to_string()))?;

        let mut best: Option<((usize, usize), &str)> = None;

        for (position, class) in asserted.iter().enumerate() {
            let chain = superclasses
                .chain(class)
                .ok_or_else(|| IndexError::MissingClass(class.to_string()))?;

            let hit = chain
                .iter()
                .rev()
                .enumerate()
                .find_map(|(distance, ancestor)| mapping.get(ancestor).map(|t| (distance, t)));

            if let Some((distance, template)) = hit {
                let rank = (distance, position);
                if best.map_or(true, |(current, _)| rank < current) {
                    best = Some((rank, template));
                }
            }
        }

        let template = best.map_or(default_template, |(_, template)| template);
        debug!("{} → {}", resource, template);
        index.insert(resource.clone(), template.to_string());
    }

    Ok(index)
}
