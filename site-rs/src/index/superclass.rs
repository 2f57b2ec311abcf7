/**
 * superclass.rs
 * Ancestor chains over rdfs:subClassOf
 *
 * The walk follows one parent per step. With several direct superclasses the
 * lexicographically smallest IRI is taken, owl:Thing only when nothing else
 * is available. A parent already on the path ends the walk (cycle guard).
 * owl:Thing is placed at the head of every chain without touching the graph.
 */

use std::collections::BTreeSet;

use oxigraph::model::{NamedNode, Term};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::graph::vocab::{OWL_THING, RDFS_SUB_CLASS_OF};
use crate::graph::RdfGraph;
use crate::index::{ClassIndex, SuperclassIndex};

/// Outcome of one ancestor walk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainWalk {
    /// Root first, the class itself last. Never empty.
    pub chain: Vec<NamedNode>,
    /// The walk hit a cycle and stopped early.
    pub truncated: bool,
}

/// Compute the ancestor chain of `class`.
///
/// # Example
/// ```no_run
/// # use rdfsite_core::graph::RdfGraph;
/// # use rdfsite_core::index::superclass_chain;
/// # use oxigraph::model::NamedNode;
/// let graph = RdfGraph::load("data/data.ttl").unwrap();
/// let dog = NamedNode::new_unchecked("https://example.com/upper/Dog");
/// let walk = superclass_chain(&graph, &dog).unwrap();
/// assert_eq!(walk.chain.last(), Some(&dog));
/// ```
pub fn superclass_chain(graph: &RdfGraph, class: &NamedNode) -> Result<ChainWalk> {
    let mut chain = vec![class.clone()];
    let mut visited: BTreeSet<NamedNode> = BTreeSet::from([class.clone()]);
    let mut truncated = false;
    let mut current = class.clone();

    while current.as_ref() != OWL_THING {
        let Some(parent) = direct_superclass(graph, &current)? else {
            break;
        };
        if !visited.insert(parent.clone()) {
            truncated = true;
            break;
        }
        chain.push(parent.clone());
        current = parent;
    }

    chain.reverse();
    if chain[0].as_ref() != OWL_THING {
        chain.insert(0, OWL_THING.into_owned());
    }

    Ok(ChainWalk { chain, truncated })
}

fn direct_superclass(graph: &RdfGraph, class: &NamedNode) -> Result<Option<NamedNode>> {
    let mut parents: Vec<NamedNode> = graph
        .objects(class.as_ref().into(), RDFS_SUB_CLASS_OF)?
        .into_iter()
        .filter_map(|term| match term {
            Term::NamedNode(parent) if &parent != class => Some(parent),
            _ => None,
        })
        .collect();

    // owl:Thing sorts last: it is prepended anyway and would end the walk.
    parents.sort_by(|a, b| {
        (a.as_ref() == OWL_THING, a.as_str()).cmp(&(b.as_ref() == OWL_THING, b.as_str()))
    });

    Ok(parents.into_iter().next())
}

/// Build the superclass index for every class that appears in `classes`.
pub fn compute_class_superclass_index(
    graph: &RdfGraph,
    classes: &ClassIndex,
) -> Result<SuperclassIndex> {
    let mut index = SuperclassIndex::new();

    for class in classes.classes() {
        let walk = superclass_chain(graph, class)?;
        if walk.truncated {
            warn!(
                "subclass cycle reached from {}, chain truncated to {} classes",
                class,
                walk.chain.len()
            );
            index.mark_truncated(class.clone());
        }
        debug!("chain for {}: {:?}", class, walk.chain.iter().map(NamedNode::as_str).collect::<Vec<_>>());
        index.insert(class.clone(), walk.chain);
    }

    Ok(index)
}
