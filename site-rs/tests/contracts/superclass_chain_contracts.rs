// Superclass Chain Contract Tests
//
// Invariants of the class → ancestor chain index that template resolution
// depends on. A chain is read from the universal root to the class itself;
// resolution walks it backwards, so order and termination are load-bearing.

use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;
use rdfsite_core::graph::vocab::OWL_THING;
use rdfsite_core::graph::{RdfGraph, Resource};
use rdfsite_core::index::{
    compute_class_superclass_index, compute_resource_class_index, superclass_chain, ClassIndex,
    ResourceSet,
};

const UPPER: &str = "https://example.com/upper/";

const ONTOLOGY: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix upper: <https://example.com/upper/> .
@prefix ex: <https://example.com/jinjardf/> .

upper:Tangible rdfs:subClassOf owl:Thing .
upper:LivingThing rdfs:subClassOf upper:Tangible .
upper:Animal rdfs:subClassOf upper:LivingThing .
upper:Mammal rdfs:subClassOf upper:Animal .
upper:Dog rdfs:subClassOf upper:Mammal .

upper:A rdfs:subClassOf upper:B .
upper:B rdfs:subClassOf upper:A .

upper:C rdfs:subClassOf upper:E , upper:D .

upper:Loop rdfs:subClassOf upper:Loop .

ex:fido a upper:Dog ; rdfs:label "Fido" .
ex:cyclic a upper:A .
ex:mixed a upper:C .
"#;

fn graph() -> RdfGraph {
    let graph = RdfGraph::new().unwrap();
    graph.load_str(ONTOLOGY, RdfFormat::Turtle).unwrap();
    graph
}

fn upper(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{}{}", UPPER, local))
}

fn chain_of(locals: &[&str]) -> Vec<NamedNode> {
    std::iter::once(OWL_THING.into_owned())
        .chain(locals.iter().map(|l| upper(l)))
        .collect()
}

fn class_index(graph: &RdfGraph, locals: &[&str]) -> ClassIndex {
    let resources: ResourceSet = locals
        .iter()
        .map(|l| Resource::Iri(NamedNode::new_unchecked(format!("https://example.com/jinjardf/{}", l))))
        .collect();
    compute_resource_class_index(graph, &resources).unwrap()
}

/// INVARIANT: chains start at owl:Thing and end at the class itself
/// BREAKS: resolution distance, which counts from the end of the chain
#[test]
fn chain_is_root_first_class_last() {
    let graph = graph();
    let walk = superclass_chain(&graph, &upper("Dog")).unwrap();

    assert_eq!(
        walk.chain,
        chain_of(&["Tangible", "LivingThing", "Animal", "Mammal", "Dog"])
    );
    assert!(!walk.truncated);
}

/// INVARIANT: owl:Thing appears exactly once, even when declared as a parent
#[test]
fn universal_root_is_never_duplicated() {
    let graph = graph();
    let walk = superclass_chain(&graph, &upper("Tangible")).unwrap();

    assert_eq!(walk.chain, chain_of(&["Tangible"]));
    assert_eq!(
        walk.chain.iter().filter(|c| c.as_ref() == OWL_THING).count(),
        1
    );
}

/// INVARIANT: a class unknown to the graph still gets [Thing, class]
#[test]
fn undeclared_class_gets_minimal_chain() {
    let graph = graph();
    let walk = superclass_chain(&graph, &upper("Unicorn")).unwrap();

    assert_eq!(walk.chain, chain_of(&["Unicorn"]));
}

/// INVARIANT: cyclic subclass relations terminate with each class at most once
/// BREAKS: generation hangs on a malformed ontology
#[test]
fn cycle_terminates_without_repeats() {
    let graph = graph();
    let walk = superclass_chain(&graph, &upper("A")).unwrap();

    assert_eq!(walk.chain, chain_of(&["B", "A"]));
    assert!(walk.truncated);

    let mut seen = std::collections::BTreeSet::new();
    assert!(walk.chain.iter().all(|class| seen.insert(class.clone())));
}

/// INVARIANT: a class declared as its own superclass is not a cycle
#[test]
fn self_subclass_is_ignored() {
    let graph = graph();
    let walk = superclass_chain(&graph, &upper("Loop")).unwrap();

    assert_eq!(walk.chain, chain_of(&["Loop"]));
    assert!(!walk.truncated);
}

/// INVARIANT: multiple direct superclasses resolve to one deterministic chain
#[test]
fn multiple_inheritance_picks_one_chain() {
    let graph = graph();
    let first = superclass_chain(&graph, &upper("C")).unwrap();
    let second = superclass_chain(&graph, &upper("C")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.chain, chain_of(&["D", "C"]));
}

/// INVARIANT: the index holds a chain for every class asserted by any resource
#[test]
fn index_covers_every_asserted_class() {
    let graph = graph();
    let classes = class_index(&graph, &["fido", "cyclic", "mixed"]);
    let superclasses = compute_class_superclass_index(&graph, &classes).unwrap();

    for class in classes.classes() {
        assert!(superclasses.contains(class), "no chain for {}", class);
    }
    assert_eq!(superclasses.len(), 3);
    assert!(superclasses.truncated().contains(&upper("A")));
    assert!(!superclasses.truncated().contains(&upper("Dog")));
}

/// INVARIANT: building the index twice gives identical content and ordering
#[test]
fn index_is_idempotent() {
    let graph = graph();
    let classes = class_index(&graph, &["fido", "cyclic", "mixed"]);

    let first = compute_class_superclass_index(&graph, &classes).unwrap();
    let second = compute_class_superclass_index(&graph, &classes).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        second.iter().collect::<Vec<_>>()
    );
}
