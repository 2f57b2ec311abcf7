// Template Resolution Contract Tests
//
// Which template a resource gets is the observable output of the indexing
// pipeline. These pin the resolution rules: most specific mapped class
// wins, unmapped resources fall back to the default template.

use std::collections::BTreeMap;

use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;
use rdfsite_core::graph::{RdfGraph, Resource, SparqlQuery};
use rdfsite_core::index::{
    compute_class_superclass_index, compute_resource_class_index,
    compute_resource_template_index, extract_resources, ResourceTemplateIndex, TemplateMapping,
};

const PREFIX: &str = "https://example.com/jinjardf/";
const DEFAULT: &str = "default.html.jinja";

const DATA: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix void: <http://rdfs.org/ns/void#> .
@prefix upper: <https://example.com/upper/> .
@prefix example: <https://example.com/jinjardf/> .

upper:Tangible rdfs:subClassOf owl:Thing .
upper:LivingThing rdfs:subClassOf upper:Tangible .
upper:Animal rdfs:subClassOf upper:LivingThing .
upper:Mammal rdfs:subClassOf upper:Animal .
upper:Dog rdfs:subClassOf upper:Mammal .

example: a void:Dataset ; rdfs:label "Example dataset" .
example:fido a upper:Dog ; rdfs:label "Fido" .
example:rex a upper:Dog , upper:Mammal .
example:moby a upper:Mammal .
example:rock rdfs:label "A rock" .
"#;

fn graph() -> RdfGraph {
    let graph = RdfGraph::new().unwrap();
    graph.load_str(DATA, RdfFormat::Turtle).unwrap();
    graph
}

fn prefixes() -> BTreeMap<String, String> {
    [
        ("void", "http://rdfs.org/ns/void#"),
        ("upper", "https://example.com/upper/"),
        ("example", PREFIX),
    ]
    .into_iter()
    .map(|(p, n)| (p.to_string(), n.to_string()))
    .collect()
}

fn mapping(entries: &[(&str, &str)]) -> TemplateMapping {
    let raw: BTreeMap<String, String> = entries
        .iter()
        .map(|(c, t)| (c.to_string(), t.to_string()))
        .collect();
    TemplateMapping::from_curies(&raw, &prefixes()).unwrap()
}

fn resolve(graph: &RdfGraph, mapping: &TemplateMapping) -> ResourceTemplateIndex {
    let resources = extract_resources(graph, &SparqlQuery::default_restriction(PREFIX)).unwrap();
    let classes = compute_resource_class_index(graph, &resources).unwrap();
    let superclasses = compute_class_superclass_index(graph, &classes).unwrap();
    compute_resource_template_index(&resources, &classes, &superclasses, mapping, DEFAULT).unwrap()
}

fn resource(local: &str) -> Resource {
    Resource::Iri(NamedNode::new_unchecked(format!("{}{}", PREFIX, local)))
}

/// INVARIANT: every selected resource gets exactly one template
#[test]
fn every_selected_resource_resolves() {
    let graph = graph();
    let index = resolve(&graph, &mapping(&[("void:Dataset", "dataset.html.jinja")]));

    assert_eq!(index.len(), 5);
    for local in ["", "fido", "rex", "moby", "rock"] {
        assert!(index.get(&resource(local)).is_some(), "{} unresolved", local);
    }
}

/// INVARIANT: a resource whose chain holds no mapped class gets the default
#[test]
fn unmapped_chain_falls_back_to_default() {
    let graph = graph();
    let index = resolve(&graph, &mapping(&[("void:Dataset", "dataset.html.jinja")]));

    assert_eq!(index.get(&resource("fido")), Some(DEFAULT));
    assert_eq!(index.get(&resource("rock")), Some(DEFAULT));
}

/// INVARIANT: a directly asserted mapped class resolves to its own template
#[test]
fn dataset_node_resolves_directly() {
    let graph = graph();
    let index = resolve(&graph, &mapping(&[("void:Dataset", "dataset.html.jinja")]));

    assert_eq!(index.get(&resource("")), Some("dataset.html.jinja"));
}

/// INVARIANT: an ancestor's mapping applies to subclasses without their own
#[test]
fn ancestor_mapping_is_inherited() {
    let graph = graph();
    let index = resolve(&graph, &mapping(&[("upper:Mammal", "mammal.html")]));

    assert_eq!(index.get(&resource("fido")), Some("mammal.html"));
    assert_eq!(index.get(&resource("rex")), Some("mammal.html"));
    assert_eq!(index.get(&resource("moby")), Some("mammal.html"));
}

/// INVARIANT: the more specific class beats its ancestor, whichever is asserted
#[test]
fn most_specific_mapping_wins() {
    let graph = graph();
    let index = resolve(
        &graph,
        &mapping(&[("upper:Mammal", "mammal.html"), ("upper:Dog", "dog.html")]),
    );

    assert_eq!(index.get(&resource("fido")), Some("dog.html"));
    // asserted both Dog and Mammal: Dog is a direct hit, Mammal too, Dog asserted first
    assert_eq!(index.get(&resource("rex")), Some("dog.html"));
    assert_eq!(index.get(&resource("moby")), Some("mammal.html"));
}

/// INVARIANT: full IRIs and CURIEs in the mapping are interchangeable
#[test]
fn absolute_iri_mapping_keys() {
    let graph = graph();
    let index = resolve(
        &graph,
        &mapping(&[("https://example.com/upper/Animal", "animal.html")]),
    );

    assert_eq!(index.get(&resource("fido")), Some("animal.html"));
}

/// INVARIANT: resolution is deterministic across runs
#[test]
fn resolution_is_repeatable() {
    let graph = graph();
    let mapping = mapping(&[("upper:Mammal", "mammal.html"), ("void:Dataset", "dataset.html.jinja")]);

    assert_eq!(resolve(&graph, &mapping), resolve(&graph, &mapping));
}

/// INVARIANT: an undefined prefix in the mapping is rejected, never silently dropped
#[test]
fn undefined_mapping_prefix_is_an_error() {
    let mut raw = BTreeMap::new();
    raw.insert("nope:Dog".to_string(), "dog.html".to_string());

    assert!(TemplateMapping::from_curies(&raw, &prefixes()).is_err());
}
