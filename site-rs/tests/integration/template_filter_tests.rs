//! Integration tests for the RDF template filters
//!
//! Renders small template strings against an in-memory graph through
//! RdfEnvironment, the way pages see them.

use std::collections::BTreeMap;
use std::sync::Arc;

use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;
use rdfsite_core::graph::{RdfGraph, Resource};
use rdfsite_core::{RdfEnvironment, SiteGlobals};

const DATA: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix upper: <https://example.com/upper/> .
@prefix ex: <https://example.com/jinjardf/> .

ex:fido a upper:Dog ;
    rdfs:label "Fido" , "Fido der Hund"@de , "Fido the dog"@en ;
    dct:description "A good dog"@en ;
    ex:age "7"^^xsd:integer ;
    ex:vaccinated true ;
    ex:friend ex:rex , _:cat .

ex:rex a upper:Dog ;
    dct:title "Rex" .

_:cat rdfs:label "Tom" .

ex:anna ex:owns ex:fido .
ex:bob ex:owns ex:fido .
"#;

fn environment() -> RdfEnvironment {
    let graph = RdfGraph::new().unwrap();
    graph.load_str(DATA, RdfFormat::Turtle).unwrap();

    let prefixes: BTreeMap<String, String> = [
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ("ex", "https://example.com/jinjardf/"),
        ("upper", "https://example.com/upper/"),
    ]
    .into_iter()
    .map(|(p, n)| (p.to_string(), n.to_string()))
    .collect();

    let globals = SiteGlobals {
        base_url: "https://example.com".to_string(),
        base_path: "/jinjardf/".to_string(),
        resource_prefix: "https://example.com/jinjardf/".to_string(),
        site_url: "http://localhost:8000".to_string(),
        prefixes,
    };
    RdfEnvironment::new(Arc::new(graph), globals, None, false)
}

fn fido() -> Resource {
    Resource::Iri(NamedNode::new_unchecked("https://example.com/jinjardf/fido"))
}

fn render(source: &str) -> String {
    environment().render_str(source, &fido()).unwrap()
}

#[test]
fn test_rdf_property_by_language() {
    assert_eq!(
        render("{% for l in node | rdf_property(RDFS.label, 'de') %}{{ l }}{% endfor %}"),
        "Fido der Hund"
    );
    assert_eq!(
        render("{% for l in node | rdf_property(RDFS.label, language='untagged') %}{{ l }}{% endfor %}"),
        "Fido"
    );
    assert_eq!(render("{{ node | rdf_property(RDFS.label) | length }}"), "3");
}

#[test]
fn test_rdf_property_any_missing_is_none() {
    assert_eq!(
        render("{{ node | rdf_property_any(RDFS.seeAlso) is none }}"),
        "True"
    );
    assert_eq!(
        render("{{ node | rdf_property_any('https://purl.org/dc/terms/description') is none }}"),
        "True"
    );
    assert_eq!(
        render("{{ node | rdf_property_any('http://purl.org/dc/terms/description') }}"),
        "A good dog"
    );
}

#[test]
fn test_rdf_inverse_property() {
    assert_eq!(
        render("{{ node | rdf_inverse_property(EX.owns) | map('string') | sort | join(',') }}"),
        "https://example.com/jinjardf/anna,https://example.com/jinjardf/bob"
    );
    assert_eq!(
        render("{{ UPPER.Dog | rdf_inverse_property(RDF.type) | length }}"),
        "2"
    );
    assert_eq!(
        render("{{ node | rdf_inverse_property_any(EX.friend) is none }}"),
        "True"
    );
}

#[test]
fn test_node_kinds() {
    assert_eq!(
        render(
            "{% for f in node | rdf_property(EX.friend) | sort(attribute='kind') %}\
             {{ f.kind }}:{{ f | is_iri }}:{{ f | is_bnode }}:{{ f | is_resource }} \
             {% endfor %}"
        ),
        "bnode:False:True:True iri:True:False:True "
    );
    assert_eq!(
        render("{{ node | rdf_property_any(EX.age) | is_literal }}|{{ node | is_literal }}"),
        "True|False"
    );
}

#[test]
fn test_to_python_gives_native_values() {
    assert_eq!(
        render("{{ (node | rdf_property_any(EX.age) | toPython) + 1 }}"),
        "8"
    );
    assert_eq!(
        render("{% if node | rdf_property_any(EX.vaccinated) | toPython %}yes{% endif %}"),
        "yes"
    );
}

#[test]
fn test_literal_attributes() {
    assert_eq!(
        render("{% set l = node | rdf_property_any(EX.age) %}{{ l.value }} {{ l.datatype }}"),
        "7 http://www.w3.org/2001/XMLSchema#integer"
    );
    assert_eq!(
        render("{{ (node | rdf_property_any(RDFS.label, 'de')).language }}"),
        "de"
    );
}

#[test]
fn test_title_language_order() {
    assert_eq!(render("{{ node | title_any(languages=['de', 'en']) }}"), "Fido der Hund");
    assert_eq!(render("{{ node | title_any(languages=['fr']) }}"), "Fido");
    assert_eq!(render("{{ node | title(languages=['en']) | join('|') }}"), "Fido the dog|Fido");
}

#[test]
fn test_title_falls_back_to_other_properties_and_default() {
    let env = environment();
    let rex = Resource::Iri(NamedNode::new_unchecked("https://example.com/jinjardf/rex"));

    assert_eq!(env.render_str("{{ node | title_any }}", &rex).unwrap(), "Rex");
    assert_eq!(
        env.render_str("{{ node | description_any(default='no description') }}", &rex)
            .unwrap(),
        "no description"
    );
    assert_eq!(
        env.render_str("{{ node | description(default='none') | join }}", &rex)
            .unwrap(),
        "none"
    );
}

#[test]
fn test_any_filters_take_positional_default() {
    let env = environment();
    let anna = Resource::Iri(NamedNode::new_unchecked("https://example.com/jinjardf/anna"));

    assert_eq!(
        env.render_str("{{ node | title_any(['de'], 'Untitled') }}", &anna).unwrap(),
        "Untitled"
    );
    assert_eq!(
        env.render_str("{{ node | description_any(['en'], 'no description') }}", &anna)
            .unwrap(),
        "no description"
    );
    assert_eq!(render("{{ node | title_any(['de'], 'Untitled') }}"), "Fido der Hund");
}

#[test]
fn test_description_by_language() {
    assert_eq!(render("{{ node | description_any(languages=['en']) }}"), "A good dog");
    assert_eq!(render("{{ node | description_any is none }}"), "True");
}

#[test]
fn test_sparql_query_binds_resource() {
    assert_eq!(
        render(
            "{% for row in node | sparql_query('SELECT ?owner WHERE { ?owner ex:owns ?resourceUri } ORDER BY ?owner') %}\
             {{ row.owner }};{% endfor %}"
        ),
        "https://example.com/jinjardf/anna;https://example.com/jinjardf/bob;"
    );
}

#[test]
fn test_sparql_query_rejects_blank_node() {
    let err = environment()
        .render_str(
            "{% for f in node | rdf_property(EX.friend) %}{% if f | is_bnode %}\
             {{ f | sparql_query('SELECT ?l WHERE { ?resourceUri rdfs:label ?l }') | length }}\
             {% endif %}{% endfor %}",
            &fido(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), minijinja::ErrorKind::InvalidOperation);
}

#[test]
fn test_statements() {
    assert_eq!(render("{{ node | statements_as_subject | length }}"), "9");
    assert_eq!(render("{{ node | statements_as_object | length }}"), "2");
    assert_eq!(
        render("{% for s, p, o in node | statements_as_object %}{% if loop.first %}{{ p }}{% endif %}{% endfor %}"),
        "https://example.com/jinjardf/owns"
    );
}

#[test]
fn test_rdf_get_and_relative_uri() {
    assert_eq!(
        render("{{ 'https://example.com/jinjardf/rex' | rdf_get | title_any }}"),
        "Rex"
    );
    assert_eq!(render("{{ node | relative_uri }}"), "/fido");
    assert_eq!(
        render("{{ 'https://other.org/x' | relative_uri }}"),
        "https://other.org/x"
    );
}

#[test]
fn test_unknown_keyword_is_an_error() {
    let err = environment()
        .render_str("{{ node | title_any(lang='en') }}", &fido())
        .unwrap_err();
    assert_eq!(err.kind(), minijinja::ErrorKind::TooManyArguments);
}
