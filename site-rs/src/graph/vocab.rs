//! Vocabulary terms the generator and the template filters rely on.

use oxigraph::model::NamedNodeRef;

pub const RDF_TYPE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");

pub const RDFS_SUB_CLASS_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#subClassOf");

pub const RDFS_LABEL: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");

pub const RDFS_COMMENT: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#comment");

/// Universal root of every superclass chain.
pub const OWL_THING: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");

pub const DCT_TITLE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");

pub const DCT_DESCRIPTION: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");

pub const FOAF_NAME: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/name");

pub const SCHEMA_NAME: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("https://schema.org/name");

pub const SCHEMA_DESCRIPTION: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("https://schema.org/description");

pub const SKOS_PREF_LABEL: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#prefLabel");

/// Properties that all mean something like "title".
pub static TITLE_PROPERTIES: [NamedNodeRef<'static>; 5] =
    [RDFS_LABEL, DCT_TITLE, FOAF_NAME, SCHEMA_NAME, SKOS_PREF_LABEL];

/// Properties that all mean something like "description".
pub static DESCRIPTION_PROPERTIES: [NamedNodeRef<'static>; 3] =
    [RDFS_COMMENT, DCT_DESCRIPTION, SCHEMA_DESCRIPTION];

pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
