/**
 * node.rs
 * Template-side view of RDF terms
 *
 * - Node: an IRI, blank node or literal; renders as its IRI / id / lexical form
 * - Namespace: `{{ VOID.Dataset }}` style IRI construction
 * - SolutionRow: one SPARQL result row, indexable by variable name
 */

use std::fmt;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use minijinja::{Error, ErrorKind};
use oxigraph::model::{Literal, NamedNode, Term};

use crate::graph::vocab::XSD;
use crate::graph::{QueryRow, Resource};

#[derive(Debug, Clone, PartialEq)]
pub struct Node(Term);

impl Node {
    pub fn new(term: Term) -> Self {
        Self(term)
    }

    pub fn term(&self) -> &Term {
        &self.0
    }

    /// Wrap a term as a template value
    pub fn value(term: Term) -> Value {
        Value::from_object(Self(term))
    }

    pub fn from_resource(resource: &Resource) -> Value {
        Self::value(resource.to_term())
    }

    /// IRI, blank node id or lexical form
    pub fn lexical(&self) -> &str {
        match &self.0 {
            Term::NamedNode(node) => node.as_str(),
            Term::BlankNode(node) => node.as_str(),
            Term::Literal(literal) => literal.value(),
            #[allow(unreachable_patterns)]
            _ => "",
        }
    }

    pub fn kind(&self) -> &'static str {
        match &self.0 {
            Term::NamedNode(_) => "iri",
            Term::BlankNode(_) => "bnode",
            Term::Literal(_) => "literal",
            #[allow(unreachable_patterns)]
            _ => "triple",
        }
    }

    pub fn literal(&self) -> Option<&Literal> {
        match &self.0 {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl Object for Node {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let value = match key.as_str()? {
            "value" => Value::from(self.lexical()),
            "kind" => Value::from(self.kind()),
            "language" => match self.literal().and_then(Literal::language) {
                Some(language) => Value::from(language),
                None => Value::from(()),
            },
            "datatype" => match self.literal() {
                Some(literal) => Node::value(literal.datatype().into_owned().into()),
                None => Value::from(()),
            },
            _ => return None,
        };
        Some(value)
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexical())
    }
}

/// A prefix namespace; attribute access appends the local name.
#[derive(Debug, Clone)]
pub struct Namespace {
    iri: String,
}

impl Namespace {
    pub fn new(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }
}

impl Object for Namespace {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let local = key.as_str()?;
        let iri = NamedNode::new(format!("{}{}", self.iri, local)).ok()?;
        Some(Node::value(iri.into()))
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iri)
    }
}

/// Variable bindings of one query solution
#[derive(Debug, Clone)]
pub struct SolutionRow {
    bindings: QueryRow,
}

impl SolutionRow {
    pub fn value(bindings: QueryRow) -> Value {
        Value::from_object(Self { bindings })
    }
}

impl Object for SolutionRow {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let name = key.as_str()?;
        self.bindings
            .iter()
            .find(|(var, _)| var == name)
            .map(|(_, term)| Node::value(term.clone()))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(
            self.bindings
                .iter()
                .map(|(var, _)| Value::from(var.as_str()))
                .collect(),
        )
    }
}

/// Resource for a filter's input: a node object or an IRI string
pub fn resource_arg(value: &Value) -> Result<Resource, Error> {
    if let Some(node) = value.downcast_object_ref::<Node>() {
        return Resource::from_term(node.term()).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("expected an IRI or blank node, got literal '{}'", node.lexical()),
            )
        });
    }
    iri_arg(value).map(Resource::Iri)
}

/// IRI argument: an IRI node, a namespace attribute or a plain string
pub fn iri_arg(value: &Value) -> Result<NamedNode, Error> {
    if let Some(node) = value.downcast_object_ref::<Node>() {
        return match node.term() {
            Term::NamedNode(iri) => Ok(iri.clone()),
            _ => Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("expected an IRI, got {} '{}'", node.kind(), node.lexical()),
            )),
        };
    }

    let text = value.as_str().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("expected an IRI, got {}", value.kind()),
        )
    })?;
    NamedNode::new(text).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, format!("invalid IRI '{}': {}", text, e))
    })
}

/// Any term: nodes pass through, strings are read as IRIs
pub fn term_arg(value: &Value) -> Result<Term, Error> {
    match value.downcast_object_ref::<Node>() {
        Some(node) => Ok(node.term().clone()),
        None => iri_arg(value).map(Term::from),
    }
}

/// Plain template value for a term: numbers, booleans and strings for
/// literals, the IRI string for IRIs.
pub fn native_value(term: &Term) -> Value {
    let Term::Literal(literal) = term else {
        return Value::from(Node::new(term.clone()).lexical());
    };

    let lexical = literal.value();
    let datatype = literal.datatype().as_str();
    let Some(local) = datatype.strip_prefix(XSD) else {
        return Value::from(lexical);
    };

    match local {
        "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" | "unsignedInt"
        | "unsignedLong" | "unsignedShort" | "unsignedByte" => lexical
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(lexical)),
        "decimal" | "double" | "float" => lexical
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(lexical)),
        "boolean" => match lexical {
            "true" | "1" => Value::from(true),
            "false" | "0" => Value::from(false),
            _ => Value::from(lexical),
        },
        _ => Value::from(lexical),
    }
}
