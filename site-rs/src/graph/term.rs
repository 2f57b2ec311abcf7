//! Resource identity: the IRI or blank node a page is generated for.

use std::cmp::Ordering;
use std::fmt;

use oxigraph::model::{BlankNode, NamedNode, Subject, SubjectRef, Term};

/// An RDF node selected for page generation.
///
/// Ordered by kind (IRIs before blank nodes) and then by identifier, which
/// gives the generator a stable rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Iri(NamedNode),
    Blank(BlankNode),
}

impl Resource {
    pub fn iri(iri: NamedNode) -> Self {
        Resource::Iri(iri)
    }

    /// IRI or blank node identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Resource::Iri(node) => node.as_str(),
            Resource::Blank(node) => node.as_str(),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Resource::Iri(_))
    }

    pub fn as_subject(&self) -> SubjectRef<'_> {
        match self {
            Resource::Iri(node) => node.as_ref().into(),
            Resource::Blank(node) => node.as_ref().into(),
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Resource::Iri(node) => node.clone().into(),
            Resource::Blank(node) => node.clone().into(),
        }
    }

    /// Literals (and quoted triples) cannot be resources.
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::NamedNode(node) => Some(Resource::Iri(node.clone())),
            Term::BlankNode(node) => Some(Resource::Blank(node.clone())),
            _ => None,
        }
    }

    pub fn from_subject(subject: &Subject) -> Option<Self> {
        match subject {
            Subject::NamedNode(node) => Some(Resource::Iri(node.clone())),
            Subject::BlankNode(node) => Some(Resource::Blank(node.clone())),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Resource::Iri(_) => 0,
            Resource::Blank(_) => 1,
        }
    }
}

impl Ord for Resource {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for Resource {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(node) => write!(f, "{}", node.as_str()),
            Resource::Blank(node) => write!(f, "_:{}", node.as_str()),
        }
    }
}

impl From<NamedNode> for Resource {
    fn from(node: NamedNode) -> Self {
        Resource::Iri(node)
    }
}
