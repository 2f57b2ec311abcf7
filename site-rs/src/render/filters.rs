//! RDF filters for templates.
//!
//! Filters that read the graph get the shared [`RenderContext`] through the
//! closure registered in [`register`]. Positional and keyword arguments are
//! both accepted, so `node | rdf_property(RDFS.label, 'en')` and
//! `node | rdf_property(RDFS.label, language='en')` are equivalent.

use std::sync::Arc;

use minijinja::value::{Kwargs, Value};
use minijinja::{Environment, Error, ErrorKind};
use oxigraph::model::{NamedNodeRef, Term};
use tracing::debug;

use crate::graph::vocab::{DESCRIPTION_PROPERTIES, TITLE_PROPERTIES};
use crate::graph::{GraphError, Resource, SparqlQuery};
use crate::render::environment::RenderContext;
use crate::render::node::{iri_arg, native_value, resource_arg, term_arg, Node, SolutionRow};
use crate::site::url;

/// Language code selecting literals without a language tag
pub const UNTAGGED: &str = "untagged";

pub fn register(env: &mut Environment<'static>, ctx: Arc<RenderContext>) {
    env.add_filter("rdf_get", rdf_get);
    env.add_filter("toPython", to_python);
    env.add_filter("is_iri", is_iri);
    env.add_filter("is_bnode", is_bnode);
    env.add_filter("is_resource", is_resource);
    env.add_filter("is_literal", is_literal);

    let c = ctx.clone();
    env.add_filter(
        "rdf_property",
        move |subject: Value, predicate: Value, language: Option<String>, unique: Option<bool>, kwargs: Kwargs| {
            let language = positional_or_kwarg(language, &kwargs, "language")?;
            let unique = positional_or_kwarg(unique, &kwargs, "unique")?;
            kwargs.assert_all_used()?;
            let objects = rdf_property(&c, &subject, &predicate, language.as_deref(), unique.unwrap_or(false))?;
            Ok::<_, Error>(node_list(objects))
        },
    );

    let c = ctx.clone();
    env.add_filter(
        "rdf_property_any",
        move |subject: Value, predicate: Value, language: Option<String>, kwargs: Kwargs| {
            let language = positional_or_kwarg(language, &kwargs, "language")?;
            kwargs.assert_all_used()?;
            let object = rdf_property_any(&c, &subject, &predicate, language.as_deref())?;
            Ok::<_, Error>(optional_node(object))
        },
    );

    let c = ctx.clone();
    env.add_filter(
        "rdf_inverse_property",
        move |object: Value, predicate: Value, unique: Option<bool>, kwargs: Kwargs| {
            let unique = positional_or_kwarg(unique, &kwargs, "unique")?;
            kwargs.assert_all_used()?;
            let subjects = rdf_inverse_property(&c, &object, &predicate, unique.unwrap_or(false))?;
            Ok::<_, Error>(node_list(subjects))
        },
    );

    let c = ctx.clone();
    env.add_filter("rdf_inverse_property_any", move |object: Value, predicate: Value| {
        let subject = rdf_inverse_property(&c, &object, &predicate, false)?.into_iter().next();
        Ok::<_, Error>(optional_node(subject))
    });

    let c = ctx.clone();
    env.add_filter("sparql_query", move |resource: Value, query: String| {
        sparql_query(&c, &resource, &query)
    });

    let c = ctx.clone();
    env.add_filter("statements_as_subject", move |resource: Value, _as_list: Option<bool>| {
        let subject = resource_arg(&resource)?;
        let triples = c
            .graph
            .triples(Some(subject.as_subject()), None, None)
            .map_err(graph_error)?;
        Ok::<_, Error>(statement_list(triples))
    });

    let c = ctx.clone();
    env.add_filter("statements_as_object", move |resource: Value, _as_list: Option<bool>| {
        let object = term_arg(&resource)?;
        let triples = c
            .graph
            .triples(None, None, Some(object.as_ref()))
            .map_err(graph_error)?;
        Ok::<_, Error>(statement_list(triples))
    });

    for (name, properties) in [
        ("title", &TITLE_PROPERTIES[..]),
        ("description", &DESCRIPTION_PROPERTIES[..]),
    ] {
        let c = ctx.clone();
        env.add_filter(
            name,
            move |resource: Value, languages: Option<Value>, return_first: Option<bool>, default: Option<Value>, kwargs: Kwargs| {
                let languages = positional_or_kwarg(languages, &kwargs, "languages")?;
                let return_first = positional_or_kwarg(return_first, &kwargs, "return_first")?;
                let default = positional_or_kwarg(default, &kwargs, "default")?;
                kwargs.assert_all_used()?;

                let languages = language_list(languages)?;
                get_text(&c, &resource, properties, &languages, return_first.unwrap_or(false), default)
            },
        );
    }

    // single-value variants: (languages, default)
    for (name, properties) in [
        ("title_any", &TITLE_PROPERTIES[..]),
        ("description_any", &DESCRIPTION_PROPERTIES[..]),
    ] {
        let c = ctx.clone();
        env.add_filter(
            name,
            move |resource: Value, languages: Option<Value>, default: Option<Value>, kwargs: Kwargs| {
                let languages = positional_or_kwarg(languages, &kwargs, "languages")?;
                let default = positional_or_kwarg(default, &kwargs, "default")?;
                kwargs.assert_all_used()?;

                let languages = language_list(languages)?;
                get_text(&c, &resource, properties, &languages, true, default)
            },
        );
    }

    let c = ctx;
    env.add_filter("relative_uri", move |resource: Value| {
        relative_uri(&c.globals.site_url, &c.globals.resource_prefix, &resource.to_string())
    });
}

fn positional_or_kwarg<T>(positional: Option<T>, kwargs: &Kwargs, name: &str) -> Result<Option<T>, Error>
where
    T: for<'a> minijinja::value::ArgType<'a, Output = T>,
{
    match positional {
        Some(value) => Ok(Some(value)),
        None => kwargs.get::<Option<T>>(name),
    }
}

fn graph_error(err: GraphError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string())
}

fn node_list(terms: Vec<Term>) -> Value {
    Value::from(terms.into_iter().map(Node::value).collect::<Vec<_>>())
}

fn optional_node(term: Option<Term>) -> Value {
    term.map(Node::value).unwrap_or_else(|| Value::from(()))
}

fn statement_list(triples: Vec<oxigraph::model::Triple>) -> Value {
    Value::from(
        triples
            .into_iter()
            .map(|t| {
                Value::from(vec![
                    Node::value(t.subject.into()),
                    Node::value(t.predicate.into()),
                    Node::value(t.object),
                ])
            })
            .collect::<Vec<_>>(),
    )
}

/// `'https://example.com/foo' | rdf_get` → IRI node
pub fn rdf_get(iri: Value) -> Result<Value, Error> {
    Ok(Node::value(iri_arg(&iri)?.into()))
}

/// Plain value (string, number, boolean) for a node; none stays none
pub fn to_python(node: Value) -> Value {
    match node.downcast_object_ref::<Node>() {
        Some(node) => native_value(node.term()),
        None => node,
    }
}

fn term_of(value: &Value) -> Option<&Term> {
    value.downcast_object_ref::<Node>().map(Node::term)
}

pub fn is_iri(node: Value) -> bool {
    matches!(term_of(&node), Some(Term::NamedNode(_)))
}

pub fn is_bnode(node: Value) -> bool {
    matches!(term_of(&node), Some(Term::BlankNode(_)))
}

pub fn is_resource(node: Value) -> bool {
    matches!(term_of(&node), Some(Term::NamedNode(_) | Term::BlankNode(_)))
}

pub fn is_literal(node: Value) -> bool {
    matches!(term_of(&node), Some(Term::Literal(_)))
}

fn language_matches(term: &Term, language: Option<&str>) -> bool {
    match language {
        None | Some("") => true,
        Some(UNTAGGED) => matches!(term, Term::Literal(l) if l.language().is_none()),
        Some(language) => matches!(term, Term::Literal(l) if l.language() == Some(language)),
    }
}

/// Objects of (`subject`, `predicate`, ?o), optionally restricted to one language
pub fn rdf_property(
    ctx: &RenderContext,
    subject: &Value,
    predicate: &Value,
    language: Option<&str>,
    unique: bool,
) -> Result<Vec<Term>, Error> {
    let subject = resource_arg(subject)?;
    let predicate = iri_arg(predicate)?;
    objects_for(ctx, &subject, predicate.as_ref(), language, unique)
}

fn objects_for(
    ctx: &RenderContext,
    subject: &Resource,
    predicate: NamedNodeRef<'_>,
    language: Option<&str>,
    unique: bool,
) -> Result<Vec<Term>, Error> {
    let mut objects: Vec<Term> = ctx
        .graph
        .objects(subject.as_subject(), predicate)
        .map_err(graph_error)?
        .into_iter()
        .filter(|term| language_matches(term, language))
        .collect();

    if unique {
        dedup_stable(&mut objects);
    }
    Ok(objects)
}

fn dedup_stable(terms: &mut Vec<Term>) {
    let mut seen = std::collections::HashSet::new();
    terms.retain(|term| seen.insert(term.clone()));
}

/// One object of (`subject`, `predicate`, ?o), or none
pub fn rdf_property_any(
    ctx: &RenderContext,
    subject: &Value,
    predicate: &Value,
    language: Option<&str>,
) -> Result<Option<Term>, Error> {
    Ok(rdf_property(ctx, subject, predicate, language, false)?
        .into_iter()
        .next())
}

/// Subjects of (?s, `predicate`, `object`)
pub fn rdf_inverse_property(
    ctx: &RenderContext,
    object: &Value,
    predicate: &Value,
    unique: bool,
) -> Result<Vec<Term>, Error> {
    let object = term_arg(object)?;
    let predicate = iri_arg(predicate)?;
    let mut subjects: Vec<Term> = ctx
        .graph
        .subjects(predicate.as_ref(), object.as_ref())
        .map_err(graph_error)?
        .into_iter()
        .map(Term::from)
        .collect();

    if unique {
        dedup_stable(&mut subjects);
    }
    Ok(subjects)
}

/// Run `query` with every `?resourceUri` bound to `resource`; rows are maps keyed by variable
///
/// Only IRIs can be bound: a blank node would act as a fresh variable and
/// match every row.
pub fn sparql_query(ctx: &RenderContext, resource: &Value, query: &str) -> Result<Value, Error> {
    let resource = resource_arg(resource)?;
    if let Resource::Blank(node) = &resource {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("sparql_query cannot bind the blank node {} to ?resourceUri", node),
        ));
    }
    let query = SparqlQuery::new(query)
        .bind_resource(&resource)
        .with_prefixes(&ctx.globals.prefixes);

    let rows = ctx.graph.query(&query).map_err(graph_error)?;
    debug!("sparql_query for {} returned {} rows", resource, rows.len());
    Ok(Value::from(rows.into_iter().map(SolutionRow::value).collect::<Vec<_>>()))
}

fn language_list(languages: Option<Value>) -> Result<Vec<String>, Error> {
    let Some(languages) = languages else {
        return Ok(Vec::new());
    };
    if languages.is_none() || languages.is_undefined() {
        return Ok(Vec::new());
    }
    if let Some(single) = languages.as_str() {
        return Ok(vec![single.to_string()]);
    }

    languages
        .try_iter()?
        .map(|language| {
            language.as_str().map(str::to_string).ok_or_else(|| {
                Error::new(ErrorKind::InvalidOperation, "language codes must be strings")
            })
        })
        .collect()
}

/// Literals for `resource` via any of `properties`, language by language.
///
/// Languages are tried in order, then untagged literals. With
/// `return_first` only the first hit (or `default`, or none) is returned;
/// otherwise a list with one literal per language/property hit, or
/// `[default]` when nothing matched.
pub fn get_text(
    ctx: &RenderContext,
    resource: &Value,
    properties: &[NamedNodeRef<'static>],
    languages: &[String],
    return_first: bool,
    default: Option<Value>,
) -> Result<Value, Error> {
    let resource = resource_arg(resource)?;
    let mut literals = Vec::new();

    for language in languages.iter().map(String::as_str).chain(std::iter::once(UNTAGGED)) {
        for property in properties {
            let found = objects_for(ctx, &resource, *property, Some(language), false)?
                .into_iter()
                .next();
            if let Some(literal) = found {
                if return_first {
                    return Ok(Node::value(literal));
                }
                literals.push(Node::value(literal));
            }
        }
    }

    let default = default.filter(|d| !d.is_none() && !d.is_undefined());
    if return_first {
        return Ok(default.unwrap_or_else(|| Value::from(())));
    }
    if literals.is_empty() {
        if let Some(default) = default {
            literals.push(default);
        }
    }
    Ok(Value::from(literals))
}

/// Site-relative form of a resource IRI
///
/// Under `site_url` the URL path is returned, under `resource_prefix` a
/// `/`-rooted remainder; anything else unchanged.
pub fn relative_uri(site_url: &str, resource_prefix: &str, resource: &str) -> String {
    if resource.starts_with(site_url) {
        url::path_of(resource).unwrap_or_else(|| resource.to_string())
    } else if let Some(rest) = resource.strip_prefix(resource_prefix) {
        format!("/{}", rest)
    } else {
        resource.to_string()
    }
}
