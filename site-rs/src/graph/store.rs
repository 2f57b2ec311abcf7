/**
 * store.rs
 * Read-only RDF graph facade over an in-memory Oxigraph store
 */

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use oxigraph::io::RdfFormat;
use oxigraph::model::{GraphNameRef, NamedNodeRef, Subject, SubjectRef, Term, TermRef, Triple};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use thiserror::Error;
use tracing::{debug, info};

use crate::graph::query::{QueryRow, SparqlQuery};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to load dataset: {0}")]
    LoadError(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Unsupported RDF format: {0}")]
    UnsupportedFormat(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Oxigraph error: {0}")]
    StoreError(String),
}

/// The loaded dataset. Treated as immutable once loading is done.
pub struct RdfGraph {
    store: Store,
    source: Option<PathBuf>,
}

impl RdfGraph {
    /// Create an empty graph
    pub fn new() -> Result<Self, GraphError> {
        let store = Store::new().map_err(|e| GraphError::StoreError(e.to_string()))?;

        Ok(Self {
            store,
            source: None,
        })
    }

    /// Create a graph and load the dataset at `path` into it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let mut graph = Self::new()?;
        graph.load_file(path.as_ref())?;
        Ok(graph)
    }

    /// Load an RDF file, choosing the parser by file extension
    pub fn load_file(&mut self, path: &Path) -> Result<(), GraphError> {
        if !path.exists() {
            return Err(GraphError::NotFound(path.display().to_string()));
        }

        if path.is_dir() {
            return Err(GraphError::LoadError(format!(
                "Path is a directory: {}",
                path.display()
            )));
        }

        let format = format_for_path(path)?;
        info!("loading dataset {} as {:?}", path.display(), format);

        let reader = BufReader::new(File::open(path)?);
        self.store
            .load_from_reader(format, reader)
            .map_err(|e| GraphError::LoadError(format!("{}: {}", path.display(), e)))?;

        self.source = Some(path.to_path_buf());
        debug!("graph now holds {} triples", self.len());
        Ok(())
    }

    /// Load RDF from an in-memory string
    pub fn load_str(&self, data: &str, format: RdfFormat) -> Result<(), GraphError> {
        self.store
            .load_from_reader(format, data.as_bytes())
            .map_err(|e| GraphError::LoadError(e.to_string()))
    }

    /// File the dataset was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of triples; 0 if the store cannot be read
    pub fn len(&self) -> usize {
        self.store.len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Triple-pattern lookup; `None` positions are wildcards
    pub fn triples(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Result<Vec<Triple>, GraphError> {
        self.store
            .quads_for_pattern(subject, predicate, object, Some(GraphNameRef::DefaultGraph))
            .map(|quad| {
                quad.map(|q| Triple::new(q.subject, q.predicate, q.object))
                    .map_err(|e| GraphError::StoreError(e.to_string()))
            })
            .collect()
    }

    /// Objects of (`subject`, `predicate`, ?o) in store order
    pub fn objects(
        &self,
        subject: SubjectRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Vec<Term>, GraphError> {
        Ok(self
            .triples(Some(subject), Some(predicate), None)?
            .into_iter()
            .map(|t| t.object)
            .collect())
    }

    /// Subjects of (?s, `predicate`, `object`) in store order
    pub fn subjects(
        &self,
        predicate: NamedNodeRef<'_>,
        object: TermRef<'_>,
    ) -> Result<Vec<Subject>, GraphError> {
        Ok(self
            .triples(None, Some(predicate), Some(object))?
            .into_iter()
            .map(|t| t.subject)
            .collect())
    }

    /// Execute SPARQL query
    ///
    /// SELECT queries yield one row per solution. ASK yields a single row
    /// binding `result` to a boolean literal. CONSTRUCT/DESCRIBE yield
    /// `subject`/`predicate`/`object` rows.
    pub fn query(&self, query: &SparqlQuery) -> Result<Vec<QueryRow>, GraphError> {
        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| GraphError::QueryError(e.to_string()))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let variables: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut rows = Vec::new();

                for solution in solutions {
                    let solution = solution.map_err(|e| GraphError::QueryError(e.to_string()))?;

                    let row = variables
                        .iter()
                        .filter_map(|var| {
                            solution
                                .get(var.as_str())
                                .map(|term| (var.clone(), term.clone()))
                        })
                        .collect();

                    rows.push(row);
                }

                Ok(rows)
            }
            QueryResults::Boolean(result) => Ok(vec![vec![(
                "result".to_string(),
                Term::Literal(result.into()),
            )]]),
            QueryResults::Graph(triples) => {
                let mut rows = Vec::new();
                for triple in triples {
                    let triple = triple.map_err(|e| GraphError::QueryError(e.to_string()))?;
                    rows.push(vec![
                        ("subject".to_string(), Term::from(triple.subject)),
                        ("predicate".to_string(), Term::from(triple.predicate)),
                        ("object".to_string(), triple.object),
                    ]);
                }
                Ok(rows)
            }
        }
    }
}

/// Pick the parser for a dataset file by its extension
pub fn format_for_path(path: &Path) -> Result<RdfFormat, GraphError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ttl" | "turtle" => Ok(RdfFormat::Turtle),
        "nt" | "ntriples" => Ok(RdfFormat::NTriples),
        "nq" | "nquads" => Ok(RdfFormat::NQuads),
        "trig" => Ok(RdfFormat::TriG),
        "rdf" | "owl" | "xml" => Ok(RdfFormat::RdfXml),
        "n3" => Ok(RdfFormat::N3),
        other => RdfFormat::from_extension(other)
            .ok_or_else(|| GraphError::UnsupportedFormat(path.display().to_string())),
    }
}
