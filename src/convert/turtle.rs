//! Turtle serialization of table payloads
//!
//! The payload is described as RDF about a blank node typed `schema:{table}`:
//! - object keys become `schema:{key}` predicates
//! - nested objects become nested blank nodes
//! - arrays become RDF lists (`rdf:first`/`rdf:rest`), so element order survives
//! - strings, numbers and booleans become typed literals
//! - `null` values produce no triple
//!
//! The triples are written by oxigraph's Turtle serializer with the
//! `schema:` prefix bound.

use crate::{CrawlError, Result};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::vocab::{rdf, xsd};
use oxigraph::model::{BlankNode, Literal, NamedNode, Term, Triple};
use serde_json::{Map, Number, Value};
use url::form_urlencoded;

/// Namespace bound to the `schema:` prefix
pub const SCHEMA_NAMESPACE: &str = "http://schema.org/";

/// Converts a table payload into a Turtle document
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use table_crawler::to_ttl;
///
/// let ttl = to_ttl("Widgets", &json!({"x": 1}))?;
/// assert!(ttl.contains("<http://schema.org/>"));
/// # Ok::<(), table_crawler::CrawlError>(())
/// ```
pub fn to_ttl(table_name: &str, data: &Value) -> Result<String> {
    let triples = describe(table_name, data);

    let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle)
        .with_prefix("schema", SCHEMA_NAMESPACE)
        .map_err(turtle_error)?
        .for_writer(Vec::new());
    for triple in &triples {
        serializer.serialize_triple(triple).map_err(turtle_error)?;
    }
    let bytes = serializer.finish().map_err(turtle_error)?;

    String::from_utf8(bytes).map_err(turtle_error)
}

/// Builds the triples describing `data` as an instance of `schema:{table}`
///
/// An object payload contributes one predicate per non-null key; any other
/// non-null payload hangs off a single `schema:value` predicate.
fn describe(table_name: &str, data: &Value) -> Vec<Triple> {
    let mut graph = PayloadGraph::default();
    let root = graph.fresh_node();
    graph
        .triples
        .push(Triple::new(root.clone(), rdf::TYPE, schema_iri(table_name)));

    match data {
        Value::Object(map) => graph.describe_object(&root, map),
        other => {
            if let Some(object) = graph.term(other) {
                graph
                    .triples
                    .push(Triple::new(root, schema_iri("value"), object));
            }
        }
    }

    graph.triples
}

fn turtle_error(e: impl std::fmt::Display) -> CrawlError {
    CrawlError::Turtle(e.to_string())
}

#[derive(Debug, Default)]
struct PayloadGraph {
    triples: Vec<Triple>,
    next_node: u64,
}

impl PayloadGraph {
    /// Blank node labels are sequential so the same payload always yields
    /// the same document
    fn fresh_node(&mut self) -> BlankNode {
        let node = BlankNode::new_unchecked(format!("n{}", self.next_node));
        self.next_node += 1;
        node
    }

    fn describe_object(&mut self, subject: &BlankNode, map: &Map<String, Value>) {
        for (key, value) in map {
            if let Some(object) = self.term(value) {
                self.triples
                    .push(Triple::new(subject.clone(), schema_iri(key), object));
            }
        }
    }

    fn term(&mut self, value: &Value) -> Option<Term> {
        let term: Term = match value {
            Value::Null => return None,
            Value::Bool(b) => Literal::from(*b).into(),
            Value::Number(n) => number_literal(n).into(),
            Value::String(s) => Literal::new_simple_literal(s.as_str()).into(),
            Value::Object(map) => {
                let node = self.fresh_node();
                self.describe_object(&node, map);
                node.into()
            }
            Value::Array(items) => self.list(items),
        };
        Some(term)
    }

    /// Emits an RDF list and returns its head; nulls are skipped
    fn list(&mut self, items: &[Value]) -> Term {
        let elements: Vec<Term> = items.iter().filter_map(|item| self.term(item)).collect();

        elements
            .into_iter()
            .rev()
            .fold(Term::from(rdf::NIL.into_owned()), |rest, first| {
                let cell = self.fresh_node();
                self.triples.push(Triple::new(cell.clone(), rdf::FIRST, first));
                self.triples.push(Triple::new(cell.clone(), rdf::REST, rest));
                cell.into()
            })
    }
}

/// Integers keep their exact digits as `xsd:integer`; everything else is `xsd:double`
fn number_literal(n: &Number) -> Literal {
    match n.as_f64() {
        Some(value) if n.is_f64() => Literal::from(value),
        _ => Literal::new_typed_literal(n.to_string(), xsd::INTEGER),
    }
}

/// `schema:{name}` with the name form-urlencoded, so any key yields a valid IRI
fn schema_iri(name: &str) -> NamedNode {
    let local: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    NamedNode::new_unchecked(format!("{}{}", SCHEMA_NAMESPACE, local))
}
