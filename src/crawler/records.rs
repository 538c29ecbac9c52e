//! Typed views over the JSON documents served by the data API
//!
//! Three document shapes are recognized:
//! - the endpoint registry returned by the API root
//! - a table record (`metadata.relatedTables` plus an opaque `data` payload)
//! - a page of a paginated collection (`items` plus an optional `nextPage`)

use crate::{CrawlError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Mapping from table name to endpoint descriptor, fetched from the API root
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: Map<String, Value>,
}

impl EndpointRegistry {
    /// Builds a registry from the API root response
    ///
    /// The response must be a JSON object; anything else is a malformed
    /// response.
    pub fn from_value(url: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(endpoints) => Ok(Self { endpoints }),
            other => Err(CrawlError::malformed(
                url,
                format!("expected an object of endpoints, got {}", json_kind(&other)),
            )),
        }
    }

    /// Returns true if the API advertises the table
    ///
    /// An entry whose descriptor is falsy (`null`, `false`, `0` or `""`)
    /// does not count as present.
    pub fn contains(&self, table_name: &str) -> bool {
        self.endpoints.get(table_name).is_some_and(is_truthy)
    }

    /// Fails with an input validation error if the table is not advertised
    pub fn ensure_contains(&self, table_name: &str) -> Result<()> {
        if self.contains(table_name) {
            Ok(())
        } else {
            Err(CrawlError::InputValidation(format!(
                "Table {} does not exist in the API endpoints",
                table_name
            )))
        }
    }

    /// Iterates over the advertised table names
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.endpoints
            .iter()
            .filter(|(_, descriptor)| is_truthy(descriptor))
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.table_names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_truthy(descriptor: &Value) -> bool {
    match descriptor {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl<S: Into<String>> FromIterator<S> for EndpointRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let endpoints = iter
            .into_iter()
            .map(|name| (name.into(), Value::Object(Map::new())))
            .collect();
        Self { endpoints }
    }
}

/// A table as served by `GET {base}/{table}`
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    /// Tables to crawl next, in the order the API lists them
    pub related_tables: Vec<String>,

    /// Opaque payload converted into the output artifact
    pub data: Value,
}

#[derive(Deserialize)]
struct RawTableRecord {
    metadata: RawMetadata,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(rename = "relatedTables")]
    related_tables: Vec<String>,
}

impl TableRecord {
    /// Parses a table record, checking that every related table name can be
    /// used as an artifact file name
    pub fn from_value(url: &str, value: Value) -> Result<Self> {
        let raw: RawTableRecord = serde_json::from_value(value)
            .map_err(|e| CrawlError::malformed(url, format!("invalid table record: {}", e)))?;

        for name in &raw.metadata.related_tables {
            check_table_name(name).map_err(|reason| {
                CrawlError::malformed(url, format!("related table {:?} {}", name, reason))
            })?;
        }

        Ok(Self {
            related_tables: raw.metadata.related_tables,
            data: raw.data,
        })
    }
}

/// One slice of a paginated collection
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Records on this page, in order
    pub items: Vec<Value>,

    /// Cursor for the following page; absent, `null` or empty on the last page
    #[serde(rename = "nextPage", default)]
    pub next_page: Option<String>,
}

impl Page {
    pub fn from_value(url: &str, value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| CrawlError::malformed(url, format!("invalid page: {}", e)))
    }

    /// Returns the next cursor, treating an empty string as the end
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page.as_deref().filter(|next| !next.is_empty())
    }
}

/// Validates a table name supplied by the user
pub fn validate_table_name(table_name: &str) -> Result<()> {
    check_table_name(table_name).map_err(|reason| {
        CrawlError::InputValidation(format!("Table name {:?} {}", table_name, reason))
    })
}

/// Table names end up both in a URL path segment and in a file name
fn check_table_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.is_empty() {
        return Err("is empty");
    }
    if name == "." || name == ".." {
        return Err("is a relative path component");
    }
    if name.contains(['/', '\\', '\0', '?', '#']) {
        return Err("contains a path or URL delimiter");
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
