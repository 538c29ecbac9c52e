//! Format converters for crawled table data
//!
//! Each crawled table is turned into exactly one output artifact. Two
//! serializations are supported:
//! - JSON-LD: the payload wrapped in a schema.org `@context`/`@type` envelope
//! - Turtle: the payload expressed as RDF triples about a blank node typed
//!   with the table name

mod json_ld;
mod turtle;

pub use json_ld::{to_json_ld, JSON_LD_CONTEXT};
pub use turtle::{to_ttl, SCHEMA_NAMESPACE};

use crate::CrawlError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Serialization selected for output artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// JSON-LD document, written with the `json-ld` extension
    JsonLd,

    /// Turtle document, written with the `ttl` extension
    Ttl,
}

impl OutputFormat {
    /// Returns the selector string, which doubles as the file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonLd => "json-ld",
            Self::Ttl => "ttl",
        }
    }

    /// Returns the file extension used for artifacts in this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Returns all supported formats
    pub fn all() -> [Self; 2] {
        [Self::JsonLd, Self::Ttl]
    }

    /// Parses an optional command-line selector; a missing format is an
    /// input error like an unknown one
    pub fn from_arg(value: Option<&str>) -> Result<Self, CrawlError> {
        match value {
            Some(value) => value.parse(),
            None => Err(CrawlError::InputValidation(
                "Format must be either \"json-ld\" or \"ttl\"".to_string(),
            )),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json-ld" => Ok(Self::JsonLd),
            "ttl" => Ok(Self::Ttl),
            other => Err(CrawlError::InputValidation(format!(
                "Format must be either \"json-ld\" or \"ttl\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a table's payload as the text content of its output artifact
///
/// JSON-LD is pretty-printed with two-space indentation; Turtle is emitted
/// as produced by [`to_ttl`].
pub fn render(format: OutputFormat, table_name: &str, data: Value) -> Result<String, CrawlError> {
    match format {
        OutputFormat::JsonLd => Ok(serde_json::to_string_pretty(&to_json_ld(table_name, data))?),
        OutputFormat::Ttl => to_ttl(table_name, &data),
    }
}
