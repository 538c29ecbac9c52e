//! JSON-LD envelope for table payloads

use serde_json::{json, Value};

/// Context IRI placed in every JSON-LD artifact
pub const JSON_LD_CONTEXT: &str = "http://schema.org";

/// Wraps a table payload in a JSON-LD envelope
///
/// The table name becomes the `@type` and the payload is carried unchanged
/// under `data`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use table_crawler::to_json_ld;
///
/// let doc = to_json_ld("Widgets", json!({"x": 1}));
/// assert_eq!(doc["@type"], "Widgets");
/// ```
pub fn to_json_ld(table_name: &str, data: Value) -> Value {
    json!({
        "@context": JSON_LD_CONTEXT,
        "@type": table_name,
        "data": data,
    })
}
