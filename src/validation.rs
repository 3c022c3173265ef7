//! Validation bridge between the parse engines and the registry's schemas
//!
//! Hands raw attributes to the registry's validator and normalizes the
//! outcome to a plain attribute map. Rejection is non-fatal by design:
//! schema failure (or an unknown/schema-less tag) degrades to the raw string
//! attributes, and the segment is still emitted with its recognized type.

use crate::attributes::RawAttributes;
use crate::registry::TagRegistry;
use crate::segment::AttributeMap;
use serde_json::Value;

/// Resolve `raw` for tag `name`: typed attributes when the schema accepts,
/// the raw strings otherwise. Never fails.
pub fn resolve_attributes(registry: &TagRegistry, name: &str, raw: RawAttributes) -> AttributeMap {
    match registry.validate_attributes(name, &raw) {
        Ok(typed) => typed,
        Err(_) => raw
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    }
}
