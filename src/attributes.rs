//! Attribute parsing for opening tags
//!
//! Extracts `key="value"` / `key='value'` pairs from the raw attribute
//! substring of an opening tag (everything between the tag name and the
//! closing `>` or `/>`). Values are entity-decoded. Fragments that don't
//! match the pair shape (stray words, unterminated quotes) are silently
//! skipped; attribute parsing never fails.

use crate::entities::decode_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Raw attribute mapping as written in the markup, values entity-decoded but
/// not yet schema-typed.
pub type RawAttributes = HashMap<String, String>;

/// Lazy-compiled pair pattern: identifier, `=`, then a double- or
/// single-quoted value. Group 2 holds a double-quoted value, group 3 a
/// single-quoted one.
static ATTR_PAIR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Parse all attribute pairs out of `raw`.
///
/// Keys are lower-cased (attribute matching is case-insensitive, like tag
/// names). Duplicate keys resolve last-wins in left-to-right scan order. An
/// empty or garbage-only input yields an empty map.
pub fn parse_attributes(raw: &str) -> RawAttributes {
    let mut attributes = HashMap::new();
    for capture in ATTR_PAIR_REGEX.captures_iter(raw) {
        let key = capture[1].to_ascii_lowercase();
        let value = capture
            .get(2)
            .or_else(|| capture.get(3))
            .map(|m| m.as_str())
            .unwrap_or("");
        attributes.insert(key, decode_entities(value));
    }
    attributes
}
