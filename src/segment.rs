//! Parsed output types
//!
//! A parse produces an ordered list of [`Segment`]s: plain-text runs and
//! recognized-tag runs. The text/tag distinction is a sum type so that "text
//! has no attributes" is a compile-time property rather than an optional
//! field. Segments are plain value records; every parse call hands ownership
//! of its segments to the caller and retains nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Attribute mapping attached to a tag segment. Values are typed
/// (`serde_json::Value`) when schema validation succeeded and plain
/// `Value::String`s when it fell back to the raw attributes.
pub type AttributeMap = HashMap<String, Value>;

/// One unit of parsed output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// A run of plain text between (or outside) recognized tags.
    Text { content: String },
    /// A recognized tag with its inner content and resolved attributes.
    /// Self-closing tags carry empty content.
    Tag {
        name: String,
        content: String,
        attributes: AttributeMap,
    },
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text {
            content: content.into(),
        }
    }

    pub fn tag(name: impl Into<String>, content: impl Into<String>, attributes: AttributeMap) -> Self {
        Segment::Tag {
            name: name.into(),
            content: content.into(),
            attributes,
        }
    }

    /// The textual content of either variant.
    pub fn content(&self) -> &str {
        match self {
            Segment::Text { content } => content,
            Segment::Tag { content, .. } => content,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Segment::Text { .. })
    }
}

/// Advisory preview of a tag segment still being assembled mid-stream.
///
/// Exists only while the streaming engine is inside an open tag; never part
/// of the finalized output. Content is the body buffered so far, with
/// entities decoded best-effort (an entity straddling a chunk boundary shows
/// up undecoded until its closing `;` arrives).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialSegment {
    pub name: String,
    pub content: String,
    pub attributes: AttributeMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_shape() {
        let segment = Segment::text("hello");
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], "hello");

        let mut attributes = AttributeMap::new();
        attributes.insert("type".to_string(), Value::String("info".to_string()));
        let segment = Segment::tag("callout", "body", attributes);
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "tag");
        assert_eq!(json["name"], "callout");
        assert_eq!(json["attributes"]["type"], "info");
    }

    #[test]
    fn test_serde_round_trip() {
        let segment = Segment::tag("note", "x < y", AttributeMap::new());
        let json = serde_json::to_string(&segment).unwrap();
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, segment);
    }
}
