//! Tag registry: the frozen catalog of recognized tags
//!
//! A registry declares the finite set of tag names the parser recognizes and,
//! per name, whether the tag is self-closing, whether it carries inner
//! content, and how its attributes are validated. Registries are built once
//! and never change afterwards; a parser compiled from a registry can be
//! shared across any number of independent streams.
//!
//! Schema validation is deliberately a narrow capability: a validator is
//! anything that maps a raw string map to a typed map or a [`SchemaError`].
//! Closures qualify through a blanket impl, so a test registry is one line.

use crate::attributes::RawAttributes;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Typed attribute values as produced by a schema validator.
pub type TypedAttributes = HashMap<String, Value>;

/// Rejection produced by a schema validator (or by validating against an
/// unknown tag name). Never aborts a parse; see the validation bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    message: String,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute schema rejection: {}", self.message)
    }
}

impl std::error::Error for SchemaError {}

/// The attribute-validation capability a tag definition may carry.
pub trait AttributeSchema: Send + Sync {
    fn validate(&self, raw: &RawAttributes) -> Result<TypedAttributes, SchemaError>;
}

impl<F> AttributeSchema for F
where
    F: Fn(&RawAttributes) -> Result<TypedAttributes, SchemaError> + Send + Sync,
{
    fn validate(&self, raw: &RawAttributes) -> Result<TypedAttributes, SchemaError> {
        self(raw)
    }
}

/// A ready-made schema for the common case of enumerated string attributes.
///
/// Each listed key must, when present, take one of its allowed values; keys
/// not listed pass through as strings. A missing listed key is accepted
/// (tags routinely omit optional attributes).
pub struct EnumSchema {
    allowed: Vec<(String, Vec<String>)>,
}

impl EnumSchema {
    pub fn new() -> Self {
        Self { allowed: Vec::new() }
    }

    /// Declare `key` as an enum over `values`.
    pub fn key(mut self, key: &str, values: &[&str]) -> Self {
        self.allowed
            .push((key.to_string(), values.iter().map(|v| v.to_string()).collect()));
        self
    }
}

impl Default for EnumSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeSchema for EnumSchema {
    fn validate(&self, raw: &RawAttributes) -> Result<TypedAttributes, SchemaError> {
        for (key, values) in &self.allowed {
            if let Some(value) = raw.get(key) {
                if !values.contains(value) {
                    return Err(SchemaError::new(format!(
                        "value {:?} not allowed for attribute {:?}",
                        value, key
                    )));
                }
            }
        }
        Ok(raw
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect())
    }
}

/// One registered tag: name plus its self-closing/content flags and optional
/// attribute schema. Names are lower-cased on construction; matching is
/// case-insensitive throughout.
pub struct TagDefinition {
    name: String,
    self_closing: bool,
    has_content: bool,
    schema: Option<Box<dyn AttributeSchema>>,
}

impl TagDefinition {
    /// A content-bearing tag with no attribute schema.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            self_closing: false,
            has_content: true,
            schema: None,
        }
    }

    /// A self-closing tag (no separate closing tag, no inner content).
    pub fn self_closing(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            self_closing: true,
            has_content: false,
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: impl AttributeSchema + 'static) -> Self {
        self.schema = Some(Box::new(schema));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The frozen catalog. Declaration order is preserved and is the order
/// reported by [`TagRegistry::tag_names`].
pub struct TagRegistry {
    definitions: Vec<TagDefinition>,
}

impl TagRegistry {
    /// Build a registry from definitions. A later definition with the same
    /// name as an earlier one replaces it.
    pub fn new(definitions: Vec<TagDefinition>) -> Self {
        let mut deduped: Vec<TagDefinition> = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if let Some(existing) = deduped.iter_mut().find(|d| d.name == definition.name) {
                *existing = definition;
            } else {
                deduped.push(definition);
            }
        }
        Self { definitions: deduped }
    }

    /// The registered tag names, in declaration order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn find(&self, name: &str) -> Option<&TagDefinition> {
        let name = name.to_ascii_lowercase();
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Whether `name` is declared self-closing. Unknown names are not.
    pub fn is_self_closing(&self, name: &str) -> bool {
        self.find(name).map(|d| d.self_closing).unwrap_or(false)
    }

    /// Whether `name` is declared to carry inner content. Informational; the
    /// parse engines do not enforce it.
    pub fn has_content(&self, name: &str) -> bool {
        self.find(name).map(|d| d.has_content).unwrap_or(false)
    }

    /// Run `name`'s attribute schema over `raw`. Unknown names and tags
    /// without a schema both reject: there is nothing to type against, and
    /// the bridge then falls back to raw strings.
    pub fn validate_attributes(
        &self,
        name: &str,
        raw: &RawAttributes,
    ) -> Result<TypedAttributes, SchemaError> {
        let definition = self
            .find(name)
            .ok_or_else(|| SchemaError::new(format!("unknown tag {:?}", name)))?;
        match &definition.schema {
            Some(schema) => schema.validate(raw),
            None => Err(SchemaError::new(format!("no schema for tag {:?}", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> TagRegistry {
        TagRegistry::new(vec![
            TagDefinition::new("callout")
                .with_schema(EnumSchema::new().key("type", &["info", "warning", "error"])),
            TagDefinition::self_closing("image"),
        ])
    }

    #[test]
    fn test_names_lowercased_and_ordered() {
        let registry = TagRegistry::new(vec![
            TagDefinition::new("Callout"),
            TagDefinition::self_closing("IMAGE"),
        ]);
        let names: Vec<&str> = registry.tag_names().collect();
        assert_eq!(names, vec!["callout", "image"]);
    }

    #[test]
    fn test_flags() {
        let registry = sample_registry();
        assert!(!registry.is_self_closing("callout"));
        assert!(registry.is_self_closing("image"));
        assert!(registry.is_self_closing("IMAGE"));
        assert!(registry.has_content("callout"));
        assert!(!registry.has_content("image"));
        assert!(!registry.is_self_closing("unknown"));
        assert!(!registry.has_content("unknown"));
    }

    #[test]
    fn test_enum_schema_accepts_and_rejects() {
        let registry = sample_registry();
        let mut raw = RawAttributes::new();
        raw.insert("type".to_string(), "info".to_string());
        let typed = registry.validate_attributes("callout", &raw).unwrap();
        assert_eq!(typed.get("type"), Some(&Value::String("info".to_string())));

        raw.insert("type".to_string(), "bogus".to_string());
        assert!(registry.validate_attributes("callout", &raw).is_err());
    }

    #[test]
    fn test_unknown_tag_rejects() {
        let registry = sample_registry();
        assert!(registry
            .validate_attributes("nope", &RawAttributes::new())
            .is_err());
    }

    #[test]
    fn test_closure_schema() {
        let registry = TagRegistry::new(vec![TagDefinition::new("counter").with_schema(
            |raw: &RawAttributes| {
                let mut typed = TypedAttributes::new();
                for (key, value) in raw {
                    let number: i64 = value
                        .parse()
                        .map_err(|_| SchemaError::new(format!("{:?} is not a number", value)))?;
                    typed.insert(key.clone(), Value::from(number));
                }
                Ok(typed)
            },
        )]);
        let mut raw = RawAttributes::new();
        raw.insert("n".to_string(), "42".to_string());
        let typed = registry.validate_attributes("counter", &raw).unwrap();
        assert_eq!(typed.get("n"), Some(&Value::from(42)));
    }

    #[test]
    fn test_duplicate_definition_last_wins() {
        let registry = TagRegistry::new(vec![
            TagDefinition::new("note"),
            TagDefinition::self_closing("note"),
        ]);
        assert!(registry.is_self_closing("note"));
        assert_eq!(registry.tag_names().count(), 1);
    }
}
