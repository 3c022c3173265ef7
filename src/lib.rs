//! # tagstream
//!
//! Recognizes a registry-declared set of tag names embedded in otherwise
//! free-form text and converts the text into an ordered sequence of typed
//! segments: plain-text runs and recognized-tag runs with validated
//! attributes. Works on a complete string or incrementally on arbitrarily
//! chunked input (a live token stream, say), producing the same final
//! segments no matter where the chunk boundaries fall.
//!
//! ## Usage sketch
//!
//! ```text
//! let registry = TagRegistry::new(vec![
//!     TagDefinition::new("callout"),
//!     TagDefinition::self_closing("image"),
//! ]);
//! let parser = TagParser::new(registry);
//!
//! // whole string
//! let segments = parser.parse("Hi <callout type=\"info\">there</callout>");
//!
//! // streaming
//! let mut state = parser.initial_state();
//! for chunk in chunks {
//!     let outcome = parser.parse_chunk(chunk, state);
//!     state = outcome.state;
//!     // outcome.segments, outcome.partial, ...
//! }
//! let tail = parser.finalize(state);
//! ```
//!
//! Parsing never fails: unknown tags, malformed attributes, and truncated
//! streams all degrade to text (see the module docs for the rules).

pub mod attributes;
pub mod entities;
pub mod matcher;
pub mod parser;
pub mod registry;
pub mod segment;
pub mod streaming;
pub mod validation;

pub use attributes::{parse_attributes, RawAttributes};
pub use entities::decode_entities;
pub use parser::TagParser;
pub use registry::{AttributeSchema, EnumSchema, SchemaError, TagDefinition, TagRegistry};
pub use segment::{AttributeMap, PartialSegment, Segment};
pub use streaming::{ChunkOutcome, ParserState, HOLDBACK_WINDOW};
