//! Complete-text parse engine
//!
//! [`TagParser`] pairs a frozen registry with its compiled matcher. The
//! whole-string engine here is a single left-to-right scan; its incremental
//! counterpart lives in [`crate::streaming`] and shares this type.
//!
//! Parsing never fails: unknown tags stay literal text, an opening tag with
//! no matching close is demoted to literal text, and attribute problems
//! degrade through the validation bridge.

use crate::attributes::parse_attributes;
use crate::entities::decode_entities;
use crate::matcher::{find_closing_tag, TagMatcher};
use crate::registry::TagRegistry;
use crate::segment::Segment;
use crate::validation::resolve_attributes;

/// A compiled parser: registry plus matcher. Holds no per-parse state, so
/// one instance serves any number of strings and independent streams.
pub struct TagParser {
    registry: TagRegistry,
    matcher: TagMatcher,
}

impl TagParser {
    /// Compile a parser for `registry`.
    pub fn new(registry: TagRegistry) -> Self {
        let matcher = TagMatcher::new(&registry);
        Self { registry, matcher }
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub(crate) fn matcher(&self) -> &TagMatcher {
        &self.matcher
    }

    /// Build a tag segment for a matched opening tag: attributes parsed from
    /// the raw attribute substring and resolved through the bridge.
    pub(crate) fn tag_segment(&self, name: &str, attr_str: &str, content: String) -> Segment {
        let raw = parse_attributes(attr_str);
        let attributes = resolve_attributes(&self.registry, name, raw);
        Segment::tag(name, content, attributes)
    }

    /// Parse a complete string into its segment sequence.
    pub fn parse(&self, input: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut pos = 0;

        while let Some(m) = self.matcher.find_from(input, pos) {
            // Text between the scan position and the match stays buffered
            // until a tag actually gets emitted
            text.push_str(&input[pos..m.start]);

            if self.matcher.is_self_closing(&m, &self.registry) {
                flush_text(&mut segments, &mut text);
                segments.push(self.tag_segment(&m.name, &m.attr_str, String::new()));
                pos = m.end;
                continue;
            }

            match find_closing_tag(input, m.end, &m.name) {
                Some((close_start, close_end)) => {
                    flush_text(&mut segments, &mut text);
                    let content = decode_entities(&input[m.end..close_start]);
                    segments.push(self.tag_segment(&m.name, &m.attr_str, content));
                    pos = close_end;
                }
                None => {
                    // Unclosed: the opening tag itself is literal text and is
                    // not retried as a tag
                    text.push_str(&input[m.start..m.end]);
                    pos = m.end;
                }
            }
        }

        text.push_str(&input[pos..]);
        flush_text(&mut segments, &mut text);
        segments
    }
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::text(std::mem::take(text)));
    }
}
