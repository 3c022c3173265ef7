//! Compiled opening-tag matcher
//!
//! Built once per registry: a single case-insensitive alternation that
//! matches `<name ...>` or `<name ... />` for exactly the registered names.
//! Registered names are escaped, so a name containing regex metacharacters
//! still matches literally. Unregistered tag-like text (`<foo>`) never
//! matches and therefore stays literal text, angle brackets included.
//!
//! The closing-tag search is a plain byte scan rather than a per-call regex:
//! the target is the exact sequence `</name>`, case-insensitive.

use crate::registry::TagRegistry;
use regex::Regex;

/// One opening-tag match inside a haystack.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatch {
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
    /// Matched tag name, lower-cased.
    pub name: String,
    /// Raw attribute substring between the name and the closing bracket
    /// (possibly empty, surrounding whitespace included as written).
    pub attr_str: String,
    /// Whether an explicit `/` marker preceded the `>`.
    pub explicit_self_close: bool,
}

/// Opening-tag recognizer compiled from a registry's name set.
pub struct TagMatcher {
    // None for an empty registry: nothing can ever match
    pattern: Option<Regex>,
}

impl TagMatcher {
    /// Compile the alternation for `registry`'s names.
    pub fn new(registry: &TagRegistry) -> Self {
        if registry.is_empty() {
            return Self { pattern: None };
        }
        let alternation = registry
            .tag_names()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        // name, then an optional whitespace-led attribute run (lazy so the
        // self-close marker is not swallowed), then the optional marker
        let pattern = format!(r"(?i)<({})((?:\s+[^>]*?)?)\s*(/?)>", alternation);
        Self {
            // The alternation is built from escaped literals; compilation
            // cannot fail on any registry name set.
            pattern: Some(Regex::new(&pattern).expect("tag pattern is always valid")),
        }
    }

    /// Find the first opening tag at or after byte offset `start`.
    pub fn find_from(&self, haystack: &str, start: usize) -> Option<TagMatch> {
        let pattern = self.pattern.as_ref()?;
        let captures = pattern.captures_at(haystack, start)?;
        let full = captures.get(0).expect("group 0 always present");
        Some(TagMatch {
            start: full.start(),
            end: full.end(),
            name: captures[1].to_ascii_lowercase(),
            attr_str: captures[2].to_string(),
            explicit_self_close: !captures[3].is_empty(),
        })
    }

    /// Whether `tag_match` denotes a self-closing occurrence: the explicit
    /// `/` marker wins; the registry's declaration is the fallback.
    pub fn is_self_closing(&self, tag_match: &TagMatch, registry: &TagRegistry) -> bool {
        tag_match.explicit_self_close || registry.is_self_closing(&tag_match.name)
    }
}

/// Locate the exact closing tag `</name>` (case-insensitive) at or after
/// byte offset `from`. Returns the byte span of the whole closing tag.
pub fn find_closing_tag(haystack: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let name_bytes = name.as_bytes();
    let needle_len = name_bytes.len() + 3; // '<' '/' name '>'
    if bytes.len() < needle_len {
        return None;
    }
    let mut pos = from;
    while pos + needle_len <= bytes.len() {
        if bytes[pos] == b'<'
            && bytes[pos + 1] == b'/'
            && bytes[pos + 2..pos + 2 + name_bytes.len()].eq_ignore_ascii_case(name_bytes)
            && bytes[pos + 2 + name_bytes.len()] == b'>'
        {
            return Some((pos, pos + needle_len));
        }
        pos += 1;
    }
    None
}
