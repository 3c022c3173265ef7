//! Entity decoding for tag content and attribute values
//!
//! Exactly four named entities are recognized: `&lt;`, `&gt;`, `&amp;` and
//! `&quot;`. Everything else (numeric references, `&apos;`, unknown names)
//! passes through unchanged. Decoding is a single left-to-right pass and is
//! non-recursive: the `&` produced by decoding `&amp;` is never re-scanned,
//! so `&amp;lt;` decodes to `&lt;` and stops there.

/// The fixed decode table. Order matters only for readability; the entity
/// names share no prefixes.
const ENTITIES: &[(&str, char)] = &[
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&quot;", '"'),
];

/// Decode the four supported entities in `input`, left to right.
///
/// Total function: any input produces an output, never an error.
pub fn decode_entities(input: &str) -> String {
    // Fast path: nothing that could start an entity
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, replacement)) => {
                out.push(*replacement);
                rest = &tail[name.len()..];
            }
            None => {
                // Not one of ours; the ampersand is ordinary text
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
