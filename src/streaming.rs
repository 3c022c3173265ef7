//! Streaming state machine: the incremental counterpart of [`TagParser::parse`]
//!
//! Input arrives as arbitrarily-sized chunks; each call consumes one state
//! value and returns a new one, so a single compiled [`TagParser`] serves any
//! number of concurrent streams as long as each stream threads its own
//! [`ParserState`]. Chunk boundaries carry no meaning: concatenating the
//! segments emitted across all calls plus the finalizer's flush matches what
//! the whole-string engine produces on the concatenated input (adjacent text
//! runs may arrive split across several text segments).
//!
//! The machine has two modes. Scanning: outside any open tag, emitting text
//! and completed tags as soon as they are decided. In-tag: an opening tag
//! has matched and the buffer is accumulating its body until the closing tag
//! arrives. While scanning, a buffer tail that could still become an opening
//! tag (a `<` with no `>` after it) is held back instead of emitted; the
//! lookback for such a tail is bounded by [`HOLDBACK_WINDOW`] so a stray `<`
//! far inside a long text run cannot hold the stream hostage.

use crate::attributes::parse_attributes;
use crate::entities::decode_entities;
use crate::matcher::find_closing_tag;
use crate::parser::TagParser;
use crate::segment::{PartialSegment, Segment};
use crate::validation::resolve_attributes;

/// How far back from the end of the unconsumed buffer the scanner looks for
/// a `<` that might start a tag. A tunable, not a correctness boundary: a
/// candidate tag whose opening `<` slips outside the window is emitted as
/// text (bounded latency is preferred over unbounded lookbehind).
pub const HOLDBACK_WINDOW: usize = 20;

/// A tag that has been opened but not yet closed.
#[derive(Debug, Clone, PartialEq)]
struct OpenTag {
    name: String,
    attr_str: String,
    /// Byte offset in the buffer where the tag body begins (just past the
    /// opening tag's `>`). The opening-tag text itself stays in the buffer
    /// so an unterminated tag can be flushed verbatim at end of stream.
    content_start: usize,
}

/// Externally-held parser state, threaded through [`TagParser::parse_chunk`]
/// calls and consumed by [`TagParser::finalize`]. The buffer holds exactly
/// the unconsumed suffix of the input seen so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserState {
    buffer: String,
    open_tag: Option<OpenTag>,
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            open_tag: None,
        }
    }

    /// Whether the machine is holding back any undecided input: inside an
    /// open tag, or sitting on a held-back ambiguous tail.
    pub fn is_buffering(&self) -> bool {
        self.open_tag.is_some() || !self.buffer.is_empty()
    }

    /// The name of the tag currently being buffered, if any.
    pub fn buffering_tag(&self) -> Option<&str> {
        self.open_tag.as_ref().map(|open| open.name.as_str())
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one [`TagParser::parse_chunk`] call. `segments` holds only the
/// segments completed during this call; `partial` previews the open tag's
/// body so far and is advisory only.
#[derive(Debug)]
pub struct ChunkOutcome {
    pub segments: Vec<Segment>,
    pub state: ParserState,
    pub is_buffering: bool,
    pub buffering_tag: Option<String>,
    pub partial: Option<PartialSegment>,
}

impl TagParser {
    /// Fresh state for a new stream.
    pub fn initial_state(&self) -> ParserState {
        ParserState::new()
    }

    /// Feed one chunk. Consumes `state` and returns the successor state
    /// along with everything decided during this call.
    pub fn parse_chunk(&self, chunk: &str, state: ParserState) -> ChunkOutcome {
        let ParserState {
            mut buffer,
            mut open_tag,
        } = state;
        buffer.push_str(chunk);
        let mut segments = Vec::new();

        loop {
            match open_tag.take() {
                Some(open) => {
                    // In-tag: only the matching closing tag can settle things
                    match find_closing_tag(&buffer, open.content_start, &open.name) {
                        Some((close_start, close_end)) => {
                            let content =
                                decode_entities(&buffer[open.content_start..close_start]);
                            segments.push(self.tag_segment(&open.name, &open.attr_str, content));
                            buffer.drain(..close_end);
                        }
                        None => {
                            // The whole remaining buffer is tag body so far
                            open_tag = Some(open);
                            break;
                        }
                    }
                }
                None => match self.matcher().find_from(&buffer, 0) {
                    Some(m) => {
                        if m.start > 0 {
                            segments.push(Segment::text(buffer[..m.start].to_string()));
                        }
                        if self.matcher().is_self_closing(&m, self.registry()) {
                            segments.push(self.tag_segment(&m.name, &m.attr_str, String::new()));
                            buffer.drain(..m.end);
                        } else {
                            let content_start = m.end - m.start;
                            buffer.drain(..m.start);
                            open_tag = Some(OpenTag {
                                name: m.name,
                                attr_str: m.attr_str,
                                content_start,
                            });
                        }
                    }
                    None => {
                        match ambiguous_tail_start(&buffer) {
                            Some(0) => {}
                            Some(hold_from) => {
                                segments.push(Segment::text(buffer[..hold_from].to_string()));
                                buffer.drain(..hold_from);
                            }
                            None => {
                                if !buffer.is_empty() {
                                    segments.push(Segment::text(std::mem::take(&mut buffer)));
                                }
                            }
                        }
                        break;
                    }
                },
            }
        }

        let partial = open_tag.as_ref().map(|open| PartialSegment {
            name: open.name.clone(),
            content: decode_entities(&buffer[open.content_start..]),
            attributes: resolve_attributes(
                self.registry(),
                &open.name,
                parse_attributes(&open.attr_str),
            ),
        });
        let state = ParserState { buffer, open_tag };
        ChunkOutcome {
            is_buffering: state.is_buffering(),
            buffering_tag: state.buffering_tag().map(str::to_string),
            partial,
            segments,
            state,
        }
    }

    /// End-of-stream flush: whatever the state still holds (including an
    /// unterminated open tag, whose recorded name and attributes are
    /// discarded) comes out as a single entity-decoded text segment. Never
    /// an error; a truncated stream degrades to text.
    pub fn finalize(&self, state: ParserState) -> Vec<Segment> {
        if state.buffer.is_empty() {
            Vec::new()
        } else {
            vec![Segment::text(decode_entities(&state.buffer))]
        }
    }
}

/// Offset from which the buffer tail must be held back because it may still
/// become an opening tag, or `None` if everything can be emitted.
fn ambiguous_tail_start(buffer: &str) -> Option<usize> {
    let bytes = buffer.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    // A buffer that is entirely `<...` with no `>` yet may still complete
    // into a tag however long it grows; the window applies only once there
    // is settled text in front
    if bytes[0] == b'<' && !bytes.contains(&b'>') {
        return Some(0);
    }
    let window_start = bytes.len().saturating_sub(HOLDBACK_WINDOW);
    let mut i = bytes.len();
    while i > window_start {
        i -= 1;
        if bytes[i] == b'<' {
            // A '>' after the rightmost '<' settles the tail: the matcher
            // already declined it, so it is plain text
            return if bytes[i..].contains(&b'>') {
                None
            } else {
                Some(i)
            };
        }
    }
    None
}
