//! Incremental extraction of complete JSON objects from a chunked stream.
//!
//! The backend emits one JSON object per logical unit, either bare or behind
//! SSE-style `data:` line prefixes. Chunk boundaries fall anywhere, so the
//! decoder buffers the unterminated tail between feeds.

use railvision_types::DecodedDelta;
use serde_json::Value;
use tracing::debug;

/// Turns an arbitrarily-chunked character stream into a sequence of decoded
/// delta objects. Never errors: malformed candidates are dropped silently
/// and incomplete trailing objects are carried to the next `feed`.
#[derive(Debug, Clone, Default)]
pub struct StreamDecoder {
    /// Not-yet-parsed trailing stream text, kept in raw (un-normalized)
    /// form so a `data:` line that completes in a later chunk is trimmed
    /// only once it is whole.
    buffer: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every object that completed with it.
    pub fn feed(&mut self, chunk: &str) -> Vec<DecodedDelta> {
        self.buffer.push_str(chunk);
        self.extract()
    }

    /// Runs a final extraction pass at end-of-stream.
    ///
    /// Catches an object that is complete on its own but was never followed
    /// by more incoming data.
    pub fn flush(&mut self) -> Vec<DecodedDelta> {
        self.extract()
    }

    /// True when no partial object is pending.
    pub fn is_drained(&self) -> bool {
        self.buffer.is_empty()
    }

    fn extract(&mut self) -> Vec<DecodedDelta> {
        let (normalized, raw_offsets) = strip_sse_prefixes(&self.buffer);
        let (candidates, open_start) = split_objects(&normalized);

        let mut deltas = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match serde_json::from_str::<Value>(candidate) {
                Ok(value) => {
                    // Objects carrying none of the known fields are noise.
                    if let Some(delta) = DecodedDelta::from_value(&value)
                        && !delta.is_empty()
                    {
                        deltas.push(delta);
                    }
                }
                Err(err) => {
                    // Stray braces in free text can balance into garbage;
                    // tolerated, never surfaced.
                    debug!(error = %err, "dropping unparsable stream object");
                }
            }
        }

        // Keep exactly the unterminated trailing object (in raw form),
        // drop everything else.
        self.buffer = match open_start {
            Some(pos) => self.buffer[raw_offsets[pos]..].to_string(),
            None => String::new(),
        };
        deltas
    }
}

/// Strips `data:` prefixes line by line and rejoins with no separator.
///
/// The stream does not rely on line breaks inside objects, so collapsing
/// lines is safe and lets an object span any number of `data:` lines.
/// Also returns, per normalized byte, the byte offset into `raw` it came
/// from, so the caller can slice the raw buffer at a normalized position.
fn strip_sse_prefixes(raw: &str) -> (String, Vec<usize>) {
    let mut out = String::with_capacity(raw.len());
    let mut offsets = Vec::with_capacity(raw.len());

    for line in raw.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        let trimmed = content.trim();
        let emit = match trimmed.strip_prefix("data:") {
            Some(rest) => rest.trim(),
            None => content,
        };
        // `emit` is a subslice of `raw`, so its raw offset is the pointer
        // distance between the two.
        let base = emit.as_ptr() as usize - raw.as_ptr() as usize;
        offsets.extend(base..base + emit.len());
        out.push_str(emit);
    }

    (out, offsets)
}

/// Single scan over the normalized text: string-literal tracking takes
/// precedence over brace counting, `\` escapes one character inside strings.
/// Returns the complete top-level object slices plus the start offset of a
/// still-open trailing object, if any.
fn split_objects(text: &str) -> (Vec<&str>, Option<usize>) {
    let mut candidates = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        candidates.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    (candidates, start)
}
