//! Inline emphasis parsing for a single block of text.

use std::sync::LazyLock;

use railvision_types::Segment;
use regex::Regex;

// One alternation, scanned left to right. The regex crate's leftmost-first
// semantics give first-match-wins per position: `***` is tried before `**`
// before `*`. No nesting, no overlap.
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\*([^*]+)\*\*\*|\*\*([^*]+)\*\*|\*([^*]+)\*|`([^`]+)`")
        .expect("valid pattern")
});

/// Splits text into styled segments for bold, italic, bold+italic and
/// inline code. Unmatched stretches become plain segments; empty input
/// yields no segments.
pub fn parse_inline(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in INLINE.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        if whole.start() > cursor {
            segments.push(Segment::plain(&text[cursor..whole.start()]));
        }

        let (body, bold, italic, code) = if let Some(m) = caps.get(1) {
            (m.as_str(), true, true, false)
        } else if let Some(m) = caps.get(2) {
            (m.as_str(), true, false, false)
        } else if let Some(m) = caps.get(3) {
            (m.as_str(), false, true, false)
        } else {
            let m = caps.get(4).expect("one branch matched");
            (m.as_str(), false, false, true)
        };
        segments.push(Segment {
            text: body.to_string(),
            bold,
            italic,
            code,
        });

        cursor = whole.end();
    }

    if cursor < text.len() {
        segments.push(Segment::plain(&text[cursor..]));
    }
    segments
}
