//! Page-layout line builder (the PDF-style consumer).
//!
//! This consumer deliberately collapses inline styling to one whole-line
//! emphasis: if any segment of a line carries bold+italic, the whole line is
//! bold+italic, else bold, else italic, else plain. The document and deck
//! consumers keep per-segment styling; this one trades it for a simpler
//! page-drawing API.

use railvision_markdown::parse_inline;
use railvision_types::{Segment, Token};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Whole-line emphasis, most specific wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    #[default]
    Plain,
    Italic,
    Bold,
    BoldItalic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Heading { level: u8 },
    Body,
    Code,
    Table,
    Rule,
}

/// One visual line ready for the page renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutLine {
    pub text: String,
    pub kind: LineKind,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Display-width budget per line.
    pub width: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { width: 80 }
    }
}

/// Renders tokens into flat visual lines.
pub fn build_layout(tokens: &[Token], opts: &LayoutOptions) -> Vec<LayoutLine> {
    let width = opts.width.max(1);
    let mut lines = Vec::new();

    for token in tokens {
        match token {
            Token::Heading { level, text } => {
                let segments = parse_inline(text);
                lines.push(LayoutLine {
                    text: flatten(&segments),
                    kind: LineKind::Heading { level: *level },
                    emphasis: collapse_emphasis(&segments),
                });
            }
            Token::Paragraph { text } => {
                let segments = parse_inline(text);
                let emphasis = collapse_emphasis(&segments);
                for wrapped in wrap_with_prefix(&flatten(&segments), width, "", "") {
                    lines.push(LayoutLine {
                        text: wrapped,
                        kind: LineKind::Body,
                        emphasis,
                    });
                }
            }
            Token::Bullet { level, text } => {
                let segments = parse_inline(text);
                let emphasis = collapse_emphasis(&segments);
                let indent = "  ".repeat(*level);
                let first = format!("{indent}• ");
                let rest = format!("{indent}  ");
                for wrapped in wrap_with_prefix(&flatten(&segments), width, &first, &rest) {
                    lines.push(LayoutLine {
                        text: wrapped,
                        kind: LineKind::Body,
                        emphasis,
                    });
                }
            }
            Token::Ordered { index, level, text } => {
                let segments = parse_inline(text);
                let emphasis = collapse_emphasis(&segments);
                let indent = "  ".repeat(*level);
                let marker = format!("{index}. ");
                let first = format!("{indent}{marker}");
                let rest = format!("{indent}{}", " ".repeat(marker.width()));
                for wrapped in wrap_with_prefix(&flatten(&segments), width, &first, &rest) {
                    lines.push(LayoutLine {
                        text: wrapped,
                        kind: LineKind::Body,
                        emphasis,
                    });
                }
            }
            Token::Blockquote { text } => {
                for quote_line in text.split('\n') {
                    let segments = parse_inline(quote_line);
                    let emphasis = collapse_emphasis(&segments);
                    for wrapped in wrap_with_prefix(&flatten(&segments), width, "> ", "> ") {
                        lines.push(LayoutLine {
                            text: wrapped,
                            kind: LineKind::Body,
                            emphasis,
                        });
                    }
                }
            }
            Token::Code { text, .. } => {
                // Verbatim, never wrapped, never style-collapsed.
                for code_line in text.split('\n') {
                    lines.push(LayoutLine {
                        text: code_line.to_string(),
                        kind: LineKind::Code,
                        emphasis: Emphasis::Plain,
                    });
                }
            }
            Token::Table { rows } => {
                for rendered in render_table(rows) {
                    lines.push(LayoutLine {
                        text: rendered,
                        kind: LineKind::Table,
                        emphasis: Emphasis::Plain,
                    });
                }
            }
            Token::Hr => {
                lines.push(LayoutLine {
                    text: "─".repeat(width.min(40)),
                    kind: LineKind::Rule,
                    emphasis: Emphasis::Plain,
                });
            }
        }
    }

    lines
}

/// Most specific emphasis carried by any segment wins for the whole line.
pub fn collapse_emphasis(segments: &[Segment]) -> Emphasis {
    if segments.iter().any(|s| s.bold && s.italic) {
        Emphasis::BoldItalic
    } else if segments.iter().any(|s| s.bold) {
        Emphasis::Bold
    } else if segments.iter().any(|s| s.italic) {
        Emphasis::Italic
    } else {
        Emphasis::Plain
    }
}

/// Concatenates segment text with style markers already stripped.
fn flatten(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// Greedy word wrap with a hanging indent.
fn wrap_with_prefix(text: &str, width: usize, first: &str, rest: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::from(first);
    let mut content_width = 0usize;
    let mut is_first = true;

    let avail = |first_line: bool| {
        let prefix = if first_line { first } else { rest };
        width.saturating_sub(prefix.width()).max(1)
    };

    for word in text.split_whitespace() {
        let word_width = word.width();
        let sep = usize::from(content_width > 0);
        if content_width > 0 && content_width + sep + word_width > avail(is_first) {
            lines.push(std::mem::take(&mut current));
            is_first = false;
            current = String::from(rest);
            content_width = 0;
        }
        if content_width > 0 {
            current.push(' ');
            content_width += 1;
        }
        // A single word longer than the budget is hard-broken.
        if word_width > avail(is_first) {
            for ch in word.chars() {
                let ch_width = ch.to_string().width();
                if content_width + ch_width > avail(is_first) && content_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    is_first = false;
                    current = String::from(rest);
                    content_width = 0;
                }
                current.push(ch);
                content_width += ch_width;
            }
        } else {
            current.push_str(word);
            content_width += word_width;
        }
    }

    if content_width > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Pads cells into a plain-text grid, one string per row.
fn render_table(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.width());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (col, cell_width) in widths.iter().enumerate() {
                let cell = row.get(col).map_or("", String::as_str);
                if col > 0 {
                    line.push_str("  ");
                }
                line.push_str(cell);
                line.push_str(&" ".repeat(cell_width.saturating_sub(cell.width())));
            }
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use railvision_markdown::tokenize;

    use super::*;

    fn layout(markdown: &str, width: usize) -> Vec<LayoutLine> {
        build_layout(&tokenize(markdown), &LayoutOptions { width })
    }

    #[test]
    fn collapse_prefers_most_specific_style() {
        let lines = layout("plain with **bold** and *italic*", 80);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].emphasis, Emphasis::Bold);
        assert_eq!(lines[0].text, "plain with bold and italic");

        let lines = layout("has ***both*** and **bold**", 80);
        assert_eq!(lines[0].emphasis, Emphasis::BoldItalic);

        let lines = layout("only *italic* here", 80);
        assert_eq!(lines[0].emphasis, Emphasis::Italic);
    }

    #[test]
    fn paragraph_wraps_at_width() {
        let lines = layout("alpha beta gamma delta", 11);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn list_items_get_hanging_indent() {
        let lines = layout("- first second third", 14);
        assert_eq!(lines[0].text, "• first second");
        assert_eq!(lines[1].text, "  third");
    }

    #[test]
    fn ordered_marker_keeps_index() {
        let lines = layout("3. third thing", 80);
        assert_eq!(lines[0].text, "3. third thing");
    }

    #[test]
    fn code_lines_are_verbatim() {
        let lines = layout("```\nlet x = very_long_name_that_exceeds_width();\n```", 10);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LineKind::Code);
        assert_eq!(lines[0].text, "let x = very_long_name_that_exceeds_width();");
    }

    #[test]
    fn table_renders_padded_grid() {
        let lines = layout("| name | id |\n|---|---|\n| alpha | 1 |", 80);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "name   id");
        assert_eq!(lines[1].text, "alpha  1");
    }

    #[test]
    fn heading_carries_level() {
        let lines = layout("## Section", 80);
        assert_eq!(lines[0].kind, LineKind::Heading { level: 2 });
        assert_eq!(lines[0].text, "Section");
    }

    #[test]
    fn rule_is_capped_at_forty() {
        let lines = layout("---", 120);
        assert_eq!(lines[0].kind, LineKind::Rule);
        assert_eq!(lines[0].text.chars().count(), 40);
    }

    #[test]
    fn blockquote_lines_are_prefixed() {
        let lines = layout("> quoted\n> words", 80);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["> quoted", "> words"]);
    }
}
