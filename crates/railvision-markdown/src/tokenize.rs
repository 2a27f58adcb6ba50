//! Line-oriented markdown tokenizer.
//!
//! Rules are evaluated per line, top to bottom, first match wins:
//! blank, horizontal rule, heading, fenced code, table run, blockquote run,
//! bullet item, ordered item, then greedy paragraph absorption. Any line
//! failing the structural checks extends the current paragraph (soft-wrapped
//! prose), joined with a single space.

use std::sync::LazyLock;

use railvision_types::Token;
use regex::Regex;

static HR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\*{3,}|-{3,}|_{3,})[ \t]*$").expect("valid pattern"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid pattern"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").expect("valid pattern"));
static ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d+)[.)]\s+(.*)$").expect("valid pattern"));

/// Converts a markdown-flavored string into an ordered token sequence.
///
/// Pure and infallible; whitespace-only input yields an empty sequence.
pub fn tokenize(input: &str) -> Vec<Token> {
    let lines: Vec<&str> = input.lines().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if HR.is_match(line) {
            tokens.push(Token::Hr);
            i += 1;
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            tokens.push(Token::Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
            });
            i += 1;
            continue;
        }

        if let Some(rest) = fence_rest(line) {
            let lang = rest.trim();
            let lang = (!lang.is_empty()).then(|| lang.to_string());
            let mut body = Vec::new();
            i += 1;
            while i < lines.len() {
                if fence_rest(lines[i]).is_some() {
                    // Closing fence is consumed, not collected.
                    i += 1;
                    break;
                }
                body.push(lines[i]);
                i += 1;
            }
            tokens.push(Token::Code {
                lang,
                text: body.join("\n"),
            });
            continue;
        }

        if is_table_line(line) {
            let mut rows = Vec::new();
            while i < lines.len() && is_table_line(lines[i]) {
                if let Some(cells) = table_row(lines[i]) {
                    rows.push(cells);
                }
                i += 1;
            }
            // A run of nothing but separator rows produces no token.
            if !rows.is_empty() {
                tokens.push(Token::Table { rows });
            }
            continue;
        }

        if is_quote_line(line) {
            let mut quoted = Vec::new();
            while i < lines.len() && is_quote_line(lines[i]) {
                let body = lines[i].trim().strip_prefix('>').unwrap_or("");
                quoted.push(body.strip_prefix(' ').unwrap_or(body));
                i += 1;
            }
            tokens.push(Token::Blockquote {
                text: quoted.join("\n"),
            });
            continue;
        }

        if let Some(caps) = BULLET.captures(line) {
            tokens.push(Token::Bullet {
                level: caps[1].len() / 2,
                text: caps[2].to_string(),
            });
            i += 1;
            continue;
        }

        if let Some(caps) = ORDERED.captures(line) {
            tokens.push(Token::Ordered {
                index: caps[2].parse().unwrap_or(0),
                level: caps[1].len() / 2,
                text: caps[3].to_string(),
            });
            i += 1;
            continue;
        }

        // Paragraph: absorb every following line that is non-blank and not
        // structural, joined with a single space.
        let mut parts = vec![line.trim()];
        i += 1;
        while i < lines.len() {
            let next = lines[i];
            if next.trim().is_empty() || is_structural(next) {
                break;
            }
            parts.push(next.trim());
            i += 1;
        }
        tokens.push(Token::Paragraph {
            text: parts.join(" "),
        });
    }

    tokens
}

/// The text after an opening/closing fence, if the trimmed line is one.
fn fence_rest(line: &str) -> Option<&str> {
    line.trim().strip_prefix("```")
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_quote_line(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

/// Splits a table line into trimmed cells; `None` for separator rows.
fn table_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    if inner
        .chars()
        .all(|c| c.is_whitespace() || c == '-' || c == ':' || c == '|')
    {
        return None;
    }
    Some(inner.split('|').map(|cell| cell.trim().to_string()).collect())
}

/// Whether a line matches any of the structural rules (2 through 8),
/// i.e. would terminate a paragraph.
fn is_structural(line: &str) -> bool {
    HR.is_match(line)
        || HEADING.is_match(line)
        || fence_rest(line).is_some()
        || is_table_line(line)
        || is_quote_line(line)
        || BULLET.is_match(line)
        || ORDERED.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_paragraph_table_scenario() {
        let input = "# Title\n\nSome *italic* and **bold** text.\n\n| a | b |\n|---|---|\n| 1 | 2 |";
        let tokens = tokenize(input);

        assert_eq!(
            tokens,
            vec![
                Token::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                Token::Paragraph {
                    text: "Some *italic* and **bold** text.".to_string()
                },
                Token::Table {
                    rows: vec![
                        vec!["a".to_string(), "b".to_string()],
                        vec!["1".to_string(), "2".to_string()],
                    ]
                },
            ]
        );
    }

    #[test]
    fn whitespace_only_input_yields_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\n\t\n").is_empty());
    }

    #[test]
    fn horizontal_rules() {
        assert_eq!(tokenize("---"), vec![Token::Hr]);
        assert_eq!(tokenize("*****  "), vec![Token::Hr]);
        assert_eq!(tokenize("___"), vec![Token::Hr]);
        // Two dashes is not a rule.
        assert_eq!(
            tokenize("--"),
            vec![Token::Paragraph {
                text: "--".to_string()
            }]
        );
    }

    #[test]
    fn heading_levels_cap_at_six() {
        assert_eq!(
            tokenize("###### deep"),
            vec![Token::Heading {
                level: 6,
                text: "deep".to_string()
            }]
        );
        // Seven hashes fails the heading rule and falls through to paragraph.
        assert_eq!(
            tokenize("####### too deep"),
            vec![Token::Paragraph {
                text: "####### too deep".to_string()
            }]
        );
    }

    #[test]
    fn fenced_code_collects_verbatim() {
        let input = "```rust\nfn main() {\n    # not a heading\n}\n```\nafter";
        let tokens = tokenize(input);
        assert_eq!(
            tokens,
            vec![
                Token::Code {
                    lang: Some("rust".to_string()),
                    text: "fn main() {\n    # not a heading\n}".to_string()
                },
                Token::Paragraph {
                    text: "after".to_string()
                },
            ]
        );
    }

    #[test]
    fn unterminated_fence_collects_to_end() {
        let tokens = tokenize("```\nstill code\nmore");
        assert_eq!(
            tokens,
            vec![Token::Code {
                lang: None,
                text: "still code\nmore".to_string()
            }]
        );
    }

    #[test]
    fn table_separator_rows_dropped_but_do_not_end_run() {
        let input = "| h1 | h2 |\n| --- | :-: |\n| a | b |\n| c | d |";
        let tokens = tokenize(input);
        assert_eq!(
            tokens,
            vec![Token::Table {
                rows: vec![
                    vec!["h1".to_string(), "h2".to_string()],
                    vec!["a".to_string(), "b".to_string()],
                    vec!["c".to_string(), "d".to_string()],
                ]
            }]
        );
    }

    #[test]
    fn all_separator_table_run_emits_nothing() {
        assert!(tokenize("|---|---|\n| --- |").is_empty());
    }

    #[test]
    fn table_after_blank_line_stays_separate_from_paragraph() {
        let tokens = tokenize("Some prose.\n\n| a |\n| 1 |");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::Paragraph { text } if text == "Some prose."));
        assert!(matches!(&tokens[1], Token::Table { .. }));
    }

    #[test]
    fn table_line_terminates_paragraph_even_without_blank() {
        let tokens = tokenize("prose line\n| a |\n| 1 |");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::Paragraph { text } if text == "prose line"));
    }

    #[test]
    fn blockquote_lines_join_with_newline() {
        let tokens = tokenize("> first\n>second\n> third");
        assert_eq!(
            tokens,
            vec![Token::Blockquote {
                text: "first\nsecond\nthird".to_string()
            }]
        );
    }

    #[test]
    fn bullet_nesting_uses_two_space_indent() {
        let tokens = tokenize("- top\n  * nested\n    + deeper");
        assert_eq!(
            tokens,
            vec![
                Token::Bullet {
                    level: 0,
                    text: "top".to_string()
                },
                Token::Bullet {
                    level: 1,
                    text: "nested".to_string()
                },
                Token::Bullet {
                    level: 2,
                    text: "deeper".to_string()
                },
            ]
        );
    }

    #[test]
    fn indented_ordered_item() {
        assert_eq!(
            tokenize("  1. foo"),
            vec![Token::Ordered {
                index: 1,
                level: 1,
                text: "foo".to_string()
            }]
        );
    }

    #[test]
    fn ordered_accepts_paren_marker() {
        assert_eq!(
            tokenize("2) second"),
            vec![Token::Ordered {
                index: 2,
                level: 0,
                text: "second".to_string()
            }]
        );
    }

    #[test]
    fn greedy_paragraph_absorption_joins_with_single_space() {
        let tokens = tokenize("wrapped\nprose continues\nhere");
        assert_eq!(
            tokens,
            vec![Token::Paragraph {
                text: "wrapped prose continues here".to_string()
            }]
        );
    }

    #[test]
    fn loose_list_continuation_is_absorbed() {
        // A continuation line without indent is prose by rule order; this
        // dialect quirk is load-bearing for the downstream renderers.
        let tokens = tokenize("- item\ncontinuation");
        assert_eq!(
            tokens,
            vec![
                Token::Bullet {
                    level: 0,
                    text: "item".to_string()
                },
                Token::Paragraph {
                    text: "continuation".to_string()
                },
            ]
        );
    }

    #[test]
    fn emphasis_line_is_not_a_bullet() {
        let tokens = tokenize("*italic words*");
        assert_eq!(
            tokens,
            vec![Token::Paragraph {
                text: "*italic words*".to_string()
            }]
        );
    }
}
