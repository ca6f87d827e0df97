//! Block structure: paragraphs, bullet lists, code blocks and nice boxes.
//!
//! One forward pass over a section's raw lines. Openers are checked on
//! every line, so a list or paragraph running straight into `\code` or
//! `\nicebox{` is still split correctly.

use crate::model::{Block, BulletItem};
use crate::parser::inline::{parse_inline, SymbolConvention};
use tracing::warn;

const CODE_OPEN: &str = "\\code";
const CODE_CLOSE: &str = "\\endcode";
const BOX_OPEN: &str = "\\nicebox{";

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Text of a `- item` line, if it is one.
fn bullet_text(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix("- ")
}

fn opens_code(line: &str) -> bool {
    line.contains(CODE_OPEN)
}

fn opens_box(line: &str) -> bool {
    line.contains(BOX_OPEN)
}

fn starts_block(line: &str) -> bool {
    bullet_text(line).is_some() || opens_code(line) || opens_box(line)
}

/// Parse one raw line group into blocks.
pub fn parse_blocks(lines: &[String], convention: &SymbolConvention) -> Vec<Block> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        let rest = &lines[i..];
        i += if is_blank(line) {
            1
        } else if bullet_text(line).is_some() {
            parse_list(rest, convention, &mut out)
        } else if opens_code(line) {
            parse_code(rest, convention, &mut out)
        } else if opens_box(line) {
            parse_box(rest, convention, &mut out)
        } else {
            parse_paragraph(rest, convention, &mut out)
        };
    }

    out
}

/// Returns the number of lines consumed.
fn parse_paragraph(lines: &[String], convention: &SymbolConvention, out: &mut Vec<Block>) -> usize {
    let mut parts: Vec<&str> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 && (is_blank(line) || starts_block(line)) {
            break;
        }
        parts.push(line.trim());
    }
    push_paragraph(&parts.join(" "), convention, out);
    parts.len()
}

fn push_paragraph(text: &str, convention: &SymbolConvention, out: &mut Vec<Block>) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(Block::paragraph(parse_inline(text, convention)));
    }
}

fn parse_list(lines: &[String], convention: &SymbolConvention, out: &mut Vec<Block>) -> usize {
    let mut items: Vec<String> = Vec::new();
    let mut item_indent = 0;
    let mut consumed = 0;

    for line in lines {
        if let Some(text) = bullet_text(line) {
            items.push(text.trim().to_string());
            item_indent = indent_width(line);
        } else if !is_blank(line)
            && indent_width(line) > item_indent
            && !opens_code(line)
            && !opens_box(line)
        {
            // `items` is never empty here: the first line is always a bullet.
            if let Some(current) = items.last_mut() {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(line.trim());
            }
        } else {
            break;
        }
        consumed += 1;
    }

    out.push(Block::BulletList {
        items: items
            .iter()
            .map(|text| BulletItem {
                content: parse_inline(text, convention),
            })
            .collect(),
    });
    consumed
}

fn parse_code(lines: &[String], convention: &SymbolConvention, out: &mut Vec<Block>) -> usize {
    let opener = lines[0].as_str();
    let (before, after) = opener.split_once(CODE_OPEN).unwrap_or(("", opener));
    push_paragraph(before, convention, out);
    let after = strip_language(after);

    // `\code x \endcode` on a single line
    if let Some((inner, trailing)) = after.split_once(CODE_CLOSE) {
        out.push(Block::CodeBlock {
            code: inner.trim().to_string(),
        });
        push_paragraph(trailing, convention, out);
        return 1;
    }

    let mut code: Vec<&str> = Vec::new();
    if !is_blank(after) {
        code.push(after.trim());
    }

    let mut consumed = 1;
    let mut trailing = "";
    let mut closed = false;
    for line in &lines[1..] {
        consumed += 1;
        if let Some((last, tail)) = line.split_once(CODE_CLOSE) {
            if !is_blank(last) {
                code.push(last);
            }
            trailing = tail;
            closed = true;
            break;
        }
        code.push(line);
    }
    if !closed {
        warn!("unterminated \\code block; consuming to end of section");
    }

    out.push(Block::CodeBlock {
        code: dedent(&code).join("\n"),
    });
    push_paragraph(trailing, convention, out);
    consumed
}

/// Drop a Doxygen `{.lang}` suffix after `\code`.
fn strip_language(after: &str) -> &str {
    if after.starts_with("{.") {
        if let Some(end) = after.find('}') {
            return &after[end + 1..];
        }
    }
    after
}

fn parse_box(lines: &[String], convention: &SymbolConvention, out: &mut Vec<Block>) -> usize {
    let opener = lines[0].as_str();
    let (before, after) = opener.split_once(BOX_OPEN).unwrap_or(("", opener));
    push_paragraph(before, convention, out);

    let mut raw: Vec<&str> = Vec::new();
    if !is_blank(after) {
        raw.push(after.trim());
    }

    let mut consumed = 1;
    let mut closed = false;
    for line in &lines[1..] {
        consumed += 1;
        if line.trim() == "}" {
            closed = true;
            break;
        }
        raw.push(line);
    }
    if !closed {
        warn!("unterminated \\nicebox block; consuming to end of section");
    }

    out.push(Block::NiceBox { lines: dedent(&raw) });
    consumed
}

/// Strip the common indentation of the non-blank lines; blank lines become
/// empty.
fn dedent(lines: &[&str]) -> Vec<String> {
    let margin = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if is_blank(l) {
                String::new()
            } else {
                l[margin..].trim_end().to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Inline;

    fn parse(text: &str) -> Vec<Block> {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        parse_blocks(&lines, &SymbolConvention::any())
    }

    fn para(text: &str) -> Block {
        Block::paragraph(vec![Inline::text(text)])
    }

    fn item(text: &str) -> BulletItem {
        BulletItem {
            content: vec![Inline::text(text)],
        }
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        assert_eq!(
            parse("line one\nline two\n\n\nline three"),
            vec![para("line one line two"), para("line three")]
        );
    }

    #[test]
    fn bullet_continuation_joins_with_space() {
        assert_eq!(
            parse("- First item\n  continued.\n- Second"),
            vec![Block::BulletList {
                items: vec![item("First item continued."), item("Second")]
            }]
        );
    }

    #[test]
    fn unindented_line_ends_list() {
        assert_eq!(
            parse("- a\n- b\nAfter the list."),
            vec![
                Block::BulletList {
                    items: vec![item("a"), item("b")]
                },
                para("After the list.")
            ]
        );
    }

    #[test]
    fn paragraph_then_list_without_blank() {
        assert_eq!(
            parse("Options:\n- x\n- y"),
            vec![
                para("Options:"),
                Block::BulletList {
                    items: vec![item("x"), item("y")]
                }
            ]
        );
    }

    #[test]
    fn code_block_is_verbatim() {
        assert_eq!(
            parse("\\code\n   (declare-const x Int)\n     (assert (> x 0))\n\\endcode"),
            vec![Block::CodeBlock {
                code: "(declare-const x Int)\n  (assert (> x 0))".to_string()
            }]
        );
    }

    #[test]
    fn paragraph_runs_into_code() {
        assert_eq!(
            parse("Example:\n\\code\nf(x);\n\\endcode\nDone."),
            vec![
                para("Example:"),
                Block::CodeBlock {
                    code: "f(x);".to_string()
                },
                para("Done.")
            ]
        );
    }

    #[test]
    fn list_runs_into_code() {
        let blocks = parse("- a\n  \\code x < y \\endcode");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::BulletList { ref items } if items.len() == 1));
        assert_eq!(
            blocks[1],
            Block::CodeBlock {
                code: "x < y".to_string()
            }
        );
    }

    #[test]
    fn partial_content_on_code_delimiters() {
        assert_eq!(
            parse("\\code{.c} int a;\nint b; \\endcode"),
            vec![Block::CodeBlock {
                code: "int a;\nint b;".to_string()
            }]
        );
    }

    #[test]
    fn unterminated_code_consumes_rest() {
        assert_eq!(
            parse("\\code\na\n\nb"),
            vec![Block::CodeBlock {
                code: "a\n\nb".to_string()
            }]
        );
    }

    #[test]
    fn nicebox_collects_until_lone_brace() {
        assert_eq!(
            parse("\\nicebox{\n   T1: (~ p q)\n   [symmetry T1]: (~ q p)\n}\nAfter."),
            vec![
                Block::NiceBox {
                    lines: vec!["T1: (~ p q)".to_string(), "[symmetry T1]: (~ q p)".to_string()]
                },
                para("After.")
            ]
        );
    }

    #[test]
    fn nicebox_keeps_inner_braces() {
        let blocks = parse("\\nicebox{\n{a}\n  x }\n}");
        assert_eq!(
            blocks,
            vec![Block::NiceBox {
                lines: vec!["{a}".to_string(), "  x }".to_string()]
            }]
        );
    }

    #[test]
    fn leading_blank_lines_skipped() {
        assert_eq!(parse("\n\ntext\n"), vec![para("text")]);
    }
}
