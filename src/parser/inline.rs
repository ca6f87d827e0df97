//! Inline markup: `\c word`, `\p word`, `\ccode{...}` and `#symbol`.

use crate::model::{Inline, RefKind};

/// Decides which `#ident` tokens are symbol references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolConvention {
    prefix: Option<String>,
}

impl SymbolConvention {
    /// Every C identifier is a candidate reference.
    pub fn any() -> Self {
        Self::default()
    }

    /// Only identifiers starting with `prefix` (e.g. `Z3_`) are references.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
        }
    }

    pub fn matches(&self, ident: &str) -> bool {
        let starts_ok = ident
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        starts_ok && self.prefix.as_deref().map_or(true, |p| ident.starts_with(p))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn word_len(s: &str) -> usize {
    s.find(|c: char| !is_word_char(c)).unwrap_or(s.len())
}

/// Byte offset of the `}` closing an already-opened brace, if any.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Default)]
struct InlineBuilder {
    nodes: Vec<Inline>,
    text: String,
}

impl InlineBuilder {
    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    fn push_node(&mut self, node: Inline) {
        self.flush();
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.nodes.push(Inline::Text { text });
        }
    }

    fn finish(mut self) -> Vec<Inline> {
        self.flush();
        self.nodes
    }
}

/// Split joined paragraph text into inline nodes.
///
/// References come back as [`RefKind::Unknown`]; classification is the
/// resolver's job. Malformed markup is kept as text.
pub fn parse_inline(text: &str, convention: &SymbolConvention) -> Vec<Inline> {
    let mut out = InlineBuilder::default();
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("\\ccode{") {
            if let Some(end) = matching_brace(after) {
                out.push_node(Inline::code(&after[..end]));
                rest = &after[end + 1..];
                prev = Some('}');
                continue;
            }
        }

        if let Some(after) = rest
            .strip_prefix("\\c")
            .or_else(|| rest.strip_prefix("\\p"))
            .filter(|a| a.starts_with(char::is_whitespace))
        {
            let after = after.trim_start();
            let n = word_len(after);
            if n > 0 {
                out.push_node(Inline::code(&after[..n]));
                rest = &after[n..];
                prev = Some('x');
                continue;
            }
        }

        if c == '#' && !prev.is_some_and(is_word_char) {
            let after = &rest[1..];
            let n = word_len(after);
            if n > 0 {
                let ident = &after[..n];
                if convention.matches(ident) {
                    out.push_node(Inline::Reference {
                        symbol: ident.to_string(),
                        kind: RefKind::Unknown,
                    });
                } else {
                    out.push_str(ident);
                }
                rest = &after[n..];
                prev = ident.chars().last();
                continue;
            }
        }

        let len = c.len_utf8();
        out.push_str(&rest[..len]);
        rest = &rest[len..];
        prev = Some(c);
    }

    out.finish()
}
