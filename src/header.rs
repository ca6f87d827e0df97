//! C header scanner.
//!
//! Pulls documented declarations and every enumerant out of a header. Works
//! on a masked copy of the source where comments, string literals and
//! preprocessor lines are blanked to spaces, so byte offsets line up with
//! the original text and stray braces in comments cannot confuse the
//! brace matching.

use crate::catalog::CatalogError;
use crate::model::{Constant, Corpus, Entity, EntityKind, Param};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_ENUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\benum\s*(\w*)\s*\{").unwrap());

static RE_ENUM_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:typedef\s+)?enum\s*(\w*)\s*\{").unwrap());

static RE_TRAILING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w+)").unwrap());

static RE_PROTOTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)\b(\w+)\s*\((.*)\)$").unwrap());

static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\w+)\s*((?:\[[^\]]*\]\s*)*)$").unwrap());

static RE_DEF_API: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"def_API\(\s*'(\w+)'").unwrap());

static RE_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Byte range of a `/** ... */` block in the original source.
#[derive(Debug, Clone, Copy)]
struct DocBlock {
    start: usize,
    end: usize,
}

/// Scan one header. `origin` names the file in constant origins and errors.
pub fn scan(source: &str, origin: &str) -> Result<Corpus, CatalogError> {
    let (masked, docs) = mask(source);
    let constants = enumerants(&masked, origin)?;

    let mut entities = Vec::new();
    for (k, doc) in docs.iter().enumerate() {
        let Some(semi) = declaration_end(&masked, doc.end) else {
            debug!(origin, offset = doc.start, "doc comment without a declaration");
            continue;
        };
        if docs.get(k + 1).is_some_and(|next| next.start < semi) {
            debug!(origin, offset = doc.start, "doc comment not attached to a declaration");
            continue;
        }
        let comment = &source[doc.start..doc.end];
        let decl = masked[doc.end..semi].trim();
        if let Some(found) = entity(decl, comment) {
            entities.push(found);
        }
    }

    debug!(
        origin,
        entities = entities.len(),
        constants = constants.len(),
        "scanned header"
    );
    Ok(Corpus {
        entities,
        constants,
    })
}

/// Blank comments, literals and preprocessor lines, keeping newlines and
/// byte offsets. Also returns every `/**` block (member docs `/**<` and the
/// empty `/**/` excluded).
fn mask(source: &str) -> (String, Vec<DocBlock>) {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut docs = Vec::new();
    let mut line_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        let end = if b == b'/' && next == Some(b'*') {
            let end = source[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            let text = &source[i..end];
            if text.starts_with("/**") && !text.starts_with("/**<") && !text.starts_with("/**/") {
                docs.push(DocBlock { start: i, end });
            }
            end
        } else if b == b'/' && next == Some(b'/') {
            line_end(source, i)
        } else if b == b'#' && line_start {
            preprocessor_end(source, i)
        } else if b == b'"' || b == b'\'' {
            literal_end(bytes, i)
        } else {
            if b == b'\n' {
                line_start = true;
            } else if !b.is_ascii_whitespace() {
                line_start = false;
            }
            i += 1;
            continue;
        };

        for byte in &mut out[i..end] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
        line_start = false;
        i = end;
    }

    // Only whole ASCII-delimited ranges were blanked, so this never
    // replaces anything.
    (String::from_utf8_lossy(&out).into_owned(), docs)
}

fn line_end(source: &str, from: usize) -> usize {
    source[from..].find('\n').map_or(source.len(), |p| from + p)
}

/// End of a preprocessor directive, following `\` continuations.
fn preprocessor_end(source: &str, from: usize) -> usize {
    let mut end = line_end(source, from);
    while end < source.len() && source[from..end].trim_end().ends_with('\\') {
        end = line_end(source, end + 1);
    }
    end
}

fn literal_end(bytes: &[u8], from: usize) -> usize {
    let quote = bytes[from];
    let mut i = from + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Offset of the `}` matching the `{` at `open`.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
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

/// Offset of the first `;` outside braces at or after `from`.
fn declaration_end(masked: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in masked.bytes().enumerate().skip(from) {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split on `sep` outside parentheses and brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Every enumerant of every `enum { ... }` body in the masked source.
fn enumerants(masked: &str, origin: &str) -> Result<Vec<Constant>, CatalogError> {
    let mut out = Vec::new();
    for caps in RE_ENUM.captures_iter(masked) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let open = whole.end() - 1;
        let Some(close) = matching_brace(masked, open) else {
            return Err(CatalogError::Unterminated {
                context: format!("{origin} at byte {}", whole.start()),
            });
        };

        let tag = caps.get(1).map_or("", |m| m.as_str());
        let name = if tag.is_empty() {
            RE_TRAILING_NAME
                .captures(&masked[close + 1..])
                .and_then(|c| c.get(1))
                .map_or("<anonymous>", |m| m.as_str())
        } else {
            tag
        };
        let context = format!("enum {name} in {origin}");

        out.extend(enumerant_names(&masked[open + 1..close]).map(|ident| Constant {
            name: ident.to_string(),
            origin: context.clone(),
        }));
    }
    Ok(out)
}

/// `A = -1, B, C` into `A`, `B`, `C`.
fn enumerant_names(body: &str) -> impl Iterator<Item = &str> {
    split_top_level(body, ',')
        .into_iter()
        .map(|item| item.split('=').next().unwrap_or("").trim())
        .filter(|ident| !ident.is_empty())
}

/// Build an entity from the declaration that follows a doc comment.
fn entity(decl: &str, comment: &str) -> Option<Entity> {
    if let Some(caps) = RE_ENUM_DECL.captures(decl) {
        let open = caps.get(0)?.end() - 1;
        let tag = caps.get(1).map_or("", |m| m.as_str());
        let close = matching_brace(decl, open)?;
        let trailing = RE_TRAILING_NAME
            .captures(&decl[close + 1..])
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        let Some(name) = trailing.or((!tag.is_empty()).then_some(tag)) else {
            debug!("documented enum without a name");
            return None;
        };
        return Some(Entity {
            name: name.to_string(),
            kind: EntityKind::Enum,
            params: Vec::new(),
            values: enumerant_names(&decl[open + 1..close])
                .map(str::to_string)
                .collect(),
            comment: comment.to_string(),
        });
    }

    // `typedef void (*handler)(...)` and friends declare no function.
    if decl.starts_with("typedef") || is_function_pointer(decl) {
        debug!(decl, "documented declaration is not a function");
        return None;
    }

    let caps = RE_PROTOTYPE.captures(decl)?;
    let declared = caps.get(2)?.as_str();
    let name = RE_DEF_API
        .captures(comment)
        .and_then(|c| c.get(1))
        .map_or(declared, |m| m.as_str());
    let params = caps
        .get(3)
        .map(|m| parse_params(m.as_str()))
        .unwrap_or_default();

    Some(Entity {
        name: name.to_string(),
        kind: EntityKind::Function,
        params,
        values: Vec::new(),
        comment: comment.to_string(),
    })
}

/// First `(` opens a `(*name)` declarator.
fn is_function_pointer(decl: &str) -> bool {
    decl.find('(')
        .is_some_and(|p| decl[p + 1..].trim_start().starts_with('*'))
}

/// `Z3_context c, unsigned num_args, Z3_ast const args[]` into
/// `(c_type, name)` pairs. `void` means no parameters.
fn parse_params(list: &str) -> Vec<Param> {
    let list = list.trim();
    if list.is_empty() || list == "void" {
        return Vec::new();
    }
    split_top_level(list, ',')
        .into_iter()
        .map(normalize)
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_param(&raw))
        .collect()
}

/// `Z3_ast const args[]` into `("Z3_ast const[]", "args")`. A lone type
/// keeps an empty name.
fn parse_param(raw: &str) -> Param {
    if let Some(caps) = RE_PARAM.captures(raw) {
        if !caps[1].trim().is_empty() {
            let arrays: String = caps[3].chars().filter(|c| !c.is_whitespace()).collect();
            return Param {
                c_type: format!("{}{}", normalize(&caps[1]), arrays),
                name: caps[2].to_string(),
            };
        }
    }
    Param {
        c_type: raw.to_string(),
        name: String::new(),
    }
}

/// Collapse whitespace and attach `*` to the type.
fn normalize(text: &str) -> String {
    RE_WS
        .replace_all(text.trim(), " ")
        .replace(" *", "*")
}
