//! Comment decoration stripping.
//!
//! Turns a raw comment into logical lines. Indentation relative to the
//! comment's own left margin and blank lines both survive, since the
//! segmenter and block parser key off them.

/// Strip decoration from a raw comment body.
///
/// Handles `/** ... */` blocks with or without leading `*` columns and
/// `///` / `//!` line comments. A line holding only decoration becomes an
/// empty string rather than disappearing.
pub fn preprocess(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    // Content that shared a line with the opener has no meaningful margin.
    let mut opener_line: Option<usize> = None;

    for (i, line) in raw.split('\n').enumerate() {
        let line = line.trim_end_matches('\r');
        let (stripped, had_opener) = strip_decoration(line);
        if had_opener && i == 0 && !stripped.trim().is_empty() {
            opener_line = Some(lines.len());
        }
        lines.push(stripped);
    }

    let margin = lines
        .iter()
        .enumerate()
        .filter(|(i, l)| Some(*i) != opener_line && !l.trim().is_empty())
        .map(|(_, l)| indent_width(l))
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| {
            if l.trim().is_empty() {
                String::new()
            } else if Some(i) == opener_line {
                l.trim().to_string()
            } else {
                dedent(&l, margin).trim_end().to_string()
            }
        })
        .collect();

    // Leading and trailing decoration-only lines carry no structure.
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    let leading = out.iter().take_while(|l| l.is_empty()).count();
    out.drain(..leading);
    out
}

/// Remove comment markers from one line. Returns the remaining text and
/// whether a block opener was removed.
fn strip_decoration(line: &str) -> (String, bool) {
    let mut text = line.to_string();
    let mut had_opener = false;

    if let Some(pos) = text.rfind("*/") {
        text.truncate(pos);
    }

    let trimmed = text.trim_start();
    let lead = text.len() - trimmed.len();
    if let Some(rest) = trimmed.strip_prefix("/**").or_else(|| trimmed.strip_prefix("/*!")) {
        had_opener = true;
        text = format!("{}{}", " ".repeat(lead + 3), rest);
    } else if let Some(rest) = trimmed.strip_prefix("/*") {
        had_opener = true;
        text = format!("{}{}", " ".repeat(lead + 2), rest);
    } else if let Some(rest) = trimmed
        .strip_prefix("///")
        .or_else(|| trimmed.strip_prefix("//!"))
        .or_else(|| trimmed.strip_prefix("//"))
    {
        text = rest.to_string();
    } else if let Some(rest) = trimmed.strip_prefix('*') {
        text = rest.to_string();
    }

    (text, had_opener)
}

/// Width of leading whitespace, tabs counted as one column.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn dedent(line: &str, margin: usize) -> &str {
    let mut idx = 0;
    for (taken, (i, c)) in line.char_indices().enumerate() {
        if taken == margin || !(c == ' ' || c == '\t') {
            idx = i;
            break;
        }
        idx = i + c.len_utf8();
    }
    &line[idx..]
}
