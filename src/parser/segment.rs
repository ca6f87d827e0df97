//! Tag segmentation: split logical lines into named raw sections.
//!
//! Single left-to-right pass. `\param` bodies continue only over indented
//! lines; every other tag body runs until a blank line or the next tag.
//! Unrecognized `\word` lines are prose and never split a section.

use tracing::debug;

/// Which part of a [`crate::model::DocComment`] a raw section feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Brief,
    Description,
    Param(String),
    Returns,
    Pre,
    Post,
    Warning,
    Remark,
    Body,
}

/// A contiguous run of lines owned by one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

/// Output of [`segment`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Segments {
    pub sections: Vec<RawSection>,
    pub see_also: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tag {
    /// Tags whose body runs to the next blank line or tag.
    Body(SectionKind),
    Param,
    See,
    Metadata,
}

/// Recognize a section-introducing line. Returns the tag and the text that
/// follows it on the same line.
fn recognize(line: &str) -> Option<(Tag, &str)> {
    let t = line.trim_start();
    if t.starts_with("def_API") || t.starts_with("extra_API") {
        return Some((Tag::Metadata, ""));
    }

    let after = t.strip_prefix('\\')?;
    let word_len = after
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(after.len());
    let (word, rest) = after.split_at(word_len);

    // `\precondition` is not `\pre`
    let boundary_ok = rest.is_empty()
        || rest.starts_with(char::is_whitespace)
        || (word == "param" && rest.starts_with('['));
    if !boundary_ok {
        return None;
    }

    let tag = match word {
        "brief" => Tag::Body(SectionKind::Brief),
        "param" => Tag::Param,
        "returns" | "return" => Tag::Body(SectionKind::Returns),
        "pre" => Tag::Body(SectionKind::Pre),
        "post" => Tag::Body(SectionKind::Post),
        "warning" => Tag::Body(SectionKind::Warning),
        "remark" | "remarks" => Tag::Body(SectionKind::Remark),
        "sa" | "see" => Tag::See,
        _ => return None,
    };
    Some((tag, rest.trim()))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Split a preprocessed comment into sections.
pub fn segment(lines: &[String]) -> Segments {
    let mut out = Segments::default();
    // Untagged text goes to `description` until some tag other than
    // `\brief` has opened.
    let mut past_description = false;
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        if is_blank(line) {
            i += 1;
            continue;
        }

        let Some((tag, rest)) = recognize(line) else {
            let start = i;
            i += 1;
            while i < lines.len() && recognize(&lines[i]).is_none() {
                i += 1;
            }
            let kind = if past_description {
                SectionKind::Body
            } else {
                SectionKind::Description
            };
            out.sections.push(RawSection {
                kind,
                lines: lines[start..i].to_vec(),
            });
            continue;
        };

        i += 1;
        match tag {
            Tag::Metadata => {
                debug!(line = %line.trim(), "discarding metadata marker");
            }
            Tag::See => {
                past_description = true;
                out.see_also.extend(
                    rest.split(|c: char| c.is_whitespace() || c == ',')
                        .map(|s| s.trim_start_matches('#'))
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
            }
            Tag::Param => {
                past_description = true;
                let (name, first) = split_param(rest);
                let mut continuation = Vec::new();
                while i < lines.len() {
                    let l = &lines[i];
                    if is_blank(l) || !is_indented(l) || recognize(l).is_some() {
                        break;
                    }
                    continuation.push(l.as_str());
                    i += 1;
                }
                let Some(name) = name else {
                    debug!("\\param without a parameter name");
                    continue;
                };
                let mut body = Vec::new();
                if !first.is_empty() {
                    body.push(first.to_string());
                }
                body.extend(dedent_all(&continuation));
                out.sections.push(RawSection {
                    kind: SectionKind::Param(name.to_string()),
                    lines: body,
                });
            }
            Tag::Body(kind) => {
                if kind != SectionKind::Brief {
                    past_description = true;
                }
                let mut body = Vec::new();
                if !rest.is_empty() {
                    body.push(rest.to_string());
                }
                while i < lines.len() && !is_blank(&lines[i]) && recognize(&lines[i]).is_none() {
                    body.push(lines[i].clone());
                    i += 1;
                }
                out.sections.push(RawSection { kind, lines: body });
            }
        }
    }

    out
}

/// `"[in] name rest of line"` into `(Some("name"), "rest of line")`.
fn split_param(rest: &str) -> (Option<&str>, &str) {
    let mut rest = rest.trim_start();
    if let Some(bracketed) = rest.strip_prefix('[') {
        rest = bracketed
            .split_once(']')
            .map_or("", |(_, tail)| tail.trim_start());
    }
    match rest.split_once(char::is_whitespace) {
        Some((name, tail)) => (Some(name), tail.trim()),
        None if !rest.is_empty() => (Some(rest), ""),
        None => (None, ""),
    }
}

/// Remove the common leading indentation of a group of lines.
fn dedent_all(lines: &[&str]) -> Vec<String> {
    let margin = lines
        .iter()
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| l[margin..].trim_end().to_string())
        .collect()
}
