//! XML documentation comment renderer (`/// <summary>` style).

use crate::model::*;
use crate::naming::{NameStyle, NameTransform};
use crate::render::markup::{escape, Markup};
use crate::render::{RenderError, Renderer};
use std::collections::BTreeSet;

/// Output knobs shared by every entity.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Written before every `///`.
    pub indent: String,
    /// Callables that have no cref target. Matched against both the raw
    /// and the transformed name; rendered as text, omitted from see-also.
    pub plain_refs: BTreeSet<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            plain_refs: BTreeSet::new(),
        }
    }
}

/// Renders one [`DocComment`] to comment lines.
pub struct XmlDocRenderer<'a> {
    options: &'a RenderOptions,
    names: &'a dyn NameTransform,
}

impl<'a> XmlDocRenderer<'a> {
    pub fn new(options: &'a RenderOptions, names: &'a dyn NameTransform) -> Self {
        Self { options, names }
    }

    /// Comment lines in fixed section order: summary, params, returns,
    /// remarks, see-also. Each line carries the indent and `///` prefix.
    pub fn render(&self, doc: &DocComment) -> Vec<String> {
        let mut body: Vec<String> = Vec::new();

        let summary = if doc.brief.is_empty() {
            &doc.description
        } else {
            &doc.brief
        };
        self.section(&mut body, "<summary>", "</summary>", summary);

        for param in &doc.params {
            let mut open = format!("<param name=\"{}\"", escape(&param_name(&param.name)));
            if let Some(c_type) = param.c_type.as_deref().filter(|t| !t.is_empty()) {
                open.push_str(&format!(" ctype=\"{}\"", escape(c_type)));
            }
            open.push('>');
            if param.content.is_empty() {
                body.push(format!("{open}</param>"));
            } else {
                self.section(&mut body, &open, "</param>", &param.content);
            }
        }

        self.section(&mut body, "<returns>", "</returns>", &doc.returns);
        self.section(&mut body, "<remarks>", "</remarks>", &remarks(doc));

        for entry in &doc.see_also {
            let name = self.names.transform(entry);
            if self.is_plain(entry, &name) {
                continue;
            }
            body.push(format!("<seealso cref=\"{}\"/>", escape(&name)));
        }

        body.into_iter().map(|line| self.prefix(&line)).collect()
    }

    /// A single `<summary>` for one enumerant. Undescribed values get
    /// their own name.
    pub fn render_value(&self, value: &ValueDoc) -> Vec<String> {
        let mut body = Vec::new();
        if value.summary.is_empty() {
            body.push(format!("<summary>{}</summary>", escape(&value.name)));
        } else {
            let blocks = [Block::paragraph(value.summary.clone())];
            self.section(&mut body, "<summary>", "</summary>", &blocks);
        }
        body.into_iter().map(|line| self.prefix(&line)).collect()
    }

    fn prefix(&self, content: &str) -> String {
        if content.is_empty() {
            format!("{}///", self.options.indent)
        } else {
            format!("{}/// {}", self.options.indent, content)
        }
    }

    fn is_plain(&self, raw: &str, transformed: &str) -> bool {
        self.options.plain_refs.contains(raw) || self.options.plain_refs.contains(transformed)
    }

    /// Emit one section. Nothing is written for an empty block list.
    fn section(&self, out: &mut Vec<String>, open: &str, close: &str, blocks: &[Block]) {
        if blocks.is_empty() {
            return;
        }
        if let [Block::Paragraph { content }] = blocks {
            let text = self.inlines(content).render();
            if !text.contains('\n') {
                out.push(format!("{open}{text}{close}"));
                return;
            }
        }

        out.push(open.to_string());
        let wrap_paragraphs = blocks.len() > 1;
        for block in blocks {
            self.block(out, block, wrap_paragraphs);
        }
        out.push(close.to_string());
    }

    fn block(&self, out: &mut Vec<String>, block: &Block, wrap_paragraphs: bool) {
        match block {
            Block::Paragraph { content } => {
                let text = self.inlines(content).render();
                if wrap_paragraphs {
                    out.push(format!("<para>{text}</para>"));
                } else {
                    out.push(text);
                }
            }
            Block::BulletList { items } => {
                out.push("<list type=\"bullet\">".to_string());
                for item in items {
                    out.push(format!(
                        "<item><description>{}</description></item>",
                        self.inlines(&item.content).render()
                    ));
                }
                out.push("</list>".to_string());
            }
            Block::CodeBlock { code } => {
                out.push("<code>".to_string());
                out.extend(code.split('\n').map(escape));
                out.push("</code>".to_string());
            }
            Block::NiceBox { lines } => {
                out.push("<code>".to_string());
                out.extend(nice_box(lines));
                out.push("</code>".to_string());
            }
        }
    }

    fn inlines(&self, nodes: &[Inline]) -> Markup {
        let mut m = Markup::new();
        for node in nodes {
            match node {
                Inline::Text { text } => {
                    m.text(text);
                }
                Inline::InlineCode { code } => {
                    m.markup("<c>").text(code).markup("</c>");
                }
                Inline::Reference { symbol, kind } => {
                    m.append(self.reference(symbol, *kind));
                }
            }
        }
        m
    }

    fn reference(&self, symbol: &str, kind: RefKind) -> Markup {
        let mut m = Markup::new();
        match kind {
            RefKind::Value => {
                m.markup("<c>").text(symbol).markup("</c>");
            }
            RefKind::Callable => {
                let name = self.names.transform(symbol);
                if self.is_plain(symbol, &name) {
                    m.text(&name);
                } else {
                    m.markup(&format!("<see cref=\"{}\"/>", escape(&name)));
                }
            }
            RefKind::Unknown => {
                m.text(symbol);
            }
        }
        m
    }
}

/// C# reserved words that cannot name a parameter without `@`.
const CSHARP_KEYWORDS: &[&str] = &[
    "base", "bool", "byte", "char", "class", "decimal", "delegate", "double", "enum", "event",
    "fixed", "float", "int", "interface", "long", "namespace", "object", "out", "params", "ref",
    "short", "string", "struct", "this", "uint", "ulong", "ushort", "using", "void",
];

/// Parameter name as it appears in the C# signature.
fn param_name(name: &str) -> String {
    if CSHARP_KEYWORDS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Combined remarks: description (when it lost the summary slot to brief),
/// body, then labelled preconditions, postconditions and warnings, then
/// plain remarks.
fn remarks(doc: &DocComment) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::new();
    if !doc.brief.is_empty() {
        out.extend(doc.description.iter().cloned());
    }
    out.extend(doc.body.iter().cloned());
    for (label, groups) in [
        ("Precondition:", &doc.preconditions),
        ("Postcondition:", &doc.postconditions),
        ("Warning:", &doc.warnings),
    ] {
        for blocks in groups.iter().filter(|b| !b.is_empty()) {
            out.extend(labelled(label, blocks));
        }
    }
    for blocks in &doc.remarks {
        out.extend(blocks.iter().cloned());
    }
    out
}

/// Prefix the first paragraph with `label`, or put the label in its own
/// paragraph when the group starts with a list, code or box.
fn labelled(label: &str, blocks: &[Block]) -> Vec<Block> {
    let mut out = blocks.to_vec();
    match out.first_mut() {
        Some(Block::Paragraph { content }) => {
            content.insert(0, Inline::text(format!("{label} ")));
        }
        _ => out.insert(0, Block::paragraph(vec![Inline::text(label)])),
    }
    out
}

/// Draw a box around `lines`, padded to the widest line in characters.
fn nice_box(lines: &[String]) -> Vec<String> {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rule = "═".repeat(width + 2);
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("╔{rule}╗"));
    for line in lines {
        let pad = " ".repeat(width - line.chars().count());
        out.push(format!("║ {}{} ║", escape(line), pad));
    }
    out.push(format!("╚{rule}╝"));
    out
}

/// XML comment lines for a whole file, one `// name` header per entity.
pub struct XmlRenderer {
    pub options: RenderOptions,
    pub names: NameStyle,
}

impl Renderer for XmlRenderer {
    fn render(&self, entities: &[DocumentedEntity]) -> Result<String, RenderError> {
        let doc_renderer = XmlDocRenderer::new(&self.options, &self.names);
        let mut out = String::new();
        for entity in entities {
            out.push_str(&format!("{}// {}\n", self.options.indent, entity.name));
            for line in doc_renderer.render(&entity.doc) {
                out.push_str(&line);
                out.push('\n');
            }
            for value in &entity.values {
                out.push_str(&format!("{}// {}\n", self.options.indent, value.name));
                for line in doc_renderer.render_value(value) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "xmldoc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Block {
        Block::paragraph(vec![Inline::text(text)])
    }

    fn render(doc: &DocComment) -> Vec<String> {
        let options = RenderOptions {
            indent: String::new(),
            ..RenderOptions::default()
        };
        XmlDocRenderer::new(&options, &NameStyle::Keep).render(doc)
    }

    #[test]
    fn single_paragraph_sections_are_one_line() {
        let mut doc = DocComment::default();
        doc.brief = vec![para("Create a context.")];
        doc.returns = vec![para("the context")];
        assert_eq!(
            render(&doc),
            vec![
                "/// <summary>Create a context.</summary>",
                "/// <returns>the context</returns>",
            ]
        );
    }

    #[test]
    fn multiple_paragraphs_use_para() {
        let mut doc = DocComment::default();
        doc.remarks.push(vec![para("line1"), para("line2")]);
        assert_eq!(
            render(&doc),
            vec![
                "/// <remarks>",
                "/// <para>line1</para>",
                "/// <para>line2</para>",
                "/// </remarks>",
            ]
        );
    }

    #[test]
    fn description_is_summary_without_brief() {
        let mut doc = DocComment::default();
        doc.description = vec![para("Only description.")];
        assert_eq!(render(&doc), vec!["/// <summary>Only description.</summary>"]);
    }

    #[test]
    fn description_moves_to_remarks_with_brief() {
        let mut doc = DocComment::default();
        doc.brief = vec![para("B.")];
        doc.description = vec![para("D.")];
        doc.warnings.push(vec![para("careful")]);
        assert_eq!(
            render(&doc),
            vec![
                "/// <summary>B.</summary>",
                "/// <remarks>",
                "/// <para>D.</para>",
                "/// <para>Warning: careful</para>",
                "/// </remarks>",
            ]
        );
    }

    #[test]
    fn params_with_ctype_and_empty_body() {
        let mut doc = DocComment::default();
        doc.push_param("c", vec![para("logical context.")]);
        doc.push_param("unused", Vec::new());
        doc.params[0].c_type = Some("Z3_context".to_string());
        assert_eq!(
            render(&doc),
            vec![
                "/// <param name=\"c\" ctype=\"Z3_context\">logical context.</param>",
                "/// <param name=\"unused\"></param>",
            ]
        );
    }

    #[test]
    fn keyword_param_names_escaped() {
        let mut doc = DocComment::default();
        doc.push_param("out", vec![para("result.")]);
        doc.push_param("output", vec![para("kept.")]);
        assert_eq!(
            render(&doc),
            vec![
                "/// <param name=\"@out\">result.</param>",
                "/// <param name=\"output\">kept.</param>",
            ]
        );
    }

    #[test]
    fn combined_remarks_order() {
        let mut doc = DocComment::default();
        doc.brief = vec![para("B.")];
        doc.description = vec![para("D.")];
        doc.body = vec![para("body text")];
        doc.remarks.push(vec![para("R")]);
        doc.warnings.push(vec![para("W")]);
        doc.postconditions.push(vec![para("P")]);
        doc.preconditions.push(vec![para("Q")]);
        assert_eq!(
            render(&doc),
            vec![
                "/// <summary>B.</summary>",
                "/// <remarks>",
                "/// <para>D.</para>",
                "/// <para>body text</para>",
                "/// <para>Precondition: Q</para>",
                "/// <para>Postcondition: P</para>",
                "/// <para>Warning: W</para>",
                "/// <para>R</para>",
                "/// </remarks>",
            ]
        );
    }

    #[test]
    fn value_summaries() {
        let options = RenderOptions {
            indent: String::new(),
            ..RenderOptions::default()
        };
        let renderer = XmlDocRenderer::new(&options, &NameStyle::Keep);
        let described = ValueDoc {
            name: "Z3_L_TRUE".to_string(),
            summary: vec![
                Inline::text("true, see "),
                Inline::Reference {
                    symbol: "Z3_mk_true".to_string(),
                    kind: RefKind::Callable,
                },
            ],
        };
        let bare = ValueDoc {
            name: "Z3_L_UNDEF".to_string(),
            summary: Vec::new(),
        };
        assert_eq!(
            renderer.render_value(&described),
            vec!["/// <summary>true, see <see cref=\"Z3_mk_true\"/></summary>"]
        );
        assert_eq!(
            renderer.render_value(&bare),
            vec!["/// <summary>Z3_L_UNDEF</summary>"]
        );
    }

    #[test]
    fn list_as_only_block_is_multiline() {
        let mut doc = DocComment::default();
        doc.brief = vec![Block::BulletList {
            items: vec![
                BulletItem {
                    content: vec![Inline::text("a < b")],
                },
                BulletItem {
                    content: vec![Inline::code("x")],
                },
            ],
        }];
        assert_eq!(
            render(&doc),
            vec![
                "/// <summary>",
                "/// <list type=\"bullet\">",
                "/// <item><description>a &lt; b</description></item>",
                "/// <item><description><c>x</c></description></item>",
                "/// </list>",
                "/// </summary>",
            ]
        );
    }

    #[test]
    fn code_block_escaped_and_blank_lines_bare() {
        let mut doc = DocComment::default();
        doc.body = vec![Block::CodeBlock {
            code: "if (a < b)\n\n  f(&a);".to_string(),
        }];
        assert_eq!(
            render(&doc),
            vec![
                "/// <remarks>",
                "/// <code>",
                "/// if (a &lt; b)",
                "///",
                "///   f(&amp;a);",
                "/// </code>",
                "/// </remarks>",
            ]
        );
    }

    #[test]
    fn nice_box_padded_by_chars() {
        assert_eq!(
            nice_box(&["ab".to_string(), "é".to_string()]),
            vec!["╔════╗", "║ ab ║", "║ é  ║", "╚════╝"]
        );
    }

    #[test]
    fn references_by_kind() {
        let mut doc = DocComment::default();
        doc.brief = vec![Block::paragraph(vec![
            Inline::Reference {
                symbol: "Z3_L_TRUE".to_string(),
                kind: RefKind::Value,
            },
            Inline::text(" "),
            Inline::Reference {
                symbol: "Z3_mk_int".to_string(),
                kind: RefKind::Callable,
            },
            Inline::text(" "),
            Inline::Reference {
                symbol: "Z3_mk_context".to_string(),
                kind: RefKind::Callable,
            },
            Inline::text(" "),
            Inline::Reference {
                symbol: "Z3_x".to_string(),
                kind: RefKind::Unknown,
            },
        ])];
        doc.see_also = vec!["Z3_mk_int".to_string(), "Z3_mk_context".to_string()];

        let options = RenderOptions {
            indent: String::new(),
            plain_refs: ["MkContext".to_string()].into_iter().collect(),
        };
        let names = NameStyle::Pascal {
            strip_prefix: "Z3_".to_string(),
        };
        assert_eq!(
            XmlDocRenderer::new(&options, &names).render(&doc),
            vec![
                "/// <summary><c>Z3_L_TRUE</c> <see cref=\"MkInt\"/> MkContext Z3_x</summary>",
                "/// <seealso cref=\"MkInt\"/>",
            ]
        );
    }

    #[test]
    fn label_gets_own_paragraph_before_list() {
        let blocks = labelled(
            "Precondition:",
            &[Block::BulletList {
                items: vec![BulletItem {
                    content: vec![Inline::text("x")],
                }],
            }],
        );
        assert_eq!(blocks[0], para("Precondition:"));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn renderer_wraps_entities() {
        let mut doc = DocComment::default();
        doc.brief = vec![para("B.")];
        let renderer = XmlRenderer {
            options: RenderOptions::default(),
            names: NameStyle::Keep,
        };
        let out = renderer
            .render(&[DocumentedEntity {
                name: "Z3_f".to_string(),
                kind: EntityKind::Function,
                doc,
                values: Vec::new(),
            }])
            .unwrap();
        assert_eq!(out, "    // Z3_f\n    /// <summary>B.</summary>\n\n");
    }

    #[test]
    fn renderer_follows_enum_with_values() {
        let mut doc = DocComment::default();
        doc.brief = vec![para("Kinds.")];
        let renderer = XmlRenderer {
            options: RenderOptions::default(),
            names: NameStyle::Keep,
        };
        let out = renderer
            .render(&[DocumentedEntity {
                name: "Z3_kind".to_string(),
                kind: EntityKind::Enum,
                doc,
                values: vec![ValueDoc {
                    name: "Z3_A".to_string(),
                    summary: vec![Inline::text("first.")],
                }],
            }])
            .unwrap();
        assert_eq!(
            out,
            "    // Z3_kind\n    /// <summary>Kinds.</summary>\n    // Z3_A\n    /// <summary>first.</summary>\n\n"
        );
    }
}
