//! Format-agnostic documentation tree.
//!
//! A [`DocComment`] is built once per documented entity by the parser,
//! finished by the resolver, and then only read by renderers.

use serde::Serialize;

/// Complete parsed documentation for one entity.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DocComment {
    /// `\brief`
    pub brief: Vec<Block>,
    /// Untagged content before any non-brief tag
    pub description: Vec<Block>,
    /// `\param` entries in order of appearance
    pub params: Vec<ParamDoc>,
    /// `\returns`
    pub returns: Vec<Block>,
    /// One entry per `\pre`
    pub preconditions: Vec<Vec<Block>>,
    /// One entry per `\post`
    pub postconditions: Vec<Vec<Block>>,
    /// One entry per `\warning`
    pub warnings: Vec<Vec<Block>>,
    /// One entry per `\remark`
    pub remarks: Vec<Vec<Block>>,
    /// Untagged content appearing after a tag
    pub body: Vec<Block>,
    /// `\sa` entries (raw symbol names, duplicates kept)
    pub see_also: Vec<String>,
}

impl DocComment {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut ParamDoc> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    /// Append content to the named parameter, creating it at the end of the
    /// ordering if it has not been seen yet.
    pub(crate) fn push_param(&mut self, name: &str, content: Vec<Block>) {
        match self.param_mut(name) {
            Some(existing) => existing.content.extend(content),
            None => self.params.push(ParamDoc {
                name: name.to_string(),
                c_type: None,
                content,
            }),
        }
    }

    /// Every block sequence in the tree, in section order.
    pub(crate) fn block_lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<Block>> + '_ {
        std::iter::once(&mut self.brief)
            .chain(std::iter::once(&mut self.description))
            .chain(self.params.iter_mut().map(|p| &mut p.content))
            .chain(std::iter::once(&mut self.returns))
            .chain(self.preconditions.iter_mut())
            .chain(self.postconditions.iter_mut())
            .chain(self.warnings.iter_mut())
            .chain(self.remarks.iter_mut())
            .chain(std::iter::once(&mut self.body))
    }

    pub fn is_empty(&self) -> bool {
        self.brief.is_empty()
            && self.description.is_empty()
            && self.params.is_empty()
            && self.returns.is_empty()
            && self.preconditions.is_empty()
            && self.postconditions.is_empty()
            && self.warnings.is_empty()
            && self.remarks.is_empty()
            && self.body.is_empty()
            && self.see_also.is_empty()
    }
}

/// Documentation for a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDoc {
    pub name: String,
    /// Filled from the signature after parsing; may stay empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_type: Option<String>,
    pub content: Vec<Block>,
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { content: Vec<Inline> },
    BulletList { items: Vec<BulletItem> },
    /// Verbatim code, lines joined with `\n`.
    CodeBlock { code: String },
    /// ASCII diagram lines, boxed on output.
    NiceBox { lines: Vec<String> },
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph { content }
    }
}

/// A single bullet item; only ever lives inside [`Block::BulletList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulletItem {
    pub content: Vec<Inline>,
}

/// Inline node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    InlineCode { code: String },
    Reference { symbol: String, kind: RefKind },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    pub fn code(code: impl Into<String>) -> Self {
        Inline::InlineCode { code: code.into() }
    }
}

/// Classification of a cross-referenced identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// Names a value constant (present in the symbol catalog).
    Value,
    /// Names a function.
    Callable,
    /// Not resolved yet.
    #[default]
    Unknown,
}

/// Kind of documented declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    Enum,
}

/// A `(c_type, name)` pair from a declaration signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub c_type: String,
    pub name: String,
}

/// One documented declaration as handed over by the header scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub params: Vec<Param>,
    /// Enumerant names, in declaration order. Empty for functions.
    pub values: Vec<String>,
    /// Raw comment body, decoration included.
    pub comment: String,
}

/// A value constant reported by the declaration scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    /// Where it was declared, e.g. `enum Z3_lbool in z3_api.h`.
    pub origin: String,
}

/// Everything scanned from one or more headers.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    pub entities: Vec<Entity>,
    /// Value constants (enumerants) in declaration order.
    pub constants: Vec<Constant>,
}

impl Corpus {
    pub fn extend(&mut self, other: Corpus) {
        self.entities.extend(other.entities);
        self.constants.extend(other.constants);
    }
}

/// An entity whose documentation has been parsed and resolved.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentedEntity {
    pub name: String,
    pub kind: EntityKind,
    pub doc: DocComment,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ValueDoc>,
}

/// Documentation for one enumerant, taken from a `NAME: text` bullet in
/// the enum's comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueDoc {
    pub name: String,
    /// Empty when no bullet describes the value.
    pub summary: Vec<Inline>,
}
