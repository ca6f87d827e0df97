//! Orchestration: catalog phase, then per-entity documentation.
//!
//! A [`Pipeline`] can only be obtained with a built catalog, so no comment
//! is ever parsed against a partial one.

use crate::catalog::{CatalogBuilder, CatalogError, SymbolCatalog};
use crate::model::{Block, Corpus, DocComment, DocumentedEntity, Entity, Inline, Param, ValueDoc};
use crate::parser::{self, ParseOptions};
use crate::resolve;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Build the frozen catalog from every constant in the corpus.
pub fn build_catalog(corpus: &Corpus, allow_empty: bool) -> Result<SymbolCatalog, CatalogError> {
    let mut builder = CatalogBuilder::new().allow_empty(allow_empty);
    for constant in &corpus.constants {
        builder.insert(&constant.name, &constant.origin)?;
    }
    builder.build()
}

/// Parse and resolve one raw comment.
pub fn parse_comment(raw: &str, catalog: &SymbolCatalog, options: &ParseOptions) -> DocComment {
    let mut doc = parser::parse(raw, options);
    resolve::resolve(&mut doc, catalog);
    doc
}

/// Copy signature types onto documented parameters with the same name.
/// Parameters documented but absent from the signature keep no type.
pub fn enrich_param_types(doc: &mut DocComment, params: &[Param]) {
    for param in params.iter().filter(|p| !p.name.is_empty()) {
        if let Some(documented) = doc.param_mut(&param.name) {
            documented.c_type = Some(param.c_type.clone());
        }
    }
}

/// One [`ValueDoc`] per enumerant. A bullet item anywhere in the enum's
/// description, body or remarks that opens with `NAME` or `NAME:` (as text
/// or as a `#NAME` reference) describes that value; the first such item
/// wins.
pub fn enum_values(doc: &DocComment, values: &[String]) -> Vec<ValueDoc> {
    let mut described: BTreeMap<&str, Vec<Inline>> = BTreeMap::new();
    let lists = std::iter::once(&doc.description)
        .chain(std::iter::once(&doc.body))
        .chain(doc.remarks.iter());
    for blocks in lists {
        for block in blocks {
            let Block::BulletList { items } = block else {
                continue;
            };
            for item in items {
                if let Some((name, summary)) = split_value_item(&item.content, values) {
                    described.entry(name).or_insert(summary);
                }
            }
        }
    }

    values
        .iter()
        .map(|name| ValueDoc {
            name: name.clone(),
            summary: described.remove(name.as_str()).unwrap_or_default(),
        })
        .collect()
}

/// `Z3_X: text` into `("Z3_X", [text])`. Items that do not open with one
/// of `values`, or have nothing after the name, give `None`.
fn split_value_item<'a>(
    content: &[Inline],
    values: &'a [String],
) -> Option<(&'a str, Vec<Inline>)> {
    let (name, rest) = match content.first()? {
        Inline::Reference { symbol, .. } => {
            let name = values.iter().find(|v| *v == symbol)?;
            (name.as_str(), content[1..].to_vec())
        }
        Inline::Text { text } => {
            let name = values.iter().find(|v| {
                text.strip_prefix(v.as_str()).is_some_and(|after| {
                    !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
                })
            })?;
            let mut rest = content.to_vec();
            rest[0] = Inline::text(&text[name.len()..]);
            (name.as_str(), rest)
        }
        Inline::InlineCode { .. } => return None,
    };

    let mut summary = rest;
    if let Some(Inline::Text { text }) = summary.first_mut() {
        let trimmed = text.trim_start();
        *text = trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start().to_string();
    }
    summary.retain(|node| !matches!(node, Inline::Text { text } if text.is_empty()));
    if summary.is_empty() {
        return None;
    }
    Some((name, summary))
}

/// Second phase of the run. Holds the frozen catalog.
#[derive(Debug)]
pub struct Pipeline {
    catalog: SymbolCatalog,
    options: ParseOptions,
}

impl Pipeline {
    /// Run the catalog phase over the whole corpus.
    pub fn build(
        corpus: &Corpus,
        options: ParseOptions,
        allow_empty: bool,
    ) -> Result<Self, CatalogError> {
        let catalog = build_catalog(corpus, allow_empty)?;
        Ok(Self::from_catalog(catalog, options))
    }

    /// Use a catalog built elsewhere.
    pub fn from_catalog(catalog: SymbolCatalog, options: ParseOptions) -> Self {
        Self { catalog, options }
    }

    pub fn document(&self, entity: &Entity) -> DocumentedEntity {
        let mut doc = parse_comment(&entity.comment, &self.catalog, &self.options);
        enrich_param_types(&mut doc, &entity.params);
        let values = enum_values(&doc, &entity.values);
        debug!(
            entity = %entity.name,
            params = doc.params.len(),
            values = values.len(),
            "documented"
        );
        DocumentedEntity {
            name: entity.name.clone(),
            kind: entity.kind,
            doc,
            values,
        }
    }

    pub fn document_all(&self, entities: &[Entity]) -> Vec<DocumentedEntity> {
        let out: Vec<DocumentedEntity> = entities.iter().map(|e| self.document(e)).collect();
        info!(entities = out.len(), "documentation parsed");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constant, EntityKind, RefKind};

    fn function(name: &str, comment: &str, params: Vec<Param>) -> Entity {
        Entity {
            name: name.to_string(),
            kind: EntityKind::Function,
            params,
            values: Vec::new(),
            comment: comment.to_string(),
        }
    }

    fn constant(name: &str) -> Constant {
        Constant {
            name: name.to_string(),
            origin: "enum e in t.h".to_string(),
        }
    }

    #[test]
    fn reference_resolves_against_whole_corpus() {
        let corpus = Corpus {
            entities: vec![function("Z3_f", "/** \\brief Returns #Z3_L_TRUE. */", Vec::new())],
            constants: vec![constant("Z3_L_TRUE")],
        };
        let pipeline = Pipeline::build(&corpus, ParseOptions::default(), false).unwrap();
        let documented = pipeline.document_all(&corpus.entities);
        assert_eq!(
            documented[0].doc.brief,
            vec![Block::paragraph(vec![
                Inline::text("Returns "),
                Inline::Reference {
                    symbol: "Z3_L_TRUE".to_string(),
                    kind: RefKind::Value
                },
                Inline::text("."),
            ])]
        );
    }

    #[test]
    fn empty_catalog_rejected_unless_allowed() {
        let corpus = Corpus::default();
        assert_eq!(
            Pipeline::build(&corpus, ParseOptions::default(), false).unwrap_err(),
            CatalogError::Empty
        );
        assert!(Pipeline::build(&corpus, ParseOptions::default(), true).is_ok());
    }

    #[test]
    fn invalid_constant_reports_origin() {
        let corpus = Corpus {
            entities: Vec::new(),
            constants: vec![constant("X(1)")],
        };
        let err = build_catalog(&corpus, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value constant identifier `X(1)` in enum e in t.h"
        );
    }

    #[test]
    fn c_types_follow_names() {
        let entity = function(
            "Z3_mk_int",
            "/** \\param v value.\n    \\param c context. */",
            vec![
                Param {
                    c_type: "Z3_context".to_string(),
                    name: "c".to_string(),
                },
                Param {
                    c_type: "int".to_string(),
                    name: "v".to_string(),
                },
                Param {
                    c_type: "unsigned".to_string(),
                    name: "undocumented".to_string(),
                },
            ],
        );
        let pipeline = Pipeline::from_catalog(SymbolCatalog::empty(), ParseOptions::default());
        let doc = pipeline.document(&entity).doc;
        let typed: Vec<(&str, Option<&str>)> = doc
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.c_type.as_deref()))
            .collect();
        assert_eq!(typed, vec![("v", Some("int")), ("c", Some("Z3_context"))]);
    }

    #[test]
    fn enum_values_from_bullets() {
        let entity = Entity {
            name: "Z3_param_kind".to_string(),
            kind: EntityKind::Enum,
            params: Vec::new(),
            values: vec![
                "Z3_PK_UINT".to_string(),
                "Z3_PK_BOOL".to_string(),
                "Z3_PK_OTHER".to_string(),
            ],
            comment: "/**\n   \\brief Kinds.\n\n   - Z3_PK_UINT: a non-negative integer.\n   - #Z3_PK_BOOL : a boolean, see #Z3_mk_true.\n   - Z3_PK_UINTX is not a value.\n*/".to_string(),
        };
        let pipeline = Pipeline::from_catalog(SymbolCatalog::empty(), ParseOptions::default());
        let documented = pipeline.document(&entity);

        assert_eq!(
            documented.values,
            vec![
                ValueDoc {
                    name: "Z3_PK_UINT".to_string(),
                    summary: vec![Inline::text("a non-negative integer.")],
                },
                ValueDoc {
                    name: "Z3_PK_BOOL".to_string(),
                    summary: vec![
                        Inline::text("a boolean, see "),
                        Inline::Reference {
                            symbol: "Z3_mk_true".to_string(),
                            kind: RefKind::Callable,
                        },
                        Inline::text("."),
                    ],
                },
                ValueDoc {
                    name: "Z3_PK_OTHER".to_string(),
                    summary: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn value_item_without_text_is_undescribed() {
        let values = vec!["Z3_A".to_string()];
        assert_eq!(split_value_item(&[Inline::text("Z3_A:")], &values), None);
        assert_eq!(
            split_value_item(&[Inline::text("Z3_A is the first")], &values),
            Some(("Z3_A", vec![Inline::text("is the first")]))
        );
    }
}
