//! Reference resolution against a frozen [`SymbolCatalog`].

use crate::catalog::SymbolCatalog;
use crate::model::{Block, DocComment, Inline, RefKind};

/// Classify one identifier. Never fails: anything the catalog does not know
/// is taken to be a callable.
pub fn classify(symbol: &str, catalog: &SymbolCatalog) -> RefKind {
    if catalog.is_value(symbol) {
        RefKind::Value
    } else {
        RefKind::Callable
    }
}

/// Classify every reference in `doc` in place.
pub fn resolve(doc: &mut DocComment, catalog: &SymbolCatalog) {
    for blocks in doc.block_lists_mut() {
        for block in blocks.iter_mut() {
            match block {
                Block::Paragraph { content } => resolve_inlines(content, catalog),
                Block::BulletList { items } => {
                    for item in items.iter_mut() {
                        resolve_inlines(&mut item.content, catalog);
                    }
                }
                Block::CodeBlock { .. } | Block::NiceBox { .. } => {}
            }
        }
    }
}

fn resolve_inlines(nodes: &mut [Inline], catalog: &SymbolCatalog) {
    for node in nodes {
        if let Inline::Reference { symbol, kind } = node {
            *kind = classify(symbol, catalog);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::model::BulletItem;

    fn catalog() -> SymbolCatalog {
        let mut builder = CatalogBuilder::new();
        builder.extend(["Z3_L_TRUE"], "enum Z3_lbool").unwrap();
        builder.build().unwrap()
    }

    fn reference(symbol: &str, kind: RefKind) -> Inline {
        Inline::Reference {
            symbol: symbol.to_string(),
            kind,
        }
    }

    #[test]
    fn classify_by_membership() {
        let cat = catalog();
        assert_eq!(classify("Z3_L_TRUE", &cat), RefKind::Value);
        assert_eq!(classify("Z3_mk_true", &cat), RefKind::Callable);
        assert_eq!(classify("Z3_L_TRUE", &SymbolCatalog::empty()), RefKind::Callable);
    }

    #[test]
    fn resolves_paragraphs_items_and_params() {
        let mut doc = DocComment::default();
        doc.brief = vec![Block::paragraph(vec![reference("Z3_L_TRUE", RefKind::Unknown)])];
        doc.push_param(
            "a",
            vec![Block::BulletList {
                items: vec![BulletItem {
                    content: vec![reference("Z3_mk_app", RefKind::Unknown)],
                }],
            }],
        );
        doc.warnings
            .push(vec![Block::paragraph(vec![reference("Z3_L_TRUE", RefKind::Unknown)])]);

        resolve(&mut doc, &catalog());

        assert_eq!(
            doc.brief,
            vec![Block::paragraph(vec![reference("Z3_L_TRUE", RefKind::Value)])]
        );
        assert_eq!(
            doc.params[0].content,
            vec![Block::BulletList {
                items: vec![BulletItem {
                    content: vec![reference("Z3_mk_app", RefKind::Callable)],
                }],
            }]
        );
        assert_eq!(
            doc.warnings[0],
            vec![Block::paragraph(vec![reference("Z3_L_TRUE", RefKind::Value)])]
        );
    }

    #[test]
    fn code_is_untouched() {
        let mut doc = DocComment::default();
        doc.body = vec![Block::CodeBlock {
            code: "#Z3_L_TRUE".to_string(),
        }];
        let before = doc.clone();
        resolve(&mut doc, &catalog());
        assert_eq!(doc, before);
    }
}
