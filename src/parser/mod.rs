//! Comment parser: preprocess, segment by tag, then parse blocks.

pub mod block;
pub mod inline;
pub mod preprocess;
pub mod segment;

pub use inline::SymbolConvention;

use crate::model::DocComment;
use segment::SectionKind;

/// Knobs for [`parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub convention: SymbolConvention,
}

/// Parse a raw comment body into a documentation tree.
///
/// Never fails: malformed markup degrades to prose. References in the
/// result are still [`crate::model::RefKind::Unknown`].
pub fn parse(raw: &str, options: &ParseOptions) -> DocComment {
    let lines = preprocess::preprocess(raw);
    let segments = segment::segment(&lines);

    let mut doc = DocComment::default();
    for section in segments.sections {
        let blocks = block::parse_blocks(&section.lines, &options.convention);
        match section.kind {
            SectionKind::Brief => doc.brief.extend(blocks),
            SectionKind::Description => doc.description.extend(blocks),
            SectionKind::Param(name) => doc.push_param(&name, blocks),
            SectionKind::Returns => doc.returns.extend(blocks),
            SectionKind::Pre => doc.preconditions.push(blocks),
            SectionKind::Post => doc.postconditions.push(blocks),
            SectionKind::Warning => doc.warnings.push(blocks),
            SectionKind::Remark => doc.remarks.push(blocks),
            SectionKind::Body => doc.body.extend(blocks),
        }
    }
    doc.see_also = segments.see_also;
    doc
}
