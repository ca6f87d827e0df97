//! doxml: convert Doxygen-style C header comments into XML documentation
//! comments.
//!
//! The run is two-phase: [`pipeline::build_catalog`] scans every value
//! constant in the corpus, then each entity's comment is parsed, resolved
//! against the frozen catalog and rendered.

pub mod catalog;
pub mod header;
pub mod model;
pub mod naming;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod resolve;

pub use catalog::{CatalogBuilder, CatalogError, SymbolCatalog};
pub use model::{Block, DocComment, Inline, RefKind};
pub use naming::{NameStyle, NameTransform};
pub use parser::{parse, ParseOptions, SymbolConvention};
pub use pipeline::Pipeline;
pub use render::{RenderOptions, XmlDocRenderer};
