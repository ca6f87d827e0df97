//! Trait-based renderer dispatch.

pub mod json;
pub mod markup;
pub mod xml;

use crate::model::DocumentedEntity;
use crate::naming::NameStyle;
use thiserror::Error;

pub use xml::{RenderOptions, XmlDocRenderer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown format: {0}. Use xml or json")]
    UnknownFormat(String),
    #[error("failed to serialize documentation: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for rendering a file's documented entities into one output format.
pub trait Renderer {
    fn render(&self, entities: &[DocumentedEntity]) -> Result<String, RenderError>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(
    format: &str,
    options: RenderOptions,
    names: NameStyle,
) -> Result<Box<dyn Renderer>, RenderError> {
    match format {
        "xml" | "xmldoc" => Ok(Box::new(xml::XmlRenderer { options, names })),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(RenderError::UnknownFormat(format.to_string())),
    }
}
