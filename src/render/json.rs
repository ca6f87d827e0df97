//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the resolved documentation trees directly, so downstream
//! emitters can apply their own markup.

use crate::model::DocumentedEntity;
use crate::render::{RenderError, Renderer};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonDocument<'a> {
    entities: &'a [DocumentedEntity],
}

impl Renderer for JsonRenderer {
    fn render(&self, entities: &[DocumentedEntity]) -> Result<String, RenderError> {
        let mut out = serde_json::to_string_pretty(&JsonDocument { entities })?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
