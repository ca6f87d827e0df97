//! Symbol catalog: which identifiers name value constants.
//!
//! Built once from every declaration in the corpus, then frozen. Anything
//! not in the catalog is taken to be a callable.

use std::collections::BTreeSet;
use thiserror::Error;

/// Failure to produce a complete catalog.
///
/// Raised before any entity is parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("symbol catalog is empty: no value constants were declared in the corpus")]
    Empty,
    #[error("invalid value constant identifier `{name}` in {context}")]
    InvalidIdentifier { name: String, context: String },
    #[error("unterminated enum declaration in {context}")]
    Unterminated { context: String },
}

/// Immutable set of value-constant names.
///
/// Read-only once built. Use [`CatalogBuilder`] to make a new one.
#[derive(Debug, Default, Clone)]
pub struct SymbolCatalog {
    values: BTreeSet<String>,
}

impl SymbolCatalog {
    /// A catalog with no constants. Every reference resolves as callable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_value(&self, ident: &str) -> bool {
        self.values.contains(ident)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collects constants during the build pass.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    values: BTreeSet<String>,
    allow_empty: bool,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a corpus that declares no constants at all.
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Record one value constant. `context` names where it came from and is
    /// only used for error messages.
    pub fn insert(&mut self, name: &str, context: &str) -> Result<(), CatalogError> {
        if !is_identifier(name) {
            return Err(CatalogError::InvalidIdentifier {
                name: name.to_string(),
                context: context.to_string(),
            });
        }
        self.values.insert(name.to_string());
        Ok(())
    }

    pub fn extend<'a, I>(&mut self, names: I, context: &str) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.insert(name, context)?;
        }
        Ok(())
    }

    /// Freeze the catalog.
    pub fn build(self) -> Result<SymbolCatalog, CatalogError> {
        if self.values.is_empty() && !self.allow_empty {
            return Err(CatalogError::Empty);
        }
        tracing::info!(constants = self.values.len(), "symbol catalog built");
        Ok(SymbolCatalog {
            values: self.values,
        })
    }
}

/// C identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
