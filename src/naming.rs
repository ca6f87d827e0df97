//! Name transforms applied to callable references and see-also entries.

/// Maps a C identifier to the name used in rendered cross-references.
///
/// Implementations must be pure. Any `Fn(&str) -> String` qualifies.
pub trait NameTransform {
    fn transform(&self, ident: &str) -> String;
}

impl<F> NameTransform for F
where
    F: Fn(&str) -> String,
{
    fn transform(&self, ident: &str) -> String {
        self(ident)
    }
}

/// Stock transforms selectable from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameStyle {
    /// Identifier passes through unchanged.
    #[default]
    Keep,
    /// `Z3_mk_bvadd_no_overflow` becomes `MkBvaddNoOverflow`.
    Pascal { strip_prefix: String },
}

impl NameTransform for NameStyle {
    fn transform(&self, ident: &str) -> String {
        match self {
            NameStyle::Keep => ident.to_string(),
            NameStyle::Pascal { strip_prefix } => {
                let base = ident.strip_prefix(strip_prefix.as_str()).unwrap_or(ident);
                pascal_case(base)
            }
        }
    }
}

/// Join `_`-separated parts, each with its first letter upper-cased and the
/// rest lower-cased.
pub fn pascal_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for part in ident.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}
