//! Escaping with protected spans.
//!
//! Inline content is built as a run of segments. Only `Literal` segments
//! are escaped when the run is flattened, so generated tags never get
//! escaped twice and no marker string can collide with real text.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Protected(String),
}

/// Segment buffer for one rendered fragment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Markup {
    segments: Vec<Segment>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prose; escaped on render.
    pub fn text(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self;
        }
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(s);
        } else {
            self.segments.push(Segment::Literal(s.to_string()));
        }
        self
    }

    /// Already-generated target markup; emitted verbatim.
    pub fn markup(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self;
        }
        if let Some(Segment::Protected(last)) = self.segments.last_mut() {
            last.push_str(s);
        } else {
            self.segments.push(Segment::Protected(s.to_string()));
        }
        self
    }

    pub fn append(&mut self, other: Markup) -> &mut Self {
        for seg in other.segments {
            match seg {
                Segment::Literal(s) => self.text(&s),
                Segment::Protected(s) => self.markup(&s),
            };
        }
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(&escape(s)),
                Segment::Protected(s) => out.push_str(s),
            }
        }
        out
    }
}

/// Escape XML-reserved characters.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_segments_escaped() {
        let mut m = Markup::new();
        m.text("a < b & ").markup("<c>").text("x>0").markup("</c>");
        assert_eq!(m.render(), "a &lt; b &amp; <c>x&gt;0</c>");
    }

    #[test]
    fn escape_is_applied_once() {
        let mut m = Markup::new();
        m.text("&amp;");
        assert_eq!(m.render(), "&amp;amp;");
    }

    #[test]
    fn adjacent_segments_merge() {
        let mut m = Markup::new();
        m.text("a").text("b").markup("<x/>").markup("<y/>");
        assert_eq!(m.segments.len(), 2);
    }

    #[test]
    fn append_keeps_protection() {
        let mut inner = Markup::new();
        inner.markup("<see cref=\"A\"/>");
        let mut outer = Markup::new();
        outer.text("\"q\" ").append(inner);
        assert_eq!(outer.render(), "&quot;q&quot; <see cref=\"A\"/>");
    }
}
