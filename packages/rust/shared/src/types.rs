//! Core domain types for websift.

/// A deduplicated document ready for the output sink.
///
/// Created once per processed response, immutable after creation, and
/// consumed exactly once by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The canonical URL string of the source page.
    pub name: String,
    /// Deduplicated text, paragraphs joined by blank lines.
    pub body: String,
}

impl Document {
    /// Render the on-the-wire form: heading line, blank line, body,
    /// trailing blank line.
    pub fn render(&self) -> String {
        format!("# {}:\n\n{}\n\n", self.name, self.body)
    }
}
