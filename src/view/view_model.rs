//! View Model - Abstracts document data for the view layer
//! This ensures the view has no direct dependencies on Document internals

use crate::document_model::{BracketMatch, Document, brackets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    /// Byte column within the line.
    pub column: usize,
}

/// Bracket positions to colour, as absolute byte offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BracketHighlight {
    pub matching: Option<BracketMatch>,
    pub unmatched_at_cursor: Option<usize>,
}

impl BracketHighlight {
    pub fn compute(text: &str, cursor: usize) -> Self {
        let matching = brackets::match_bracket(text, cursor);
        let unmatched_at_cursor = match matching {
            Some(_) => None,
            None => brackets::adjacent_bracket(text, cursor),
        };
        Self {
            matching,
            unmatched_at_cursor,
        }
    }
}

/// The ViewModel trait provides everything the view needs to render
/// without depending on Document internals
pub trait ViewModel {
    fn get_cursor_position(&mut self) -> CursorPosition;

    fn get_line_count(&mut self) -> usize;

    /// A line's starting byte offset and its text without the newline.
    fn get_line(&mut self, line_number: usize) -> Option<(usize, String)>;
}

/// Concrete implementation that adapts Document to ViewModel
pub struct DocumentViewModel<'a> {
    document: &'a mut Document,
    cursor: usize,
}

impl<'a> DocumentViewModel<'a> {
    pub fn new(document: &'a mut Document, cursor: usize) -> Self {
        Self { document, cursor }
    }
}

impl ViewModel for DocumentViewModel<'_> {
    fn get_cursor_position(&mut self) -> CursorPosition {
        let (line, column) = self.document.offset_to_position(self.cursor);
        CursorPosition { line, column }
    }

    fn get_line_count(&mut self) -> usize {
        self.document.line_count()
    }

    fn get_line(&mut self, line_number: usize) -> Option<(usize, String)> {
        let (start, end) = self.document.line_range(line_number)?;
        let text = self.document.text_range(start, end).ok()?;
        Some((start, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_view_model() {
        let mut doc = Document::open("fn main() {\n    body\n}", 10);
        let mut model = DocumentViewModel::new(&mut doc, 16);
        assert_eq!(model.get_line_count(), 3);
        assert_eq!(model.get_line(1), Some((12, "    body".to_string())));
        assert_eq!(model.get_line(3), None);
        assert_eq!(
            model.get_cursor_position(),
            CursorPosition { line: 1, column: 4 }
        );
    }

    #[test]
    fn test_bracket_highlight() {
        let matched = BracketHighlight::compute("(x)", 0);
        assert_eq!(matched.matching.map(|m| m.close), Some(2));
        assert_eq!(matched.unmatched_at_cursor, None);

        let unmatched = BracketHighlight::compute("(x", 0);
        assert_eq!(unmatched.matching, None);
        assert_eq!(unmatched.unmatched_at_cursor, Some(0));
    }
}
