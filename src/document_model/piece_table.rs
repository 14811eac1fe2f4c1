use log::trace;
use std::fmt;
use thiserror::Error;

/// Errors raised by edits and ranged reads on a [`PieceTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("range at {offset} (length {length}) is outside the document (length {doc_len})")]
    OutOfRange {
        offset: usize,
        length: usize,
        doc_len: usize,
    },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Original,
    Added,
}

/// A contiguous reference into one of the two backing buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    source: BufferKind,
    offset: usize,
    length: usize,
}

impl Span {
    pub fn new(source: BufferKind, offset: usize, length: usize) -> Self {
        Self {
            source,
            offset,
            length,
        }
    }

    pub fn source(&self) -> BufferKind {
        self.source
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The first `length` bytes of this span.
    fn head(&self, length: usize) -> Span {
        Span::new(self.source, self.offset, length)
    }

    /// This span with the first `skip` bytes dropped.
    fn tail(&self, skip: usize) -> Span {
        Span::new(self.source, self.offset + skip, self.length - skip)
    }
}

#[derive(Debug, Clone)]
struct LineIndex {
    line_starts: Vec<usize>, // Offset positions where each line starts
    valid: bool,
}

impl LineIndex {
    fn new() -> Self {
        Self {
            line_starts: vec![0],
            valid: false,
        }
    }

    fn invalidate(&mut self) {
        self.valid = false;
    }

    fn rebuild(&mut self, text: &str) {
        self.line_starts.clear();
        self.line_starts.push(0);
        self.line_starts
            .extend(text.match_indices('\n').map(|(pos, _)| pos + 1));
        self.valid = true;
    }
}

/// Document text stored as spans over an immutable original buffer and an
/// append-only add buffer. Offsets are byte offsets into the UTF-8 text.
#[derive(Debug, Clone)]
pub struct PieceTable {
    original: String,
    added: String,
    pieces: Vec<Span>,
    total_length: usize,
    line_index: LineIndex,
}

impl PieceTable {
    pub fn new() -> Self {
        Self::from_string(String::new())
    }

    pub fn from_string(text: String) -> Self {
        let length = text.len();
        Self {
            original: text,
            added: String::new(),
            pieces: if length > 0 {
                vec![Span::new(BufferKind::Original, 0, length)]
            } else {
                Vec::new()
            },
            total_length: length,
            line_index: LineIndex::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.total_length
    }

    pub fn is_empty(&self) -> bool {
        self.total_length == 0
    }

    pub fn spans(&self) -> &[Span] {
        &self.pieces
    }

    pub fn added_len(&self) -> usize {
        self.added.len()
    }

    fn span_text(&self, span: &Span) -> &str {
        let buffer = match span.source {
            BufferKind::Original => &self.original,
            BufferKind::Added => &self.added,
        };
        &buffer[span.offset..span.offset + span.length]
    }

    /// Index of the span containing `offset` and the offset relative to it.
    /// An offset at the end of the document maps to `(pieces.len(), 0)`.
    fn locate(&self, offset: usize) -> (usize, usize) {
        let mut current = 0;
        for (i, span) in self.pieces.iter().enumerate() {
            if offset < current + span.length {
                return (i, offset - current);
            }
            current += span.length;
        }
        (self.pieces.len(), 0)
    }

    fn check_boundary(&self, offset: usize) -> Result<(), EditError> {
        let (index, within) = self.locate(offset);
        if within == 0 {
            return Ok(());
        }
        if self.span_text(&self.pieces[index]).is_char_boundary(within) {
            Ok(())
        } else {
            Err(EditError::NotCharBoundary { offset })
        }
    }

    fn check_range(&self, offset: usize, length: usize) -> Result<usize, EditError> {
        match offset.checked_add(length) {
            Some(end) if end <= self.total_length => Ok(end),
            _ => Err(EditError::OutOfRange {
                offset,
                length,
                doc_len: self.total_length,
            }),
        }
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.check_range(offset, 0)?;
        if text.is_empty() {
            return Ok(());
        }
        self.check_boundary(offset)?;

        let add_start = self.added.len();
        self.added.push_str(text);
        let new_span = Span::new(BufferKind::Added, add_start, text.len());

        let (index, split) = self.locate(offset);
        if split == 0 {
            // Typing at the end of the previous insert extends that span
            // instead of growing the piece list.
            match index.checked_sub(1).map(|prev| self.pieces[prev]) {
                Some(prev)
                    if prev.source == BufferKind::Added
                        && prev.offset + prev.length == add_start =>
                {
                    self.pieces[index - 1] =
                        Span::new(BufferKind::Added, prev.offset, prev.length + text.len());
                }
                _ => self.pieces.insert(index, new_span),
            }
        } else {
            let span = self.pieces[index];
            self.pieces
                .splice(index..=index, [span.head(split), new_span, span.tail(split)]);
        }

        self.total_length += text.len();
        self.line_index.invalidate();
        trace!(
            "insert {} bytes at {offset}, {} pieces",
            text.len(),
            self.pieces.len()
        );
        Ok(())
    }

    pub fn delete(&mut self, offset: usize, length: usize) -> Result<(), EditError> {
        let end = self.check_range(offset, length)?;
        if length == 0 {
            return Ok(());
        }
        self.check_boundary(offset)?;
        self.check_boundary(end)?;

        let mut kept = Vec::with_capacity(self.pieces.len() + 1);
        let mut current = 0;
        for span in &self.pieces {
            let span_start = current;
            let span_end = current + span.length;
            current = span_end;

            if span_end <= offset || span_start >= end {
                kept.push(*span);
                continue;
            }
            if span_start < offset {
                kept.push(span.head(offset - span_start));
            }
            if span_end > end {
                kept.push(span.tail(end - span_start));
            }
        }
        self.pieces = kept;

        self.total_length -= length;
        self.line_index.invalidate();
        trace!(
            "delete {length} bytes at {offset}, {} pieces",
            self.pieces.len()
        );
        Ok(())
    }

    pub fn materialize(&self) -> String {
        let mut result = String::with_capacity(self.total_length);
        for span in &self.pieces {
            result.push_str(self.span_text(span));
        }
        result
    }

    /// Text in `[start, end)`, reading only the spans that overlap the window.
    pub fn materialize_range(&self, start: usize, end: usize) -> Result<String, EditError> {
        if start > end {
            return Err(EditError::OutOfRange {
                offset: start,
                length: 0,
                doc_len: self.total_length,
            });
        }
        self.check_range(start, end - start)?;
        self.check_boundary(start)?;
        self.check_boundary(end)?;

        let mut result = String::with_capacity(end - start);
        let mut current = 0;
        for span in &self.pieces {
            let span_end = current + span.length;
            if current >= end {
                break;
            }
            if span_end > start {
                let from = start.saturating_sub(current);
                let to = (end - current).min(span.length);
                result.push_str(&self.span_text(span)[from..to]);
            }
            current = span_end;
        }
        Ok(result)
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        let (index, within) = self.locate(offset);
        let span = self.pieces.get(index)?;
        self.span_text(span).get(within..)?.chars().next()
    }

    pub fn char_before(&self, offset: usize) -> Option<char> {
        if offset == 0 || offset > self.total_length {
            return None;
        }
        let (index, within) = self.locate(offset - 1);
        let span = self.pieces.get(index)?;
        self.span_text(span).get(..=within)?.chars().next_back()
    }

    fn ensure_line_index(&mut self) {
        if !self.line_index.valid {
            let text = self.materialize();
            self.line_index.rebuild(&text);
        }
    }

    pub fn line_count(&mut self) -> usize {
        self.ensure_line_index();
        self.line_index.line_starts.len()
    }

    /// Byte range of `line`, excluding its trailing newline.
    pub fn line_range(&mut self, line: usize) -> Option<(usize, usize)> {
        self.ensure_line_index();
        let starts = &self.line_index.line_starts;
        let start = *starts.get(line)?;
        let end = starts
            .get(line + 1)
            .map_or(self.total_length, |next| next - 1);
        Some((start, end))
    }

    pub fn offset_to_position(&mut self, offset: usize) -> (usize, usize) {
        self.ensure_line_index();
        let offset = offset.min(self.total_length);
        let line = self
            .line_index
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        (line, offset - self.line_index.line_starts[line])
    }

    /// Offset of `column` bytes into `line`, clamped to the line's end.
    pub fn position_to_offset(&mut self, line: usize, column: usize) -> usize {
        match self.line_range(line) {
            Some((start, end)) => (start + column).min(end),
            None => self.total_length,
        }
    }
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PieceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.pieces {
            f.write_str(self.span_text(span))?;
        }
        Ok(())
    }
}
