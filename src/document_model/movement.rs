use super::document::Document;

/// Largest char boundary of `text` at or below `index`.
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    let index = index.min(text.len());
    (0..=index)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Byte offset of the first difference between two texts, on a char
/// boundary of `after`. Used to place the cursor after undo and redo.
pub fn first_difference(before: &str, after: &str) -> usize {
    let common = before
        .bytes()
        .zip(after.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    floor_char_boundary(after, common)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// Cursor movement over byte offsets. Every result lands on a char boundary.
impl Document {
    pub fn move_left(&self, cursor: usize) -> usize {
        self.char_before(cursor)
            .map_or(cursor, |c| cursor - c.len_utf8())
    }

    pub fn move_right(&self, cursor: usize) -> usize {
        self.char_at(cursor).map_or(cursor, |c| cursor + c.len_utf8())
    }

    pub fn move_line_start(&mut self, cursor: usize) -> usize {
        let (line, _) = self.offset_to_position(cursor);
        self.line_range(line).map_or(0, |(start, _)| start)
    }

    pub fn move_line_end(&mut self, cursor: usize) -> usize {
        let (line, _) = self.offset_to_position(cursor);
        self.line_range(line).map_or(cursor, |(_, end)| end)
    }

    /// Moves `delta` lines up (negative) or down, keeping the byte column
    /// where the target line is long enough.
    pub fn move_vertical(&mut self, cursor: usize, delta: isize) -> usize {
        let (line, column) = self.offset_to_position(cursor);
        let last_line = self.line_count().saturating_sub(1);
        let target = line.saturating_add_signed(delta).min(last_line);
        if target == line {
            return cursor;
        }
        let Some((start, end)) = self.line_range(target) else {
            return cursor;
        };
        let text = self.text_range(start, end).unwrap_or_default();
        start + floor_char_boundary(&text, column)
    }

    pub fn move_document_end(&self) -> usize {
        self.len()
    }

    pub fn move_word_forward(&self, cursor: usize) -> usize {
        let text = self.get_full_text();
        let rest = &text[cursor.min(text.len())..];
        let mut chars = rest.char_indices().peekable();

        // Skip the current word, then any separators
        while let Some(&(_, c)) = chars.peek() {
            if !is_word_char(c) {
                break;
            }
            chars.next();
        }
        while let Some(&(_, c)) = chars.peek() {
            if is_word_char(c) {
                break;
            }
            chars.next();
        }
        chars.peek().map_or(text.len(), |&(i, _)| cursor + i)
    }

    pub fn move_word_backward(&self, cursor: usize) -> usize {
        let text = self.get_full_text();
        let head = &text[..floor_char_boundary(&text, cursor)];
        let mut chars = head.char_indices().rev().peekable();

        while let Some(&(_, c)) = chars.peek() {
            if is_word_char(c) {
                break;
            }
            chars.next();
        }
        let mut start = head.len();
        while let Some(&(i, c)) = chars.peek() {
            if !is_word_char(c) {
                break;
            }
            start = i;
            chars.next();
        }
        if start == head.len() { 0 } else { start }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_movement_steps_whole_chars() {
        let doc = Document::open("aé€b", 10);
        assert_eq!(doc.move_right(0), 1);
        assert_eq!(doc.move_right(1), 3);
        assert_eq!(doc.move_right(3), 6);
        assert_eq!(doc.move_right(7), 7);
        assert_eq!(doc.move_left(6), 3);
        assert_eq!(doc.move_left(0), 0);
    }

    #[test]
    fn test_line_movement() {
        let mut doc = Document::open("first\nsecond line\nx", 10);
        assert_eq!(doc.move_line_start(9), 6);
        assert_eq!(doc.move_line_end(9), 17);
        assert_eq!(doc.move_vertical(9, 1), 19);
        assert_eq!(doc.move_vertical(9, -1), 3);
        assert_eq!(doc.move_vertical(2, -1), 2);
        assert_eq!(doc.move_vertical(16, -1), 5);
        assert_eq!(doc.move_document_end(), 19);
    }

    #[test]
    fn test_vertical_movement_clamps_to_char_boundary() {
        let mut doc = Document::open("abc\n€", 10);
        // Column 2 falls inside the euro sign's three bytes.
        assert_eq!(doc.move_vertical(2, 1), 4);
    }

    #[test]
    fn test_word_movement() {
        let doc = Document::open("let value = foo(bar);", 10);
        assert_eq!(doc.move_word_forward(0), 4);
        assert_eq!(doc.move_word_forward(4), 12);
        assert_eq!(doc.move_word_forward(16), 21);
        assert_eq!(doc.move_word_backward(12), 4);
        assert_eq!(doc.move_word_backward(6), 4);
        assert_eq!(doc.move_word_backward(3), 0);
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference("hello", "help"), 3);
        assert_eq!(first_difference("abc", "abc"), 3);
        assert_eq!(first_difference("", "x"), 0);
        // "é" and "è" share their first byte.
        assert_eq!(first_difference("é", "è"), 0);
    }
}
