//! Bracket matching for cursor-adjacent highlighting.
//!
//! Matching is purely lexical: brackets inside strings or comments count like
//! any other. Pairing only considers brackets of the same kind, while nesting
//! depth counts every kind.

/// Number of highlight levels; depth cycles through them.
pub const PALETTE_LEVELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Paren,
    Square,
    Curly,
    Angle,
}

impl BracketKind {
    pub fn pair(self) -> (u8, u8) {
        match self {
            BracketKind::Paren => (b'(', b')'),
            BracketKind::Square => (b'[', b']'),
            BracketKind::Curly => (b'{', b'}'),
            BracketKind::Angle => (b'<', b'>'),
        }
    }

    /// The kind of `byte` and whether it opens.
    pub fn classify(byte: u8) -> Option<(BracketKind, bool)> {
        match byte {
            b'(' => Some((BracketKind::Paren, true)),
            b')' => Some((BracketKind::Paren, false)),
            b'[' => Some((BracketKind::Square, true)),
            b']' => Some((BracketKind::Square, false)),
            b'{' => Some((BracketKind::Curly, true)),
            b'}' => Some((BracketKind::Curly, false)),
            b'<' => Some((BracketKind::Angle, true)),
            b'>' => Some((BracketKind::Angle, false)),
            _ => None,
        }
    }

    pub fn closing_for(ch: char) -> Option<char> {
        let byte = u8::try_from(ch).ok()?;
        match Self::classify(byte)? {
            (kind, true) => Some(char::from(kind.pair().1)),
            (_, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketMatch {
    pub open: usize,
    pub close: usize,
    pub kind: BracketKind,
    pub depth: usize,
}

impl BracketMatch {
    /// Highlight level in `0..PALETTE_LEVELS`.
    pub fn level(&self) -> usize {
        self.depth % PALETTE_LEVELS
    }
}

/// Scan state used to compute nesting depth from the document root.
#[derive(Debug, Default)]
struct BracketState {
    stack: Vec<(usize, BracketKind)>,
}

impl BracketState {
    fn feed(&mut self, position: usize, byte: u8) {
        match BracketKind::classify(byte) {
            Some((kind, true)) => self.stack.push((position, kind)),
            Some((_, false)) => {
                self.stack.pop();
            }
            None => {}
        }
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Offset of the bracket next to `cursor`: the one at the cursor wins over the
/// one just before it.
pub fn adjacent_bracket(text: &str, cursor: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let is_bracket = |pos: usize| {
        bytes
            .get(pos)
            .is_some_and(|&b| BracketKind::classify(b).is_some())
    };

    if is_bracket(cursor) {
        Some(cursor)
    } else if cursor > 0 && is_bracket(cursor - 1) {
        Some(cursor - 1)
    } else {
        None
    }
}

/// Number of brackets of any kind still open at `offset`.
pub fn nesting_depth(text: &str, offset: usize) -> usize {
    let mut state = BracketState::default();
    for (position, &byte) in text.as_bytes().iter().take(offset).enumerate() {
        state.feed(position, byte);
    }
    state.depth()
}

fn find_closing(bytes: &[u8], open_at: usize, kind: BracketKind) -> Option<usize> {
    let (open, close) = kind.pair();
    let mut depth = 0usize;
    for (i, &byte) in bytes.iter().enumerate().skip(open_at) {
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn find_opening(bytes: &[u8], close_at: usize, kind: BracketKind) -> Option<usize> {
    let (open, close) = kind.pair();
    let mut depth = 0usize;
    for i in (0..=close_at).rev() {
        let byte = bytes[i];
        if byte == close {
            depth += 1;
        } else if byte == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Pairs the bracket adjacent to `cursor` with its partner of the same kind.
pub fn match_bracket(text: &str, cursor: usize) -> Option<BracketMatch> {
    let bytes = text.as_bytes();
    let at = adjacent_bracket(text, cursor)?;
    let (kind, opening) = BracketKind::classify(bytes[at])?;

    let (open, close) = if opening {
        (at, find_closing(bytes, at, kind)?)
    } else {
        (find_opening(bytes, at, kind)?, at)
    };

    Some(BracketMatch {
        open,
        close,
        kind,
        depth: nesting_depth(text, open),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_and_inner_pairs() {
        let text = "(a(b)c)";
        let outer = match_bracket(text, 0).unwrap();
        assert_eq!((outer.open, outer.close), (0, 6));
        assert_eq!(outer.depth, 0);

        let inner = match_bracket(text, 2).unwrap();
        assert_eq!((inner.open, inner.close), (2, 4));
        assert_eq!(inner.depth, 1);
        assert_eq!(inner.level(), 1);
    }

    #[test]
    fn test_closing_bracket_scans_backward() {
        let text = "(a(b)c)";
        let inner = match_bracket(text, 4).unwrap();
        assert_eq!((inner.open, inner.close), (2, 4));
        let outer = match_bracket(text, 7).unwrap();
        assert_eq!((outer.open, outer.close), (0, 6));
    }

    #[test]
    fn test_unmatched_reports_none() {
        assert_eq!(match_bracket("(a", 0), None);
        assert_eq!(match_bracket("a)", 1), None);
        assert_eq!(match_bracket("abc", 1), None);
        assert_eq!(match_bracket("", 0), None);
    }

    #[test]
    fn test_pairs_only_same_kind() {
        let text = "{ ( ] ) }";
        let curly = match_bracket(text, 0).unwrap();
        assert_eq!((curly.open, curly.close), (0, 8));
        let paren = match_bracket(text, 2).unwrap();
        assert_eq!((paren.open, paren.close), (2, 6));
        assert_eq!(paren.kind, BracketKind::Paren);
    }

    #[test]
    fn test_depth_counts_all_kinds() {
        let text = "{[<(x)>]}";
        let paren = match_bracket(text, 3).unwrap();
        assert_eq!(paren.depth, 3);
        assert_eq!(paren.level(), 0);
        assert_eq!(match_bracket(text, 1).unwrap().level(), 1);
    }

    #[test]
    fn test_cursor_prefers_bracket_under_cursor() {
        assert_eq!(adjacent_bracket("()", 1), Some(1));
        assert_eq!(adjacent_bracket("(a", 1), Some(0));
        assert_eq!(adjacent_bracket("ab", 1), None);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "(ü[é])";
        let outer = match_bracket(text, 0).unwrap();
        assert_eq!(outer.close, text.len() - 1);
    }

    #[test]
    fn test_closing_for() {
        assert_eq!(BracketKind::closing_for('('), Some(')'));
        assert_eq!(BracketKind::closing_for('<'), Some('>'));
        assert_eq!(BracketKind::closing_for(')'), None);
        assert_eq!(BracketKind::closing_for('é'), None);
    }
}
