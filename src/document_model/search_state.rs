#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

#[inline]
fn bytes_equal(a: u8, b: u8, options: SearchOptions) -> bool {
    if options.case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(&b)
    }
}

/// KMP partial-match table: `table[i]` is the length of the longest proper
/// prefix of `pattern[..=i]` that is also a suffix of it.
pub fn failure_table(pattern: &[u8], options: SearchOptions) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];
    let mut matched = 0;
    for i in 1..pattern.len() {
        while matched > 0 && !bytes_equal(pattern[i], pattern[matched], options) {
            matched = table[matched - 1];
        }
        if bytes_equal(pattern[i], pattern[matched], options) {
            matched += 1;
        }
        table[i] = matched;
    }
    table
}

/// Byte offsets of every occurrence of `pattern` in `text`, ascending.
/// Overlapping occurrences are all reported; an empty pattern matches nothing.
pub fn kmp_search(pattern: &str, text: &str, options: SearchOptions) -> Vec<usize> {
    let pattern = pattern.as_bytes();
    let mut matches = Vec::new();
    if pattern.is_empty() || pattern.len() > text.len() {
        return matches;
    }

    let table = failure_table(pattern, options);
    let mut matched = 0;
    for (i, &byte) in text.as_bytes().iter().enumerate() {
        while matched > 0 && !bytes_equal(byte, pattern[matched], options) {
            matched = table[matched - 1];
        }
        if bytes_equal(byte, pattern[matched], options) {
            matched += 1;
        }
        if matched == pattern.len() {
            matches.push(i + 1 - pattern.len());
            matched = table[matched - 1];
        }
    }
    matches
}

/// Caller-held search results with wrap-around match navigation.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub pattern: String,
    pub matches: Vec<usize>,
    pub current_match: Option<usize>,
    pub options: SearchOptions,
}

impl SearchState {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replaces the pattern and re-runs the search over `text`, selecting the
    /// first match if there is one.
    pub fn set_pattern(&mut self, pattern: &str, text: &str) {
        self.pattern = pattern.to_string();
        self.refresh(text);
    }

    /// Re-runs the current pattern against edited text.
    pub fn refresh(&mut self, text: &str) {
        self.matches = kmp_search(&self.pattern, text, self.options);
        self.current_match = if self.matches.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    pub fn clear(&mut self) {
        self.pattern.clear();
        self.matches.clear();
        self.current_match = None;
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current(&self) -> Option<usize> {
        self.current_match.map(|i| self.matches[i])
    }

    /// Byte range of the selected match.
    pub fn current_range(&self) -> Option<(usize, usize)> {
        self.current().map(|start| (start, start + self.pattern.len()))
    }

    pub fn next(&mut self) -> Option<usize> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let index = self.current_match.map_or(0, |i| (i + 1) % count);
        self.current_match = Some(index);
        Some(self.matches[index])
    }

    pub fn previous(&mut self) -> Option<usize> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let index = self.current_match.map_or(count - 1, |i| (i + count - 1) % count);
        self.current_match = Some(index);
        Some(self.matches[index])
    }

    /// Whether `offset` lies inside any match.
    pub fn is_match_at(&self, offset: usize) -> bool {
        let len = self.pattern.len();
        let after = self.matches.partition_point(|&start| start <= offset);
        after > 0 && offset < self.matches[after - 1] + len
    }
}
