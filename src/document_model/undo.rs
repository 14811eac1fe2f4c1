use log::debug;
use std::collections::VecDeque;

pub const DEFAULT_MAX_SNAPSHOTS: usize = 1000;

/// Linear undo/redo over full-text snapshots.
///
/// `snapshots[cursor]` is always the text the editor currently shows. Pushing
/// from the middle of the timeline drops everything after the cursor, so
/// there is never more than one redo path.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    snapshots: VecDeque<String>,
    cursor: Option<usize>,
    max_snapshots: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SNAPSHOTS)
    }

    /// A history keeping at most `max_snapshots` entries (at least two, so a
    /// single edit can always be undone).
    pub fn with_limit(max_snapshots: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: None,
            max_snapshots: max_snapshots.max(2),
        }
    }

    pub fn max_snapshots(&self) -> usize {
        self.max_snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn push(&mut self, before: &str, after: &str) {
        if before == after {
            return;
        }

        match self.cursor {
            Some(cursor) => self.snapshots.truncate(cursor + 1),
            None => {
                self.snapshots.clear();
                self.snapshots.push_back(before.to_string());
            }
        }
        self.snapshots.push_back(after.to_string());

        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
        }
        self.cursor = Some(self.snapshots.len() - 1);
        debug!(
            "history push: {} snapshots, cursor at tail",
            self.snapshots.len()
        );
    }

    pub fn undo(&mut self) -> Option<String> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        debug!("undo to snapshot {cursor}");
        self.snapshots.get(cursor).cloned()
    }

    pub fn redo(&mut self) -> Option<String> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.snapshots.len())? + 1;
        self.cursor = Some(cursor);
        debug!("redo to snapshot {cursor}");
        self.snapshots.get(cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let mut history = UndoHistory::new();
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_redo_linearity() {
        let mut history = UndoHistory::new();
        history.push("", "a");
        history.push("a", "ab");

        assert_eq!(history.undo().as_deref(), Some("a"));
        assert_eq!(history.undo().as_deref(), Some(""));
        assert_eq!(history.undo(), None);

        assert_eq!(history.redo().as_deref(), Some("a"));
        assert_eq!(history.redo().as_deref(), Some("ab"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_after_undo_truncates_redo() {
        let mut history = UndoHistory::new();
        history.push("", "a");
        history.push("a", "ab");
        assert_eq!(history.undo().as_deref(), Some("a"));

        history.push("a", "ac");
        assert_eq!(history.redo(), None);
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo().as_deref(), Some("a"));
        assert_eq!(history.undo().as_deref(), Some(""));
    }

    #[test]
    fn test_noop_push() {
        let mut history = UndoHistory::new();
        history.push("same", "same");
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);

        history.push("x", "y");
        history.push("y", "y");
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_eviction_shifts_cursor() {
        let mut history = UndoHistory::with_limit(3);
        history.push("0", "1");
        history.push("1", "2");
        history.push("2", "3");
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));

        assert_eq!(history.undo().as_deref(), Some("2"));
        assert_eq!(history.undo().as_deref(), Some("1"));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_limit_has_floor() {
        let mut history = UndoHistory::with_limit(0);
        assert_eq!(history.max_snapshots(), 2);
        history.push("a", "b");
        history.push("b", "c");
        assert_eq!(history.undo().as_deref(), Some("b"));
    }
}
